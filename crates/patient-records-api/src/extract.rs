//! Request extraction with field validation.
//!
//! Every extractor here rejects with [`ApiError`], so malformed bodies,
//! path ids and query strings all answer with the JSON error body.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use patient_records_core::models::{Encounter, EncounterPayload, Patient, PatientPayload};
use patient_records_core::ValidationError;

use crate::error::ApiError;

/// A domain type received as a loosely typed wire payload.
pub trait FromPayload: Sized {
    type Payload: DeserializeOwned + Send;

    fn from_payload(payload: Self::Payload) -> Result<Self, ValidationError>;
}

impl FromPayload for Patient {
    type Payload = PatientPayload;

    fn from_payload(payload: PatientPayload) -> Result<Self, ValidationError> {
        Patient::try_from(payload)
    }
}

impl FromPayload for Encounter {
    type Payload = EncounterPayload;

    fn from_payload(payload: EncounterPayload) -> Result<Self, ValidationError> {
        Encounter::try_from(payload)
    }
}

/// JSON body that has passed every field rule of `T`.
///
/// Malformed JSON and field violations are both rejected as
/// [`ApiError::Validation`].
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T::Payload>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        let value = T::from_payload(payload).map_err(|err| {
            tracing::warn!(%err, "Rejected request body");
            ApiError::from(err)
        })?;
        Ok(Self(value))
    }
}

/// Path parameters; an id that does not parse is [`ApiError::BadData`].
#[derive(Debug)]
pub struct IdPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(PathRejection::FailedToDeserializePathParams(err)) => {
                tracing::warn!(path = %parts.uri.path(), %err, "Rejected path parameters");
                Err(ApiError::BadData(err.body_text()))
            }
            Err(rejection) => Err(ApiError::Internal(rejection.body_text())),
        }
    }
}

/// Query-string example filter; a field that does not parse is
/// [`ApiError::Validation`].
#[derive(Debug)]
pub struct ExampleQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ExampleQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(filter) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::warn!(query = ?parts.uri.query(), "Rejected query string");
                ApiError::Validation(rejection.body_text())
            })?;
        Ok(Self(filter))
    }
}
