//! Patient endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use patient_records_core::{Patient, PatientFilter, PatientService};

use crate::error::ApiError;
use crate::extract::{ExampleQuery, IdPath, ValidatedJson};
use crate::AppState;

/// `GET /patients` - every patient matching the query-string example.
pub async fn query(
    State(state): State<AppState>,
    ExampleQuery(filter): ExampleQuery<PatientFilter>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state
        .run(move |db| PatientService::new(db).query_patients(&filter))
        .await?;
    Ok(Json(patients))
}

/// `GET /patients/:patient_id`
pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Patient>, ApiError> {
    tracing::info!(id, "Request received to get patient by id");
    let patient = state
        .run(move |db| PatientService::new(db).get_patient_by_id(id))
        .await?;
    Ok(Json(patient))
}

/// `POST /patients` - any id in the body is ignored.
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(patient): ValidatedJson<Patient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    tracing::info!(email = %patient.email, "Request received to add patient");
    let created = state
        .run(move |db| PatientService::new(db).add_patient(&patient))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /patients/:patient_id`
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
    ValidatedJson(patient): ValidatedJson<Patient>,
) -> Result<Json<Patient>, ApiError> {
    tracing::info!(id, "Request received to update patient");
    let updated = state
        .run(move |db| PatientService::new(db).update_patient_by_id(id, &patient))
        .await?;
    Ok(Json(updated))
}

/// `DELETE /patients/:patient_id`
pub async fn delete(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(id, "Request received to delete patient");
    state
        .run(move |db| PatientService::new(db).delete_patient(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
