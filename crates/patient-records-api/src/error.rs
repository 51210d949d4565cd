//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use patient_records_core::{ServiceError, ValidationError};

const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The service is temporarily unavailable, please try again later";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Error response body: a short category plus a readable detail.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad data: {0}")]
    BadData(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Unique field violation: {0}")]
    UniqueFieldViolation(String),
    #[error("Dependent entity delete violation: {0}")]
    DependentEntityDeleteViolation(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadData(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UniqueFieldViolation(_) | ApiError::DependentEntityDeleteViolation(_) => {
                StatusCode::CONFLICT
            }
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match self {
            ApiError::NotFound(detail) => ("Not Found", detail),
            ApiError::BadData(detail) => ("Bad Data", detail),
            ApiError::Validation(detail) => ("Validation Error", detail),
            ApiError::UniqueFieldViolation(detail) => ("Unique Field Violation", detail),
            ApiError::DependentEntityDeleteViolation(detail) => {
                ("Dependent Entity Delete Violation", detail)
            }
            ApiError::ServiceUnavailable(detail) => {
                tracing::error!(detail, "Store failure");
                ("Server Error", SERVICE_UNAVAILABLE_MESSAGE.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                ("Unexpected Server Error", INTERNAL_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            ServiceError::BadData(m) => ApiError::BadData(m),
            ServiceError::UniqueFieldViolation(m) => ApiError::UniqueFieldViolation(m),
            ServiceError::DependentEntityDeleteViolation(m) => {
                ApiError::DependentEntityDeleteViolation(m)
            }
            ServiceError::Validation(e) => e.into(),
            ServiceError::ServiceUnavailable(e) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}
