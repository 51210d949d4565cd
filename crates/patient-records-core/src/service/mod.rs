//! Rule engines for the patient and encounter lifecycles.
//!
//! Both services borrow a [`Database`](crate::db::Database) and run each
//! operation as a short sequence of store calls. Business-rule violations
//! abort the operation before anything is written; store failures surface
//! as [`ServiceError::ServiceUnavailable`].

mod encounters;
mod patients;

pub use encounters::*;
pub use patients::*;

use thiserror::Error;

use crate::db::DbError;
use crate::validation::ValidationError;

pub const EMAIL_CONFLICT: &str = "The email address is already associated with another patient";
pub const BAD_REQUEST_STATE: &str =
    "The patient's state must be one of the 50 US states that exist";
pub const BAD_REQUEST_GENDER: &str = "The patient's gender is not valid";
pub const BAD_REQUEST_PATIENT_NOT_FOUND: &str = "The patient does not exist in the database";
pub const BAD_REQUEST_ENCOUNTER_NOT_FOUND: &str = "The encounter does not exist in the database";
pub const BAD_REQUEST_ID: &str =
    "The id of the request body's entity must match the id of the path parameter";
pub const BAD_REQUEST_TOTAL_COST: &str =
    "The encounter's total cost must have exactly 2 decimal places";
pub const BAD_REQUEST_COPAY: &str = "The encounter's copay must have exactly 2 decimal places";
pub const DELETE_VIOLATION_ENCOUNTERS: &str = "This patient has encounters and cannot be deleted";

/// Domain failures of a rule engine operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadData(String),

    #[error("{0}")]
    UniqueFieldViolation(String),

    #[error("{0}")]
    DependentEntityDeleteViolation(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn patient_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Could not locate a patient with the id: {id}"))
}

pub(crate) fn encounter_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Could not locate an encounter with the id: {id}"))
}
