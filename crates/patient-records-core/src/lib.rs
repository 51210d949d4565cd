//! Patient Records Core Library
//!
//! Patient and encounter records for a clinic back office, with the
//! validation rules and referential-integrity checks that guard them.
//!
//! # Architecture
//!
//! ```text
//! JSON body ──► Payload ──TryFrom──► Patient / Encounter
//!                  (field validation, all violations collected)
//!                                        │
//!                         ┌──────────────▼──────────────┐
//!                         │         Rule engines         │
//!                         │  state / gender membership   │
//!                         │  email uniqueness            │
//!                         │  path ↔ body id agreement    │
//!                         │  money scale == 2            │
//!                         │  no delete with encounters   │
//!                         └──────────────┬──────────────┘
//!                                        │
//!                                 SQLite (patient, encounter)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite store for patients and encounters, plus demo seed data
//! - [`models`]: Domain types, wire payloads and example filters
//! - [`validation`]: Field format rules and reference lists
//! - [`service`]: Patient and encounter rule engines

pub mod db;
pub mod models;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use db::{Database, DbError};
pub use models::{
    Encounter, EncounterFilter, EncounterPayload, Patient, PatientFilter, PatientPayload,
};
pub use service::{EncounterService, PatientService, ServiceError, ServiceResult};
pub use validation::ValidationError;
