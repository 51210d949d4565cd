//! Domain models for the patient records system.

mod encounter;
mod patient;

pub use encounter::*;
pub use patient::*;
