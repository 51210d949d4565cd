//! Patient rule engine.

use crate::db::Database;
use crate::models::{Patient, PatientFilter};
use crate::validation;

use super::{
    patient_not_found, EncounterService, ServiceError, ServiceResult, BAD_REQUEST_GENDER,
    BAD_REQUEST_ID, BAD_REQUEST_PATIENT_NOT_FOUND, BAD_REQUEST_STATE, DELETE_VIOLATION_ENCOUNTERS,
    EMAIL_CONFLICT,
};

/// Patient lifecycle operations and their consistency rules.
pub struct PatientService<'a> {
    db: &'a Database,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All patients, or those matching every set field of `filter`.
    pub fn query_patients(&self, filter: &PatientFilter) -> ServiceResult<Vec<Patient>> {
        let patients = if filter.is_empty() {
            self.db.list_patients()?
        } else {
            self.db.find_patients(filter)?
        };
        Ok(patients)
    }

    pub fn get_patient_by_id(&self, id: i64) -> ServiceResult<Patient> {
        self.db.get_patient(id)?.ok_or_else(|| patient_not_found(id))
    }

    /// Create a patient after checking state, gender and email uniqueness.
    pub fn add_patient(&self, patient: &Patient) -> ServiceResult<Patient> {
        check_membership(patient)?;

        self.db.atomic(|| -> ServiceResult<Patient> {
            if self.db.patient_email_exists(&patient.email)? {
                tracing::warn!(email = %patient.email, "Rejected patient with duplicate email");
                return Err(ServiceError::UniqueFieldViolation(EMAIL_CONFLICT.into()));
            }

            let created = self.db.insert_patient(patient)?;
            tracing::debug!(id = ?created.id, "Patient created");
            Ok(created)
        })
    }

    /// Delete a patient that has no encounters.
    pub fn delete_patient(&self, id: i64) -> ServiceResult<()> {
        self.db.atomic(|| -> ServiceResult<()> {
            if self.db.get_patient(id)?.is_none() {
                return Err(patient_not_found(id));
            }

            let encounters = EncounterService::new(self.db).get_encounters_by_patient_id(id)?;
            if !encounters.is_empty() {
                tracing::warn!(
                    id,
                    encounters = encounters.len(),
                    "Rejected delete of patient with encounters"
                );
                return Err(ServiceError::DependentEntityDeleteViolation(
                    DELETE_VIOLATION_ENCOUNTERS.into(),
                ));
            }

            if !self.db.delete_patient(id)? {
                return Err(patient_not_found(id));
            }
            tracing::debug!(id, "Patient deleted");
            Ok(())
        })
    }

    /// Replace a patient. The body id must match `id`; a changed email must
    /// not belong to another patient.
    pub fn update_patient_by_id(&self, id: i64, patient: &Patient) -> ServiceResult<Patient> {
        if patient.id != Some(id) {
            tracing::warn!(id, body_id = ?patient.id, "Rejected patient update with id mismatch");
            return Err(ServiceError::BadData(BAD_REQUEST_ID.into()));
        }
        check_membership(patient)?;

        self.db.atomic(|| -> ServiceResult<Patient> {
            let existing = self
                .db
                .get_patient(id)?
                .ok_or_else(|| ServiceError::NotFound(BAD_REQUEST_PATIENT_NOT_FOUND.into()))?;

            if existing.email != patient.email && self.db.patient_email_exists(&patient.email)? {
                tracing::warn!(id, email = %patient.email, "Rejected patient update with duplicate email");
                return Err(ServiceError::UniqueFieldViolation(EMAIL_CONFLICT.into()));
            }

            if !self.db.update_patient(patient)? {
                return Err(ServiceError::NotFound(BAD_REQUEST_PATIENT_NOT_FOUND.into()));
            }
            tracing::debug!(id, "Patient updated");
            Ok(patient.clone())
        })
    }
}

fn check_membership(patient: &Patient) -> ServiceResult<()> {
    if !validation::is_valid_state(&patient.state) {
        tracing::warn!(state = %patient.state, "Rejected patient with invalid state");
        return Err(ServiceError::BadData(BAD_REQUEST_STATE.into()));
    }
    if !validation::is_valid_gender(&patient.gender) {
        tracing::warn!(gender = %patient.gender, "Rejected patient with invalid gender");
        return Err(ServiceError::BadData(BAD_REQUEST_GENDER.into()));
    }
    Ok(())
}
