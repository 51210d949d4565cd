//! Encounter rule engine.

use crate::db::Database;
use crate::models::{Encounter, EncounterFilter};
use crate::validation::{has_exact_scale, MONEY_SCALE};

use super::{
    encounter_not_found, ServiceError, ServiceResult, BAD_REQUEST_COPAY,
    BAD_REQUEST_ENCOUNTER_NOT_FOUND, BAD_REQUEST_ID, BAD_REQUEST_PATIENT_NOT_FOUND,
    BAD_REQUEST_TOTAL_COST,
};

/// Encounter operations, always scoped to an owning patient.
pub struct EncounterService<'a> {
    db: &'a Database,
}

impl<'a> EncounterService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Every encounter recorded for an existing patient.
    pub fn get_encounters_by_patient_id(&self, patient_id: i64) -> ServiceResult<Vec<Encounter>> {
        self.require_patient(patient_id)?;
        Ok(self.db.list_encounters_for_patient(patient_id)?)
    }

    pub fn query_encounters(&self, filter: &EncounterFilter) -> ServiceResult<Vec<Encounter>> {
        let encounters = if filter.is_empty() {
            self.db.list_encounters()?
        } else {
            self.db.find_encounters(filter)?
        };
        Ok(encounters)
    }

    /// Record a visit for the patient named in the path.
    ///
    /// A missing patient is reported as bad data here, not as not-found.
    pub fn add_encounter(
        &self,
        encounter: &Encounter,
        path_patient_id: i64,
    ) -> ServiceResult<Encounter> {
        self.db.atomic(|| -> ServiceResult<Encounter> {
            if !self.db.patient_exists(encounter.patient_id)? {
                tracing::warn!(
                    patient_id = encounter.patient_id,
                    "Rejected encounter for missing patient"
                );
                return Err(ServiceError::BadData(BAD_REQUEST_PATIENT_NOT_FOUND.into()));
            }
            if encounter.patient_id != path_patient_id {
                tracing::warn!(
                    patient_id = encounter.patient_id,
                    path_patient_id,
                    "Rejected encounter with patient id mismatch"
                );
                return Err(ServiceError::BadData(BAD_REQUEST_ID.into()));
            }
            check_money_scale(encounter)?;

            let created = self.db.insert_encounter(encounter)?;
            tracing::debug!(id = ?created.id, patient_id = created.patient_id, "Encounter created");
            Ok(created)
        })
    }

    /// Fetch one encounter of an existing patient.
    ///
    /// An encounter that belongs to a different patient is reported as missing.
    pub fn get_encounter_by_id(&self, id: i64, patient_id: i64) -> ServiceResult<Encounter> {
        self.require_patient(patient_id)?;

        match self.db.get_encounter(id)? {
            Some(encounter) if encounter.patient_id == patient_id => Ok(encounter),
            Some(encounter) => {
                tracing::warn!(
                    id,
                    patient_id,
                    owner = encounter.patient_id,
                    "Encounter requested under another patient"
                );
                Err(encounter_not_found(id))
            }
            None => Err(encounter_not_found(id)),
        }
    }

    /// Replace an encounter. Both the body id and the body patient id must
    /// match the path.
    pub fn update_encounter_by_id(
        &self,
        id: i64,
        encounter: &Encounter,
        patient_id: i64,
    ) -> ServiceResult<Encounter> {
        self.db.atomic(|| -> ServiceResult<Encounter> {
            self.require_patient(encounter.patient_id)?;

            if encounter.id != Some(id) {
                tracing::warn!(id, body_id = ?encounter.id, "Rejected encounter update with id mismatch");
                return Err(ServiceError::BadData(BAD_REQUEST_ID.into()));
            }
            if encounter.patient_id != patient_id {
                tracing::warn!(
                    id,
                    patient_id,
                    body_patient_id = encounter.patient_id,
                    "Rejected encounter update with patient id mismatch"
                );
                return Err(ServiceError::BadData(BAD_REQUEST_ID.into()));
            }
            check_money_scale(encounter)?;

            if !self.db.update_encounter(encounter)? {
                tracing::warn!(id, patient_id, "Rejected update of missing encounter");
                return Err(ServiceError::NotFound(
                    BAD_REQUEST_ENCOUNTER_NOT_FOUND.into(),
                ));
            }
            tracing::debug!(id, patient_id, "Encounter updated");
            Ok(encounter.clone())
        })
    }

    fn require_patient(&self, patient_id: i64) -> ServiceResult<()> {
        if self.db.patient_exists(patient_id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(BAD_REQUEST_PATIENT_NOT_FOUND.into()))
        }
    }
}

fn check_money_scale(encounter: &Encounter) -> ServiceResult<()> {
    if !has_exact_scale(&encounter.total_cost, MONEY_SCALE) {
        tracing::warn!(total_cost = %encounter.total_cost, "Rejected encounter total cost scale");
        return Err(ServiceError::BadData(BAD_REQUEST_TOTAL_COST.into()));
    }
    if !has_exact_scale(&encounter.copay, MONEY_SCALE) {
        tracing::warn!(copay = %encounter.copay, "Rejected encounter copay scale");
        return Err(ServiceError::BadData(BAD_REQUEST_COPAY.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        for (name, email) in [("Bart", "bart@mail.com"), ("Lisa", "lisa@mail.com")] {
            db.insert_patient(&Patient {
                id: None,
                first_name: name.into(),
                last_name: "Simpson".into(),
                ssn: "111-11-1111".into(),
                email: email.into(),
                age: 10,
                height: 62,
                weight: 130,
                insurance: "Burns Insurance".into(),
                gender: "Male".into(),
                street: "123 Main Street".into(),
                city: "Springfield".into(),
                state: "MA".into(),
                postal: "90049".into(),
            })
            .unwrap();
        }
        db
    }

    fn make_encounter(patient_id: i64) -> Encounter {
        Encounter {
            id: None,
            patient_id,
            notes: None,
            visit_code: "N3W 3C3".into(),
            provider: "New Hospital".into(),
            billing_code: "123.456.789-00".into(),
            icd10: "Z99".into(),
            total_cost: dec("0.11"),
            copay: dec("0.00"),
            chief_complaint: "new complaint".into(),
            pulse: Some(75),
            systolic: Some(120),
            diastolic: Some(80),
            date: NaiveDate::from_ymd_opt(2020, 8, 4).unwrap(),
        }
    }

    #[test]
    fn test_add_and_get_encounter() {
        let db = setup_db();
        let service = EncounterService::new(&db);

        let created = service.add_encounter(&make_encounter(1), 1).unwrap();
        assert_eq!(created.id, Some(1));
        assert_eq!(service.get_encounter_by_id(1, 1).unwrap(), created);
        assert_eq!(service.get_encounters_by_patient_id(1).unwrap(), vec![created]);
        assert!(service.get_encounters_by_patient_id(2).unwrap().is_empty());
    }

    #[test]
    fn test_add_for_missing_patient_is_bad_data() {
        let db = setup_db();
        let err = EncounterService::new(&db)
            .add_encounter(&make_encounter(9), 9)
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_PATIENT_NOT_FOUND));
    }

    #[test]
    fn test_add_with_patient_mismatch() {
        let db = setup_db();
        let err = EncounterService::new(&db)
            .add_encounter(&make_encounter(1), 2)
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_ID));
        assert!(db.list_encounters().unwrap().is_empty());
    }

    #[test]
    fn test_add_requires_two_decimal_places() {
        let db = setup_db();
        let service = EncounterService::new(&db);

        let mut encounter = make_encounter(1);
        encounter.total_cost = dec("0.1");
        let err = service.add_encounter(&encounter, 1).unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_TOTAL_COST));

        let mut encounter = make_encounter(1);
        encounter.copay = dec("1");
        let err = service.add_encounter(&encounter, 1).unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_COPAY));

        let mut encounter = make_encounter(1);
        encounter.total_cost = dec("0.10");
        assert!(service.add_encounter(&encounter, 1).is_ok());
    }

    #[test]
    fn test_get_encounter_not_found() {
        let db = setup_db();
        let service = EncounterService::new(&db);

        let err = service.get_encounter_by_id(1, 7).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == BAD_REQUEST_PATIENT_NOT_FOUND));

        let err = service.get_encounter_by_id(4, 1).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m.ends_with("id: 4")));
    }

    #[test]
    fn test_get_encounter_under_other_patient() {
        let db = setup_db();
        let service = EncounterService::new(&db);
        service.add_encounter(&make_encounter(1), 1).unwrap();

        let err = service.get_encounter_by_id(1, 2).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_encounters_for_missing_patient() {
        let db = setup_db();
        let err = EncounterService::new(&db)
            .get_encounters_by_patient_id(3)
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_update_encounter() {
        let db = setup_db();
        let service = EncounterService::new(&db);
        let mut encounter = service.add_encounter(&make_encounter(1), 1).unwrap();

        encounter.chief_complaint = "headache".into();
        encounter.total_cost = dec("145.00");
        let updated = service.update_encounter_by_id(1, &encounter, 1).unwrap();
        assert_eq!(updated, encounter);
        assert_eq!(db.get_encounter(1).unwrap().unwrap().total_cost, dec("145.00"));
    }

    #[test]
    fn test_update_encounter_rejections() {
        let db = setup_db();
        let service = EncounterService::new(&db);
        let encounter = service.add_encounter(&make_encounter(1), 1).unwrap();

        let err = service
            .update_encounter_by_id(1, &make_encounter(9).with_id(1), 9)
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == BAD_REQUEST_PATIENT_NOT_FOUND));

        let err = service.update_encounter_by_id(2, &encounter, 1).unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_ID));

        let err = service.update_encounter_by_id(1, &encounter, 2).unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_ID));

        let mut bad_scale = encounter.clone();
        bad_scale.copay = dec("0.5");
        let err = service.update_encounter_by_id(1, &bad_scale, 1).unwrap_err();
        assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_COPAY));

        let missing = make_encounter(1).with_id(5);
        let err = service.update_encounter_by_id(5, &missing, 1).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == BAD_REQUEST_ENCOUNTER_NOT_FOUND));
    }

    #[test]
    fn test_query_encounters() {
        let db = setup_db();
        let service = EncounterService::new(&db);
        service.add_encounter(&make_encounter(1), 1).unwrap();
        let mut other = make_encounter(2);
        other.icd10 = "A25".into();
        service.add_encounter(&other, 2).unwrap();

        assert_eq!(
            service
                .query_encounters(&EncounterFilter::default())
                .unwrap()
                .len(),
            2
        );

        let matched = service
            .query_encounters(&EncounterFilter {
                icd10: Some("A25".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].patient_id, 2);
    }
}
