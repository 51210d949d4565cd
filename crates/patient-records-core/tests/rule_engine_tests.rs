//! Rule engine integration tests.

use std::str::FromStr;

use chrono::NaiveDate;
use patient_records_core::db::{seed_demo_data, Database};
use patient_records_core::models::{Encounter, Patient, PatientFilter};
use patient_records_core::service::{
    EncounterService, PatientService, ServiceError, BAD_REQUEST_STATE,
    DELETE_VIOLATION_ENCOUNTERS, EMAIL_CONFLICT,
};
use rust_decimal::Decimal;

fn bart() -> Patient {
    Patient {
        id: None,
        first_name: "Bart".into(),
        last_name: "Simpson".into(),
        ssn: "123-45-6789".into(),
        email: "bart@mail.com".into(),
        age: 10,
        height: 62,
        weight: 130,
        insurance: "Burns Insurance".into(),
        gender: "Male".into(),
        street: "742 Evergreen Terrace".into(),
        city: "Springfield".into(),
        state: "MA".into(),
        postal: "90049".into(),
    }
}

fn checkup(patient_id: i64) -> Encounter {
    Encounter {
        id: None,
        patient_id,
        notes: Some("Routine checkup".into()),
        visit_code: "H7J 8W2".into(),
        provider: "Springfield General".into(),
        billing_code: "123.456.789-12".into(),
        icd10: "A22".into(),
        total_cost: Decimal::from_str("145.00").unwrap(),
        copay: Decimal::from_str("45.00").unwrap(),
        chief_complaint: "sore throat".into(),
        pulse: Some(80),
        systolic: Some(118),
        diastolic: Some(76),
        date: NaiveDate::from_ymd_opt(2021, 3, 14).unwrap(),
    }
}

#[test]
fn test_bart_lifecycle() {
    let db = Database::open_in_memory().unwrap();
    let patients = PatientService::new(&db);
    let encounters = EncounterService::new(&db);

    let created = patients.add_patient(&bart()).unwrap();
    assert_eq!(created.id, Some(1));

    let mut lisa = bart();
    lisa.first_name = "Lisa".into();
    lisa.gender = "Female".into();
    let err = patients.add_patient(&lisa).unwrap_err();
    assert!(matches!(err, ServiceError::UniqueFieldViolation(ref m) if m == EMAIL_CONFLICT));

    let mut moved = created.clone();
    moved.state = "HP".into();
    let err = patients.update_patient_by_id(1, &moved).unwrap_err();
    assert!(matches!(err, ServiceError::BadData(ref m) if m == BAD_REQUEST_STATE));

    let visit = encounters.add_encounter(&checkup(1), 1).unwrap();
    let err = patients.delete_patient(1).unwrap_err();
    assert!(
        matches!(err, ServiceError::DependentEntityDeleteViolation(ref m) if m == DELETE_VIOLATION_ENCOUNTERS)
    );
    assert_eq!(patients.get_patient_by_id(1).unwrap(), created);

    let visit_id = visit.id.unwrap();
    assert!(db.delete_encounter(visit_id).unwrap());
    patients.delete_patient(1).unwrap();
    assert!(matches!(
        patients.get_patient_by_id(1),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn test_round_trip_adds_only_an_id() {
    let db = Database::open_in_memory().unwrap();
    let patients = PatientService::new(&db);
    let encounters = EncounterService::new(&db);

    let created = patients.add_patient(&bart()).unwrap();
    let id = created.id.unwrap();
    assert_eq!(patients.get_patient_by_id(id).unwrap(), bart().with_id(id));

    let visit = encounters.add_encounter(&checkup(id), id).unwrap();
    let visit_id = visit.id.unwrap();
    let fetched = encounters.get_encounter_by_id(visit_id, id).unwrap();
    assert_eq!(fetched, checkup(id).with_id(visit_id));
    assert_eq!(fetched.total_cost.to_string(), "145.00");
}

#[test]
fn test_rejected_writes_leave_store_unchanged() {
    let db = Database::open_in_memory().unwrap();
    seed_demo_data(&db).unwrap();
    let patients = PatientService::new(&db);
    let encounters = EncounterService::new(&db);

    let before_patients = db.list_patients().unwrap();
    let before_encounters = db.list_encounters().unwrap();

    let mut duplicate = bart();
    duplicate.email = "lisa@mail.com".into();
    assert!(patients.add_patient(&duplicate).is_err());

    let mut renamed = before_patients[0].clone();
    renamed.email = "homer@mail.com".into();
    assert!(patients.update_patient_by_id(1, &renamed).is_err());

    let mut cheap = checkup(2);
    cheap.copay = Decimal::from_str("4.5").unwrap();
    assert!(encounters.add_encounter(&cheap, 2).is_err());
    assert!(patients.delete_patient(3).is_err());

    assert_eq!(db.list_patients().unwrap(), before_patients);
    assert_eq!(db.list_encounters().unwrap(), before_encounters);
}

#[test]
fn test_seeded_maggie_can_be_deleted() {
    let db = Database::open_in_memory().unwrap();
    seed_demo_data(&db).unwrap();
    let patients = PatientService::new(&db);

    let maggie = patients
        .query_patients(&PatientFilter {
            first_name: Some("Maggie".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(maggie.len(), 1);

    let id = maggie[0].id.unwrap();
    patients.delete_patient(id).unwrap();
    assert_eq!(db.list_patients().unwrap().len(), 4);
}

#[test]
fn test_store_failure_maps_to_unavailable() {
    let db = Database::open_in_memory().unwrap();
    seed_demo_data(&db).unwrap();
    db.conn().execute_batch("DROP TABLE encounter").unwrap();

    let err = EncounterService::new(&db)
        .get_encounters_by_patient_id(1)
        .unwrap_err();
    assert!(matches!(err, ServiceError::ServiceUnavailable(_)));

    let err = PatientService::new(&db).delete_patient(1).unwrap_err();
    assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
}

#[test]
fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");

    {
        let db = Database::open(&path).unwrap();
        PatientService::new(&db).add_patient(&bart()).unwrap();
    }

    let db = Database::open(&path).unwrap();
    let patient = PatientService::new(&db).get_patient_by_id(1).unwrap();
    assert_eq!(patient.email, "bart@mail.com");
}
