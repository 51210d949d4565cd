//! Demo data for an empty database.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Database, DbError, DbResult};
use crate::models::{Encounter, Patient};

/// Counts of records created by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub patients: usize,
    pub encounters: usize,
}

/// Load the Simpson family and their visits. Does nothing if any patient exists.
pub fn seed_demo_data(db: &Database) -> DbResult<SeedSummary> {
    if !db.list_patients()?.is_empty() {
        tracing::debug!("Database already has patients, skipping seed");
        return Ok(SeedSummary::default());
    }

    db.atomic(|| -> DbResult<SeedSummary> {
        let mut summary = SeedSummary::default();

        let family = [
            ("Bart", "111-11-1111", 10, 62, "Male"),
            ("Lisa", "222-22-2222", 8, 62, "Female"),
            ("Homer", "333-33-3333", 31, 66, "Male"),
            ("Marge", "444-44-4444", 34, 64, "Female"),
            ("Maggie", "555-55-5555", 1, 26, "Female"),
        ];

        let mut ids = Vec::new();
        for (first_name, ssn, age, height, gender) in family {
            let patient = db.insert_patient(&Patient {
                id: None,
                first_name: first_name.into(),
                last_name: "Simpson".into(),
                ssn: ssn.into(),
                email: format!("{}@mail.com", first_name.to_lowercase()),
                age,
                height,
                weight: 130,
                insurance: "Burns Insurance".into(),
                gender: gender.into(),
                street: "123 Main Street".into(),
                city: "Springfield".into(),
                state: "MA".into(),
                postal: "90049".into(),
            })?;
            ids.extend(patient.id);
            summary.patients += 1;
        }

        // Maggie has no visits and can be deleted straight away.
        for &patient_id in ids.iter().take(4) {
            for encounter in visits_for(patient_id)? {
                db.insert_encounter(&encounter)?;
                summary.encounters += 1;
            }
        }

        tracing::info!(
            patients = summary.patients,
            encounters = summary.encounters,
            "Seeded demo data"
        );
        Ok(summary)
    })
}

fn visits_for(patient_id: i64) -> DbResult<Vec<Encounter>> {
    let visits = [
        (
            Some("Lots of interesting notes here"),
            "N3W 3C3",
            "New Hospital",
            "123.456.789-00",
            "Z99",
            "0.11",
            "0.00",
            "new complaint",
            (75, 120, 80),
            (2020, 8, 4),
        ),
        (
            Some("Patient is not cooperative"),
            "W3W 3W3",
            "New Hospital",
            "123.456.789-02",
            "A25",
            "145.00",
            "45.00",
            "anxiety",
            (100, 180, 90),
            (2020, 8, 24),
        ),
        (
            None,
            "N3W 3C3",
            "Best Hospital",
            "123.456.789-01",
            "B44",
            "0.11",
            "0.00",
            "headache",
            (75, 120, 80),
            (2020, 9, 4),
        ),
    ];

    let mut encounters = Vec::with_capacity(visits.len());
    for (notes, visit_code, provider, billing_code, icd10, total, copay, complaint, vitals, ymd) in
        visits
    {
        let (year, month, day) = ymd;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DbError::Constraint(format!("invalid seed date {ymd:?}")))?;
        encounters.push(Encounter {
            id: None,
            patient_id,
            notes: notes.map(Into::into),
            visit_code: visit_code.into(),
            provider: provider.into(),
            billing_code: billing_code.into(),
            icd10: icd10.into(),
            total_cost: seed_decimal(total)?,
            copay: seed_decimal(copay)?,
            chief_complaint: complaint.into(),
            pulse: Some(vitals.0),
            systolic: Some(vitals.1),
            diastolic: Some(vitals.2),
            date,
        });
    }
    Ok(encounters)
}

fn seed_decimal(s: &str) -> DbResult<Decimal> {
    Decimal::from_str(s).map_err(|e| DbError::Decimal(format!("{s}: {e}")))
}
