//! Encounter database operations.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use rust_decimal::Decimal;

use super::{push_condition, where_clause, Conditions, Database, DbError, DbResult};
use crate::models::{Encounter, EncounterFilter};

const ENCOUNTER_COLUMNS: &str = r#"
    id, patient_id, notes, visit_code, provider, billing_code, icd10,
    total_cost, copay, chief_complaint, pulse, systolic, diastolic, date
"#;

impl Database {
    /// Insert a new encounter and return it with its generated id.
    pub fn insert_encounter(&self, encounter: &Encounter) -> DbResult<Encounter> {
        self.conn.execute(
            r#"
            INSERT INTO encounter (
                patient_id, notes, visit_code, provider, billing_code, icd10,
                total_cost, copay, chief_complaint, pulse, systolic, diastolic, date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                encounter.patient_id,
                encounter.notes,
                encounter.visit_code,
                encounter.provider,
                encounter.billing_code,
                encounter.icd10,
                encounter.total_cost.to_string(),
                encounter.copay.to_string(),
                encounter.chief_complaint,
                encounter.pulse,
                encounter.systolic,
                encounter.diastolic,
                encounter.date,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(encounter.clone().with_id(id))
    }

    /// Replace every field of an existing encounter.
    pub fn update_encounter(&self, encounter: &Encounter) -> DbResult<bool> {
        let id = encounter
            .id
            .ok_or_else(|| DbError::Constraint("encounter update requires an id".into()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE encounter SET
                patient_id = ?2,
                notes = ?3,
                visit_code = ?4,
                provider = ?5,
                billing_code = ?6,
                icd10 = ?7,
                total_cost = ?8,
                copay = ?9,
                chief_complaint = ?10,
                pulse = ?11,
                systolic = ?12,
                diastolic = ?13,
                date = ?14
            WHERE id = ?1
            "#,
            params![
                id,
                encounter.patient_id,
                encounter.notes,
                encounter.visit_code,
                encounter.provider,
                encounter.billing_code,
                encounter.icd10,
                encounter.total_cost.to_string(),
                encounter.copay.to_string(),
                encounter.chief_complaint,
                encounter.pulse,
                encounter.systolic,
                encounter.diastolic,
                encounter.date,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an encounter by id.
    pub fn get_encounter(&self, id: i64) -> DbResult<Option<Encounter>> {
        self.conn
            .query_row(
                &format!("SELECT {ENCOUNTER_COLUMNS} FROM encounter WHERE id = ?"),
                [id],
                EncounterRow::from_row,
            )
            .optional()?
            .map(Encounter::try_from)
            .transpose()
    }

    /// List all encounters.
    pub fn list_encounters(&self) -> DbResult<Vec<Encounter>> {
        self.find_encounters(&EncounterFilter::default())
    }

    /// List all encounters for a patient.
    pub fn list_encounters_for_patient(&self, patient_id: i64) -> DbResult<Vec<Encounter>> {
        self.find_encounters(&EncounterFilter {
            patient_id: Some(patient_id),
            ..Default::default()
        })
    }

    /// Encounters whose columns equal every set field of `filter`.
    pub fn find_encounters(&self, filter: &EncounterFilter) -> DbResult<Vec<Encounter>> {
        let conditions = encounter_conditions(filter);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENCOUNTER_COLUMNS} FROM encounter {} ORDER BY id",
            where_clause(&conditions)
        ))?;

        let rows = stmt.query_map(
            params_from_iter(conditions.iter().map(|(_, value)| value)),
            EncounterRow::from_row,
        )?;

        let mut encounters = Vec::new();
        for row in rows {
            encounters.push(Encounter::try_from(row?)?);
        }
        Ok(encounters)
    }

    /// Delete an encounter.
    pub fn delete_encounter(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM encounter WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct EncounterRow {
    id: i64,
    patient_id: i64,
    notes: Option<String>,
    visit_code: String,
    provider: String,
    billing_code: String,
    icd10: String,
    total_cost: String,
    copay: String,
    chief_complaint: String,
    pulse: Option<i32>,
    systolic: Option<i32>,
    diastolic: Option<i32>,
    date: NaiveDate,
}

impl EncounterRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            notes: row.get(2)?,
            visit_code: row.get(3)?,
            provider: row.get(4)?,
            billing_code: row.get(5)?,
            icd10: row.get(6)?,
            total_cost: row.get(7)?,
            copay: row.get(8)?,
            chief_complaint: row.get(9)?,
            pulse: row.get(10)?,
            systolic: row.get(11)?,
            diastolic: row.get(12)?,
            date: row.get(13)?,
        })
    }
}

impl TryFrom<EncounterRow> for Encounter {
    type Error = DbError;

    fn try_from(row: EncounterRow) -> Result<Self, Self::Error> {
        Ok(Encounter {
            id: Some(row.id),
            patient_id: row.patient_id,
            notes: row.notes,
            visit_code: row.visit_code,
            provider: row.provider,
            billing_code: row.billing_code,
            icd10: row.icd10,
            total_cost: parse_decimal(&row.total_cost)?,
            copay: parse_decimal(&row.copay)?,
            chief_complaint: row.chief_complaint,
            pulse: row.pulse,
            systolic: row.systolic,
            diastolic: row.diastolic,
            date: row.date,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, DbError> {
    Decimal::from_str(s).map_err(|e| DbError::Decimal(format!("{s}: {e}")))
}

fn encounter_conditions(filter: &EncounterFilter) -> Conditions {
    let mut conditions = Conditions::new();
    push_condition(&mut conditions, "id", filter.id);
    push_condition(&mut conditions, "patient_id", filter.patient_id);
    push_condition(&mut conditions, "notes", filter.notes.clone());
    push_condition(&mut conditions, "visit_code", filter.visit_code.clone());
    push_condition(&mut conditions, "provider", filter.provider.clone());
    push_condition(&mut conditions, "billing_code", filter.billing_code.clone());
    push_condition(&mut conditions, "icd10", filter.icd10.clone());
    push_condition(
        &mut conditions,
        "total_cost",
        filter.total_cost.map(|d| d.to_string()),
    );
    push_condition(&mut conditions, "copay", filter.copay.map(|d| d.to_string()));
    push_condition(
        &mut conditions,
        "chief_complaint",
        filter.chief_complaint.clone(),
    );
    push_condition(&mut conditions, "pulse", filter.pulse);
    push_condition(&mut conditions, "systolic", filter.systolic);
    push_condition(&mut conditions, "diastolic", filter.diastolic);
    push_condition(
        &mut conditions,
        "date",
        filter.date.map(|d| d.format("%Y-%m-%d").to_string()),
    );
    conditions
}
