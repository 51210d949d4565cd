//! Patient database operations.

use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::{push_condition, where_clause, Conditions, Database, DbError, DbResult};
use crate::models::{Patient, PatientFilter};

const PATIENT_COLUMNS: &str = r#"
    id, first_name, last_name, ssn, email, age, height, weight,
    insurance, gender, street, city, state, postal
"#;

impl Database {
    /// Insert a new patient and return it with its generated id.
    ///
    /// Any id already set on `patient` is ignored.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<Patient> {
        self.conn.execute(
            r#"
            INSERT INTO patient (
                first_name, last_name, ssn, email, age, height, weight,
                insurance, gender, street, city, state, postal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                patient.first_name,
                patient.last_name,
                patient.ssn,
                patient.email,
                patient.age,
                patient.height,
                patient.weight,
                patient.insurance,
                patient.gender,
                patient.street,
                patient.city,
                patient.state,
                patient.postal,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(patient.clone().with_id(id))
    }

    /// Replace every field of an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let id = patient
            .id
            .ok_or_else(|| DbError::Constraint("patient update requires an id".into()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE patient SET
                first_name = ?2,
                last_name = ?3,
                ssn = ?4,
                email = ?5,
                age = ?6,
                height = ?7,
                weight = ?8,
                insurance = ?9,
                gender = ?10,
                street = ?11,
                city = ?12,
                state = ?13,
                postal = ?14
            WHERE id = ?1
            "#,
            params![
                id,
                patient.first_name,
                patient.last_name,
                patient.ssn,
                patient.email,
                patient.age,
                patient.height,
                patient.weight,
                patient.insurance,
                patient.gender,
                patient.street,
                patient.city,
                patient.state,
                patient.postal,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patient WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        self.find_patients(&PatientFilter::default())
    }

    /// Patients whose columns equal every set field of `filter`.
    pub fn find_patients(&self, filter: &PatientFilter) -> DbResult<Vec<Patient>> {
        let conditions = patient_conditions(filter);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patient {} ORDER BY id",
            where_clause(&conditions)
        ))?;

        let rows = stmt.query_map(
            params_from_iter(conditions.iter().map(|(_, value)| value)),
            patient_from_row,
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patient WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Whether a patient with this id exists.
    pub fn patient_exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patient WHERE id = ?)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Whether any patient already uses this email.
    pub fn patient_email_exists(&self, email: &str) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patient WHERE email = ?)",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: Some(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        ssn: row.get(3)?,
        email: row.get(4)?,
        age: row.get(5)?,
        height: row.get(6)?,
        weight: row.get(7)?,
        insurance: row.get(8)?,
        gender: row.get(9)?,
        street: row.get(10)?,
        city: row.get(11)?,
        state: row.get(12)?,
        postal: row.get(13)?,
    })
}

fn patient_conditions(filter: &PatientFilter) -> Conditions {
    let mut conditions = Conditions::new();
    push_condition(&mut conditions, "id", filter.id);
    push_condition(&mut conditions, "first_name", filter.first_name.clone());
    push_condition(&mut conditions, "last_name", filter.last_name.clone());
    push_condition(&mut conditions, "ssn", filter.ssn.clone());
    push_condition(&mut conditions, "email", filter.email.clone());
    push_condition(&mut conditions, "age", filter.age);
    push_condition(&mut conditions, "height", filter.height);
    push_condition(&mut conditions, "weight", filter.weight);
    push_condition(&mut conditions, "insurance", filter.insurance.clone());
    push_condition(&mut conditions, "gender", filter.gender.clone());
    push_condition(&mut conditions, "street", filter.street.clone());
    push_condition(&mut conditions, "city", filter.city.clone());
    push_condition(&mut conditions, "state", filter.state.clone());
    push_condition(&mut conditions, "postal", filter.postal.clone());
    conditions
}
