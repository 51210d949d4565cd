//! Patient models.

use serde::{Deserialize, Serialize};

use crate::validation::{self, FieldChecks, ValidationError};

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Database id - None until the record is persisted
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    /// Social Security Number, `###-##-####`
    pub ssn: String,
    /// Unique among all patients
    pub email: String,
    pub age: i32,
    /// Height in inches
    pub height: i32,
    /// Weight in pounds
    pub weight: i32,
    /// Insurance provider
    pub insurance: String,
    /// One of [`validation::VALID_GENDERS`]
    pub gender: String,
    pub street: String,
    pub city: String,
    /// Two character US state code
    pub state: String,
    /// `#####` or `#####-####`
    pub postal: String,
}

impl Patient {
    /// Copy of this patient carrying the given database id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Patient request body as received over the wire.
///
/// Every field is optional so that missing values surface as field-level
/// validation messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ssn: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub insurance: Option<String>,
    pub gender: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
}

impl TryFrom<PatientPayload> for Patient {
    type Error = ValidationError;

    fn try_from(payload: PatientPayload) -> Result<Self, Self::Error> {
        let mut checks = FieldChecks::new();

        let patient = Patient {
            id: payload.id,
            first_name: checks.text("First name", payload.first_name),
            last_name: checks.text("Last name", payload.last_name),
            ssn: checks.pattern(
                "SSN",
                payload.ssn,
                &validation::SSN,
                validation::SSN_FORMAT_ERROR,
            ),
            email: checks.pattern(
                "Email",
                payload.email,
                &validation::EMAIL,
                validation::EMAIL_FORMAT_ERROR,
            ),
            age: checks.positive("Age", payload.age),
            height: checks.positive("Height", payload.height),
            weight: checks.positive("Weight", payload.weight),
            insurance: checks.text("Insurance", payload.insurance),
            gender: checks.not_blank("Gender", payload.gender),
            street: checks.text("Street", payload.street),
            city: checks.text("City", payload.city),
            state: checks.not_blank("State", payload.state),
            postal: checks.pattern(
                "Postal code",
                payload.postal,
                &validation::POSTAL_CODE,
                validation::POSTAL_CODE_FORMAT_ERROR,
            ),
        };

        checks.finish()?;
        Ok(patient)
    }
}

/// Example filter for patient queries. Unset fields are wildcards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientFilter {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ssn: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub insurance: Option<String>,
    pub gender: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
}

impl PatientFilter {
    /// True when no field constrains the query.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
