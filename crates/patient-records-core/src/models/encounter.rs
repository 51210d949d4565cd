//! Encounter models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{self, FieldChecks, ValidationError};

/// A single visit of a patient with a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    /// Database id - None until the record is persisted
    pub id: Option<i64>,
    /// Owning patient
    pub patient_id: i64,
    pub notes: Option<String>,
    /// Office visit code, e.g. `N3W 3C3`
    pub visit_code: String,
    pub provider: String,
    /// `###.###.###-##`
    pub billing_code: String,
    pub icd10: String,
    /// Total cost including copay, in US dollars
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_cost: Decimal,
    /// Patient copay, in US dollars
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub copay: Decimal,
    pub chief_complaint: String,
    pub pulse: Option<i32>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub date: NaiveDate,
}

impl Encounter {
    /// Copy of this encounter carrying the given database id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Encounter request body as received over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterPayload {
    pub id: Option<i64>,
    pub patient_id: Option<i64>,
    pub notes: Option<String>,
    pub visit_code: Option<String>,
    pub provider: Option<String>,
    pub billing_code: Option<String>,
    pub icd10: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub total_cost: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub copay: Option<Decimal>,
    pub chief_complaint: Option<String>,
    pub pulse: Option<i32>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub date: Option<NaiveDate>,
}

impl TryFrom<EncounterPayload> for Encounter {
    type Error = ValidationError;

    fn try_from(payload: EncounterPayload) -> Result<Self, Self::Error> {
        let mut checks = FieldChecks::new();

        let encounter = Encounter {
            id: payload.id,
            patient_id: checks.required("Patient ID", payload.patient_id),
            notes: payload.notes,
            visit_code: checks.pattern(
                "Visit code",
                payload.visit_code,
                &validation::VISIT_CODE,
                validation::VISIT_CODE_FORMAT_ERROR,
            ),
            provider: checks.text("Provider", payload.provider),
            billing_code: checks.pattern(
                "Billing code",
                payload.billing_code,
                &validation::BILLING_CODE,
                validation::BILLING_CODE_FORMAT_ERROR,
            ),
            icd10: checks.pattern(
                "ICD10",
                payload.icd10,
                &validation::ICD10_CODE,
                validation::ICD10_FORMAT_ERROR,
            ),
            total_cost: checks.money("Total cost", payload.total_cost),
            copay: checks.money("Copay", payload.copay),
            chief_complaint: checks.text("Chief complaint", payload.chief_complaint),
            pulse: checks.optional_positive("Pulse", payload.pulse),
            systolic: checks.optional_positive("Systolic", payload.systolic),
            diastolic: checks.optional_positive("Diastolic", payload.diastolic),
            date: checks.required("Date", payload.date),
        };

        checks.finish()?;
        Ok(encounter)
    }
}

/// Example filter for encounter queries. Unset fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterFilter {
    pub id: Option<i64>,
    pub patient_id: Option<i64>,
    pub notes: Option<String>,
    pub visit_code: Option<String>,
    pub provider: Option<String>,
    pub billing_code: Option<String>,
    pub icd10: Option<String>,
    pub total_cost: Option<Decimal>,
    pub copay: Option<Decimal>,
    pub chief_complaint: Option<String>,
    pub pulse: Option<i32>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub date: Option<NaiveDate>,
}

impl EncounterFilter {
    /// True when no field constrains the query.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload() -> EncounterPayload {
        EncounterPayload {
            id: None,
            patient_id: Some(1),
            notes: Some("Lots of interesting notes here".into()),
            visit_code: Some("N3W 3C3".into()),
            provider: Some("New Hospital".into()),
            billing_code: Some("123.456.789-00".into()),
            icd10: Some("Z99".into()),
            total_cost: Some(Decimal::from_str("145.00").unwrap()),
            copay: Some(Decimal::from_str("45.00").unwrap()),
            chief_complaint: Some("new complaint".into()),
            pulse: Some(75),
            systolic: Some(120),
            diastolic: Some(80),
            date: NaiveDate::from_ymd_opt(2020, 8, 4),
        }
    }

    #[test]
    fn test_valid_payload_converts() {
        let encounter = Encounter::try_from(payload()).unwrap();
        assert_eq!(encounter.patient_id, 1);
        assert_eq!(encounter.total_cost.scale(), 2);
    }

    #[test]
    fn test_optional_vitals_may_be_absent() {
        let mut p = payload();
        p.notes = None;
        p.pulse = None;
        p.systolic = None;
        p.diastolic = None;
        assert!(Encounter::try_from(p).is_ok());
    }

    #[test]
    fn test_field_violations() {
        let mut p = payload();
        p.visit_code = Some("n3w 3c3".into());
        p.icd10 = Some("Z9".into());
        p.pulse = Some(0);
        p.copay = Some(Decimal::from_str("-1.00").unwrap());
        p.date = None;

        let err = Encounter::try_from(p).unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 5);
        assert!(messages.contains(&validation::VISIT_CODE_FORMAT_ERROR.to_string()));
        assert!(messages.contains(&validation::ICD10_FORMAT_ERROR.to_string()));
        assert!(messages.contains(&"Pulse must be a positive value".to_string()));
        assert!(messages.contains(&"Copay must be a positive value or zero".to_string()));
        assert!(messages.contains(&"Date is a required field".to_string()));
    }

    #[test]
    fn test_json_keeps_decimal_scale() {
        let json = r#"{
            "patientId": 1,
            "visitCode": "N3W 3C3",
            "provider": "New Hospital",
            "billingCode": "123.456.789-00",
            "icd10": "Z99",
            "totalCost": 145.00,
            "copay": 0.1,
            "chiefComplaint": "anxiety",
            "date": "2020-08-24"
        }"#;

        let payload: EncounterPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.total_cost.unwrap().scale(), 2);
        assert_eq!(payload.copay.unwrap().scale(), 1);

        let encounter = Encounter::try_from(payload).unwrap().with_id(7);
        let out = serde_json::to_string(&encounter).unwrap();
        assert!(out.contains(r#""totalCost":145.00"#));
        assert!(out.contains(r#""date":"2020-08-24""#));
    }
}
