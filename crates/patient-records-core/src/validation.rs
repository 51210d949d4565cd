//! Field validation rules shared by patients and encounters.
//!
//! Format checks run at the request boundary and collect every violation;
//! the membership and scale predicates are also used by the rule engines.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// The 50 US state codes accepted for a patient address.
pub const VALID_STATES: [&str; 50] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "IA", "ID", "IL", "IN", "KS",
    "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM",
    "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VT", "WA", "WI",
    "WV", "WY",
];

/// Accepted patient genders.
pub const VALID_GENDERS: [&str; 3] = ["Male", "Female", "Other"];

pub const MIN_TEXT_LENGTH: usize = 3;
pub const MONEY_SCALE: u32 = 2;
const MONEY_INTEGER_DIGITS: u32 = 20;

pub const SSN_FORMAT_ERROR: &str = "SSN did not meet required format, example: '123-45-6789'";
pub const EMAIL_FORMAT_ERROR: &str = "Must be an email format";
pub const POSTAL_CODE_FORMAT_ERROR: &str =
    "Postal code did not meet required format, example: '12345' or '12345-1234'";
pub const VISIT_CODE_FORMAT_ERROR: &str =
    "Visit code did not meet required format: example 'H7J 8W2'";
pub const BILLING_CODE_FORMAT_ERROR: &str =
    "Billing code did not meet required format, example: '123.456.789-12'";
pub const ICD10_FORMAT_ERROR: &str = "ICD10 code did not meet required format, example: 'A22'";

pub static SSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}-[0-9]{2}-[0-9]{4}$").unwrap());
pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.+@.+\..+$").unwrap());
pub static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());
pub static VISIT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d[A-Z] \d[A-Z]\d$").unwrap());
// Group separators match any character: `123x456x789-12` is accepted.
pub static BILLING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3}.){2}\d{3}-\d{2}$").unwrap());
pub static ICD10_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]\d{2}$").unwrap());

/// One or more field-level violations in a request body.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", .messages.join(", "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

pub fn is_valid_state(state: &str) -> bool {
    VALID_STATES.contains(&state)
}

pub fn is_valid_gender(gender: &str) -> bool {
    VALID_GENDERS.contains(&gender)
}

/// Whether the decimal is written with exactly `scale` fractional digits.
///
/// `0.1` and `0.10` are equal in value but only the latter has scale 2.
pub fn has_exact_scale(value: &Decimal, scale: u32) -> bool {
    value.scale() == scale
}

/// Collects violations while extracting field values from a payload.
///
/// Each check returns the value (or its default when absent) so a domain
/// struct can be built in one pass; [`FieldChecks::finish`] decides whether
/// that struct may be used.
#[derive(Debug, Default)]
pub struct FieldChecks {
    messages: Vec<String>,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, message: String) {
        self.messages.push(message);
    }

    /// Value must be present.
    pub fn required<T: Default>(&mut self, field: &str, value: Option<T>) -> T {
        match value {
            Some(v) => v,
            None => {
                self.fail(format!("{field} is a required field"));
                T::default()
            }
        }
    }

    /// Value must be present and contain a non-whitespace character.
    pub fn not_blank(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            other => {
                self.fail(format!("{field} is a required field"));
                other.unwrap_or_default()
            }
        }
    }

    /// Value must be non-blank and at least three characters long.
    pub fn text(&mut self, field: &str, value: Option<String>) -> String {
        let present = value.is_some();
        let value = self.not_blank(field, value);
        if present && value.chars().count() < MIN_TEXT_LENGTH {
            self.fail(format!(
                "{field} must have at least {MIN_TEXT_LENGTH} characters"
            ));
        }
        value
    }

    /// Value must be non-blank and fully match `pattern`.
    pub fn pattern(
        &mut self,
        field: &str,
        value: Option<String>,
        pattern: &Regex,
        message: &str,
    ) -> String {
        let present = value.is_some();
        let value = self.not_blank(field, value);
        if present && !pattern.is_match(&value) {
            self.fail(message.to_string());
        }
        value
    }

    /// Value must be present and greater than zero.
    pub fn positive(&mut self, field: &str, value: Option<i32>) -> i32 {
        let present = value.is_some();
        let value = self.required(field, value);
        if present && value <= 0 {
            self.fail(format!("{field} must be a positive value"));
        }
        value
    }

    /// Value may be absent; when present it must be greater than zero.
    pub fn optional_positive(&mut self, field: &str, value: Option<i32>) -> Option<i32> {
        if let Some(v) = value {
            if v <= 0 {
                self.fail(format!("{field} must be a positive value"));
            }
        }
        value
    }

    /// Money amount: present, non-negative, at most two fractional digits.
    pub fn money(&mut self, field: &str, value: Option<Decimal>) -> Decimal {
        let present = value.is_some();
        let value = self.required(field, value);
        if !present {
            return value;
        }

        let integer_limit = Decimal::from_i128_with_scale(10_i128.pow(MONEY_INTEGER_DIGITS), 0);
        if value.scale() > MONEY_SCALE || value.abs().trunc() >= integer_limit {
            self.fail(format!("{field} must have two decimal places"));
        }
        if value.is_sign_negative() && !value.is_zero() {
            self.fail(format!("{field} must be a positive value or zero"));
        }
        value
    }

    /// Ok when no check failed.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                messages: self.messages,
            })
        }
    }
}
