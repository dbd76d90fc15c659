//! Input validation with field-level messages

use crate::error::{CoreError, CoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bangladeshi mobile number: 11 digits, operator prefix 013-019
static MOBILE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[3-9]\d{8}$").expect("static regex"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));

/// A message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Collects field errors, then converts into a single [`CoreError`]
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, format!("{} is required", label)));
        }
        self
    }

    /// Empty values pass; use [`Validator::required`] as well when needed
    pub fn mobile_number(&mut self, field: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() && !is_mobile_number(value) {
            self.errors.push(FieldError::new(
                field,
                "Enter an 11 digit mobile number starting with 01",
            ));
        }
        self
    }

    pub fn positive_amount(&mut self, field: &str, value: &str) -> &mut Self {
        match parse_amount(value) {
            Some(v) if v > 0.0 => {}
            Some(_) => self.errors.push(FieldError::new(field, "Amount must be greater than 0")),
            None => self.errors.push(FieldError::new(field, "Enter a valid amount")),
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !EMAIL.is_match(value.trim()) {
            self.errors.push(FieldError::new(field, "Enter a valid email address"));
        }
        self
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, label: &str) -> &mut Self {
        if value.chars().count() < min {
            self.errors.push(FieldError::new(
                field,
                format!("{} must be at least {} characters", label, min),
            ));
        }
        self
    }

    pub fn matches(&mut self, field: &str, left: &str, right: &str, message: &str) -> &mut Self {
        if left != right {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when nothing was rejected
    pub fn finish(&mut self) -> CoreResult<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let fields = std::mem::take(&mut self.errors);
        let message = if fields.len() == 1 {
            fields[0].message.clone()
        } else {
            format!("Please fix {} fields", fields.len())
        };
        Err(CoreError::Validation { message, fields })
    }
}

pub fn is_mobile_number(value: &str) -> bool {
    MOBILE_NUMBER.is_match(value)
}

/// Parse a user-entered amount, tolerating thousands separators
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_number() {
        assert!(is_mobile_number("01700000000"));
        assert!(is_mobile_number("01912345678"));
        assert!(!is_mobile_number("01212345678"));
        assert!(!is_mobile_number("0170000000"));
        assert!(!is_mobile_number("+8801700000000"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,500.50"), Some(1500.5));
        assert_eq!(parse_amount(" 100 "), Some(100.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_validator_collects_errors() {
        let err = Validator::new()
            .required("company", "", "Company")
            .positive_amount("amount", "0")
            .mobile_number("customerNumber", "12345")
            .finish()
            .unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["company", "amount", "customerNumber"]);
        assert_eq!(err.to_string(), "Validation error: Please fix 3 fields");
    }

    #[test]
    fn test_validator_passes() {
        assert!(Validator::new()
            .required("company", "Bkash Personal", "Company")
            .positive_amount("amount", "100")
            .mobile_number("customerNumber", "")
            .email("email", "staff@debtelecom.com")
            .finish()
            .is_ok());
    }
}
