//! Form validation primitives shared by the domain services.

use std::collections::BTreeMap;
use std::fmt;

use super::errors::{ServiceError, ServiceResult};

/// Key under which errors that belong to no single field are collected
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Validation messages collected per form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    /// `Ok(())` when nothing was collected, otherwise a validation error
    pub fn into_result(self) -> ServiceResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }

    /// Record a "required" error when the trimmed value is empty.
    /// Returns true when the value is present.
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, REQUIRED_MESSAGE);
            false
        } else {
            true
        }
    }

    /// Like [`Self::require`] but whitespace counts as a value, as for password fields
    pub fn require_unstripped(&mut self, field: &str, value: &str) -> bool {
        if value.is_empty() {
            self.add(field, REQUIRED_MESSAGE);
            false
        } else {
            true
        }
    }

    pub fn check_max_length(&mut self, field: &str, value: &str, max: usize) {
        let length = value.chars().count();
        if length > max {
            self.add(
                field,
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    max, length
                ),
            );
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LicenseNumberError {
    #[error("License number should consist of 8 characters")]
    WrongLength,
    #[error("First 3 characters should be uppercase letters")]
    LettersExpected,
    #[error("Last 5 characters should be digits")]
    DigitsExpected,
}

/// A license number is three uppercase ASCII letters followed by five ASCII digits
pub fn validate_license_number(candidate: &str) -> Result<(), LicenseNumberError> {
    let bytes = candidate.as_bytes();

    // Byte length equals char length only for ASCII; anything else fails below anyway
    if candidate.chars().count() != 8 {
        return Err(LicenseNumberError::WrongLength);
    }
    if bytes.len() != 8 || !bytes[..3].iter().all(u8::is_ascii_uppercase) {
        return Err(LicenseNumberError::LettersExpected);
    }
    if !bytes[3..].iter().all(u8::is_ascii_digit) {
        return Err(LicenseNumberError::DigitsExpected);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_license_numbers() {
        for candidate in ["ABC12345", "DEF67890", "ZZZ00000"] {
            assert_eq!(validate_license_number(candidate), Ok(()), "{}", candidate);
        }
    }

    #[test]
    fn test_license_number_length() {
        for candidate in ["", "ABC1234", "ABC123456", "AB12345"] {
            assert_eq!(
                validate_license_number(candidate),
                Err(LicenseNumberError::WrongLength),
                "{}",
                candidate
            );
        }
    }

    #[test]
    fn test_license_number_letters() {
        for candidate in ["abc12345", "AbC12345", "A1C12345", "12345678", "ÄBC12345"] {
            assert_eq!(
                validate_license_number(candidate),
                Err(LicenseNumberError::LettersExpected),
                "{}",
                candidate
            );
        }
    }

    #[test]
    fn test_license_number_digits() {
        for candidate in ["ABCD1234", "ABC1234X", "ABC12 45", "ABCDEFGH"] {
            assert_eq!(
                validate_license_number(candidate),
                Err(LicenseNumberError::DigitsExpected),
                "{}",
                candidate
            );
        }
    }

    #[test]
    fn test_form_errors_collects_per_field() {
        let mut errors = FormErrors::new();
        assert!(errors.require("name", "bmw"));
        assert!(!errors.require("country", "   "));
        errors.add("country", "second message");
        errors.check_max_length("name", "abcdef", 3);

        assert!(errors.has_error("country"));
        assert_eq!(
            errors.get("country").unwrap(),
            &[REQUIRED_MESSAGE.to_string(), "second message".to_string()]
        );
        assert_eq!(
            errors.get("name").unwrap(),
            &["Ensure this value has at most 3 characters (it has 6).".to_string()]
        );
        assert!(matches!(errors.into_result(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_empty_form_errors_is_ok() {
        assert!(FormErrors::new().into_result().is_ok());
    }
}
