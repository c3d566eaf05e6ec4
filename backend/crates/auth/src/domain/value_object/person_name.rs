//! Person Name Value Object
//!
//! First and last names given at registration. Free text, shown next to
//! posts by the frontend.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum name length in characters
pub const PERSON_NAME_MAX_LENGTH: usize = 100;

/// A trimmed, non-empty first or last name
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Create a new name with validation
    ///
    /// `field` only appears in error messages ("First name cannot be empty").
    pub fn new(value: impl Into<String>, field: &'static str) -> AppResult<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(AppError::bad_request(format!("{} cannot be empty", field)));
        }

        let char_count = value.chars().count();
        if char_count > PERSON_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "{} must be at most {} characters",
                field, PERSON_NAME_MAX_LENGTH
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(AppError::bad_request(format!(
                "{} contains invalid characters",
                field
            )));
        }

        Ok(Self(value))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = PersonName::new("  Ada ", "First name").unwrap();
        assert_eq!(name.as_str(), "Ada");
        assert_eq!(name.to_string(), "Ada");
    }

    #[test]
    fn test_empty_name_names_the_field() {
        let err = PersonName::new(" \t", "Last name").unwrap_err();
        assert_eq!(err.message(), "Last name cannot be empty");
    }

    #[test]
    fn test_name_limits() {
        assert!(PersonName::new("é".repeat(PERSON_NAME_MAX_LENGTH), "First name").is_ok());
        assert!(PersonName::new("a".repeat(PERSON_NAME_MAX_LENGTH + 1), "First name").is_err());
        assert!(PersonName::new("Ada\u{0000}", "First name").is_err());
    }
}
