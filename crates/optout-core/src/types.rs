//! Shared types used across the optout workspace.

use crate::error::OptoutError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for form-definition identifiers with validation.
///
/// Form IDs must be lowercase alphanumeric with hyphens, 3-50 characters
/// (e.g., "parent", "myself-international", "master-combined").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(String);

impl FormId {
    /// Create a new `FormId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, OptoutError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate form ID format: lowercase alphanumeric with hyphens, 3-50 chars.
    fn validate(id: &str) -> Result<(), OptoutError> {
        static FORM_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = FORM_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if id.len() < 3 || id.len() > 50 {
            return Err(OptoutError::Validation(format!(
                "invalid form ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(OptoutError::Validation(format!(
                "invalid form ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_id_valid() {
        let valid_ids = vec![
            "parent",
            "myself-international",
            "educator-domestic",
            "master-combined",
            "abc",
        ];

        for id in valid_ids {
            assert!(FormId::new(id).is_ok(), "Failed for: {id}");
        }
    }

    #[test]
    fn test_form_id_invalid() {
        let too_long = "a".repeat(51);
        let invalid_ids = vec![
            "ab",               // Too short
            "Parent",           // Uppercase
            "my_self",          // Underscore
            "my self",          // Space
            "-parent",          // Starts with hyphen
            "parent-",          // Ends with hyphen
            too_long.as_str(),  // Too long
        ];

        for id in invalid_ids {
            assert!(FormId::new(id).is_err(), "Should fail for: {id}");
        }
    }
}
