//! Display Name Value Object
//!
//! The name shown on the home, members and admin views. Not a login
//! identifier, so no uniqueness and no character whitelist; just bounds.
//!
//! ## Invariants
//! - Non-empty after trimming
//! - At most 100 characters (after NFKC normalization)

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for display names (in characters)
pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

/// Display name value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new display name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let normalized: String = name.into().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }

        if trimmed.chars().count() > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                DISPLAY_NAME_MAX_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_valid() {
        assert!(DisplayName::new("Alice").is_ok());
        assert!(DisplayName::new("山田 太郎").is_ok());
        assert!(DisplayName::new("A").is_ok());
    }

    #[test]
    fn test_display_name_empty() {
        assert!(DisplayName::new("").is_err());
        assert!(DisplayName::new("   ").is_err());
    }

    #[test]
    fn test_display_name_too_long() {
        let name = "a".repeat(DISPLAY_NAME_MAX_LENGTH + 1);
        assert!(DisplayName::new(name).is_err());

        let name = "a".repeat(DISPLAY_NAME_MAX_LENGTH);
        assert!(DisplayName::new(name).is_ok());
    }

    #[test]
    fn test_display_name_trimmed() {
        let name = DisplayName::new("  Alice  ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }
}
