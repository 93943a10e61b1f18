//! Unified error types for the domain layer
//!
//! Only malformed top-level input is reported through [`DomainError`]. A single
//! bad rule element never produces an error; contributing systems log it and
//! move on.

use thiserror::Error;

use crate::value_objects::Ability;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The character snapshot has no score for a required ability
    #[error("Missing ability score: {0}")]
    MissingAbilityScore(Ability),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The rules table document could not be read at all
    #[error("Rules table error: {0}")]
    RulesTable(String),
}

impl DomainError {
    /// Creates a validation error for malformed snapshot input.
    ///
    /// # Example
    /// ```ignore
    /// if class.level == 0 {
    ///     return Err(DomainError::validation("class level must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a rules table error
    pub fn rules_table(msg: impl Into<String>) -> Self {
        Self::RulesTable(msg.into())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::RulesTable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("class level must be at least 1");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: class level must be at least 1"
        );
    }

    #[test]
    fn test_missing_ability_error() {
        let err = DomainError::MissingAbilityScore(Ability::Constitution);
        assert_eq!(err.to_string(), "Missing ability score: constitution");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let domain_err: DomainError = json_err.into();
        assert!(matches!(domain_err, DomainError::RulesTable(_)));
    }
}
