//! Domain error types.

use thiserror::Error;

/// A violated validation rule on a single field.
///
/// Validators stop at the first violated rule, so one error names one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a required value that was not supplied.
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// Result type for validators.
pub type Result<T> = std::result::Result<T, ValidationError>;
