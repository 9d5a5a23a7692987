//! # Error Types
//!
//! Domain error types for shopfront-core.
//!
//! ## Error layering
//! ```text
//! ValidationError  - malformed input, surfaced with field-level detail
//! CoreError        - business rule violations (wraps ValidationError)
//! DbError          - persistence failures (shopfront-db)
//! ApiError         - what the HTTP client sees (apps/server)
//! ```
//!
//! Errors are enum variants with context, never strings, and carry enough
//! information for the API layer to map them onto the 4xx taxonomy
//! (validation → 400, not-found → 404, conflict → 409) without string
//! matching.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced category code does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A receipt must carry at least one line item.
    #[error("Receipt must contain at least one line item")]
    EmptyReceipt,

    /// Generated identifier kept colliding after the bounded retry budget.
    #[error("Could not generate a unique {kind} after {attempts} attempts")]
    GeneratorExhausted { kind: &'static str, attempts: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, detected before any write happens.
///
/// Each variant names the offending field so the API layer can surface
/// field-level detail.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// Value must be at least one.
    #[error("{field} must be at least 1")]
    NotPositive { field: &'static str },

    /// Invalid format (bad characters, unparseable number, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
}

impl ValidationError {
    /// The field this error is about, for field-level API responses.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::NotPositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = CoreError::CategoryNotFound("ELEC".to_string());
        assert_eq!(err.to_string(), "Category not found: ELEC");

        let err = ValidationError::Required { field: "name" };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange { field: "rating", min: 1, max: 5 };
        assert_eq!(err.to_string(), "rating must be between 1 and 5");
    }

    #[test]
    fn validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required { field: "sku" }.into();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn field_accessor() {
        let err = ValidationError::TooLong { field: "description", max: 2000 };
        assert_eq!(err.field(), "description");
    }
}
