//! # Validation Module
//!
//! Field-level input validation, run before any write. The database adds a
//! second line of defense (NOT NULL, UNIQUE, CHECK, foreign keys), but by
//! then the error is a constraint violation rather than field-level detail,
//! so everything user-facing is checked here first.
//!
//! ## Usage
//! ```rust
//! use shopfront_core::validation::{validate_category_code, validate_rating};
//!
//! assert!(validate_category_code("ELEC").is_ok());
//! assert!(validate_rating(5).is_ok());
//! assert!(validate_rating(6).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a category code (the SKU prefix).
///
/// ## Rules
/// - Required, at most 10 characters
/// - Alphanumeric only (it is embedded in SKUs between hyphens)
pub fn validate_category_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required { field: "code" });
    }
    if code.len() > 10 {
        return Err(ValidationError::TooLong { field: "code", max: 10 });
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "code",
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a category or product name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if name.len() > 200 {
        return Err(ValidationError::TooLong { field: "name", max: 200 });
    }

    Ok(())
}

/// Validates a hand-supplied SKU.
///
/// Generated SKUs always pass; supplied ones must fit the same alphabet.
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required { field: "sku" });
    }
    if sku.len() > 50 {
        return Err(ValidationError::TooLong { field: "sku", max: 50 });
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku",
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query. Empty is fine (no filter); overly long input
/// is rejected rather than truncated.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong { field: "search", max: 100 });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative { field: "price_cents" });
    }
    Ok(())
}

/// Validates a stock quantity.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative { field: "stock_quantity" });
    }
    Ok(())
}

/// Validates a line item quantity (must be at least 1).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::NotPositive { field: "quantity" });
    }
    Ok(())
}

/// Validates a review rating (1-5 inclusive).
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange { field: "rating", min: 1, max: 5 });
    }
    Ok(())
}

/// Validates a rate in basis points (0% to 100%).
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange { field: "rate", min: 0, max: 10_000 });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_code() {
        assert!(validate_category_code("ELEC").is_ok());
        assert!(validate_category_code("A1").is_ok());
        assert!(validate_category_code("").is_err());
        assert!(validate_category_code("   ").is_err());
        assert!(validate_category_code("TOO-LONG-CODE").is_err());
        assert!(validate_category_code("EL EC").is_err());
    }

    #[test]
    fn name() {
        assert!(validate_name("USB-C Cable 1m").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn sku() {
        assert!(validate_sku("ELEC-001-2026").is_ok());
        assert!(validate_sku("custom_sku_1").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(60)).is_err());
    }

    #[test]
    fn search_query_trims() {
        assert_eq!(validate_search_query("  usb  ").unwrap(), "usb");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn numeric_bounds() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn rating_range() {
        for r in 1..=5 {
            assert!(validate_rating(r).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn rate_bounds() {
        assert!(validate_rate_bps(0).is_ok());
        assert!(validate_rate_bps(10_000).is_ok());
        assert!(validate_rate_bps(10_001).is_err());
    }
}
