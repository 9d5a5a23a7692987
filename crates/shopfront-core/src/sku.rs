//! # SKU Module
//!
//! Deterministic SKU synthesis: `{CATEGORY_CODE}-{SEQUENCE}-{YEAR}`.
//!
//! The sequence is the position of the product within its category
//! (existing count + 1), zero-padded to three digits. The year is the
//! calendar year at generation time, passed in by the caller — this module
//! never reads the clock.
//!
//! ## Collision handling
//! Counting rows and adding one is not collision-free: two concurrent
//! requests can compute the same sequence, and deletions free low sequence
//! numbers that may clash with a surviving SKU from another year. The store
//! layer relies on the UNIQUE(sku) constraint to surface such collisions and
//! retries with a bumped sequence (see `ProductRepository` in shopfront-db).
//! The visible format produced here never changes.

use crate::SKU_SEQUENCE_WIDTH;

/// Formats a SKU from its parts: `CODE-NNN-YYYY`.
///
/// The sequence is zero-padded to [`SKU_SEQUENCE_WIDTH`] digits; sequences
/// beyond 999 simply widen the field rather than wrap.
///
/// ## Example
/// ```rust
/// use shopfront_core::sku::format_sku;
///
/// assert_eq!(format_sku("ELEC", 7, 2026), "ELEC-007-2026");
/// assert_eq!(format_sku("ELEC", 1234, 2026), "ELEC-1234-2026");
/// ```
pub fn format_sku(category_code: &str, sequence: u32, year: i32) -> String {
    format!(
        "{}-{:0width$}-{}",
        category_code,
        sequence,
        year,
        width = SKU_SEQUENCE_WIDTH
    )
}

/// The next SKU for a category that already holds `existing_count` products.
#[inline]
pub fn next_sku(category_code: &str, existing_count: i64, year: i32) -> String {
    format_sku(category_code, existing_count as u32 + 1, year)
}

/// Splits a SKU into (category_code, sequence, year), if it matches the
/// generated format. Hand-supplied SKUs may legitimately fail this.
pub fn parse_sku(sku: &str) -> Option<(&str, u32, i32)> {
    let (rest, year) = sku.rsplit_once('-')?;
    let (code, seq) = rest.rsplit_once('-')?;
    if code.is_empty() || seq.len() < SKU_SEQUENCE_WIDTH {
        return None;
    }
    Some((code, seq.parse().ok()?, year.parse().ok()?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_sku("ELEC", 1, 2026), "ELEC-001-2026");
        assert_eq!(format_sku("ELEC", 42, 2026), "ELEC-042-2026");
        assert_eq!(format_sku("ELEC", 999, 2026), "ELEC-999-2026");
    }

    #[test]
    fn widens_past_three_digits() {
        assert_eq!(format_sku("GRO", 1000, 2026), "GRO-1000-2026");
    }

    #[test]
    fn next_sku_is_count_plus_one() {
        assert_eq!(next_sku("ELEC", 0, 2026), "ELEC-001-2026");
        assert_eq!(next_sku("ELEC", 41, 2026), "ELEC-042-2026");
    }

    #[test]
    fn parse_roundtrip() {
        assert_eq!(parse_sku("ELEC-007-2026"), Some(("ELEC", 7, 2026)));
        assert_eq!(parse_sku("A-B-001-2026"), Some(("A-B", 1, 2026)));
        assert_eq!(parse_sku("no-pattern"), None);
        assert_eq!(parse_sku("FREEFORM"), None);
    }
}
