//! # Catalog Filter Model
//!
//! The parameter set for public catalog queries. This is pure data with
//! serde defaults; turning it into SQL is the persistence layer's job.
//!
//! Semantics (enforced by `ProductRepository::query_catalog`):
//! - `is_active = true` is always applied; inactive products never appear.
//! - `search` matches case-insensitively as a substring against name, sku,
//!   description, brand and tags (OR across fields).
//! - The remaining filters are AND-ed predicates, applied only when present;
//!   price bounds are inclusive.
//! - Sorting is by one key with an `id` ascending tie-break, so pagination
//!   with `limit`/`offset` is reproducible across equal sort keys.

use serde::{Deserialize, Serialize};

/// Sort key for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Lexicographic by product name (default).
    Name,
    /// Numeric by price.
    Price,
    /// By creation timestamp.
    Created,
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::Name
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// Filter/sort/pagination parameters for the public catalog.
///
/// Absent `limit` means unbounded: all matching rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    /// stock_quantity > 0.
    pub in_stock: Option<bool>,
    /// is_featured = true.
    pub featured: Option<bool>,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CatalogFilter {
    /// Filter for featured products only, a common storefront shortcut.
    pub fn featured_only() -> Self {
        CatalogFilter {
            featured: Some(true),
            ..Default::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_name_ascending() {
        let filter = CatalogFilter::default();
        assert_eq!(filter.sort_by, SortBy::Name);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert!(filter.limit.is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let filter: CatalogFilter =
            serde_json::from_str(r#"{"search":"usb","sort_by":"price","sort_order":"desc"}"#)
                .unwrap();
        assert_eq!(filter.search.as_deref(), Some("usb"));
        assert_eq!(filter.sort_by, SortBy::Price);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert_eq!(filter.category, None);
    }
}
