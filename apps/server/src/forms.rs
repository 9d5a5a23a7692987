//! Lenient request deserialization.
//!
//! HTML-form clients send numbers as strings and clear optional fields to
//! empty strings. Every request DTO normalizes those shapes here, once,
//! before validation; handlers only ever see clean values.

use serde::{Deserialize, Deserializer};

use shopfront_core::catalog::{CatalogFilter, SortBy, SortOrder};
use shopfront_core::validation::validate_search_query;
use shopfront_core::ValidationError;

// =============================================================================
// Field Deserializers
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrString {
    Num(i64),
    Str(String),
}

/// An i64 that also accepts a numeric string (`1999` or `"1999"`).
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Optional i64; absent, null and `""` all mean `None`.
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumOrString::Num(n)) => Ok(Some(n)),
        Some(NumOrString::Str(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}")))
        }
    }
}

/// Optional string; `""` and whitespace-only collapse to `None`.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }))
}

// =============================================================================
// Catalog Query
// =============================================================================

/// Raw query parameters for `GET /api/catalog`. Everything arrives as an
/// optional string; [`CatalogQuery::into_filter`] normalizes and validates.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price_cents: Option<String>,
    pub max_price_cents: Option<String>,
    pub in_stock: Option<String>,
    pub featured: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl CatalogQuery {
    pub fn into_filter(self) -> Result<CatalogFilter, ValidationError> {
        let search = match self.search.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(validate_search_query(s)?),
        };

        Ok(CatalogFilter {
            search,
            category: none_if_empty(self.category),
            min_price_cents: parse_opt(self.min_price_cents, "min_price_cents")?,
            max_price_cents: parse_opt(self.max_price_cents, "max_price_cents")?,
            in_stock: parse_opt_bool(self.in_stock, "in_stock")?,
            featured: parse_opt_bool(self.featured, "featured")?,
            sort_by: parse_sort_by(self.sort_by.as_deref())?,
            sort_order: parse_sort_order(self.sort_order.as_deref())?,
            limit: parse_opt(self.limit, "limit")?,
            offset: parse_opt(self.offset, "offset")?,
        })
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    })
}

fn parse_opt<T: std::str::FromStr>(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<T>, ValidationError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| ValidationError::InvalidFormat {
            field,
            reason: format!("{s:?} is not a number"),
        }),
    }
}

fn parse_opt_bool(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<bool>, ValidationError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(s) => Err(ValidationError::InvalidFormat {
            field,
            reason: format!("{s:?} is not a boolean"),
        }),
    }
}

fn parse_sort_by(value: Option<&str>) -> Result<SortBy, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(SortBy::default()),
        Some("name") => Ok(SortBy::Name),
        Some("price") => Ok(SortBy::Price),
        Some("created") => Ok(SortBy::Created),
        Some(s) => Err(ValidationError::InvalidFormat {
            field: "sort_by",
            reason: format!("{s:?} is not one of name, price, created"),
        }),
    }
}

fn parse_sort_order(value: Option<&str>) -> Result<SortOrder, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(SortOrder::default()),
        Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(s) => Err(ValidationError::InvalidFormat {
            field: "sort_order",
            reason: format!("{s:?} is not one of asc, desc"),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "lenient_i64")]
        price: i64,
        #[serde(default, deserialize_with = "lenient_opt_i64")]
        stock: Option<i64>,
        #[serde(default, deserialize_with = "empty_as_none")]
        brand: Option<String>,
    }

    #[test]
    fn numbers_accept_both_shapes() {
        let p: Probe = serde_json::from_str(r#"{"price": 1999}"#).unwrap();
        assert_eq!(p.price, 1999);

        let p: Probe = serde_json::from_str(r#"{"price": "1999", "stock": "5"}"#).unwrap();
        assert_eq!(p.price, 1999);
        assert_eq!(p.stock, Some(5));
    }

    #[test]
    fn empty_strings_collapse_to_none() {
        let p: Probe =
            serde_json::from_str(r#"{"price": "10", "stock": "", "brand": "  "}"#).unwrap();
        assert_eq!(p.stock, None);
        assert_eq!(p.brand, None);
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{"price": "ten"}"#).is_err());
    }

    #[test]
    fn catalog_query_normalizes() {
        let query = CatalogQuery {
            search: Some("  usb  ".to_string()),
            min_price_cents: Some("500".to_string()),
            max_price_cents: Some("".to_string()),
            in_stock: Some("true".to_string()),
            sort_by: Some("price".to_string()),
            sort_order: Some("desc".to_string()),
            limit: Some("20".to_string()),
            ..Default::default()
        };

        let filter = query.into_filter().unwrap();
        assert_eq!(filter.search.as_deref(), Some("usb"));
        assert_eq!(filter.min_price_cents, Some(500));
        assert_eq!(filter.max_price_cents, None);
        assert_eq!(filter.in_stock, Some(true));
        assert_eq!(filter.sort_by, SortBy::Price);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert_eq!(filter.limit, Some(20));
    }

    #[test]
    fn catalog_query_rejects_bad_enums() {
        let query = CatalogQuery {
            sort_by: Some("alphabetical".to_string()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }
}
