//! # Domain Types
//!
//! Core domain types shared by the persistence and API layers.
//!
//! ## Identity & ownership
//! Every entity carries a UUID v4 `id` for relations plus, where one exists,
//! a human-facing business identifier (category `code`, product `sku`,
//! receipt `receipt_number`). Receipts exclusively own their line items
//! (cascade lifecycle); products are only weakly referenced by receipt items
//! and wishlist rows — a line item is a frozen snapshot of the product at
//! sale time and must survive the product's deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Rate};
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Category
// =============================================================================

/// A product category. `code` is the short uppercase string used as the SKU
/// prefix; id and code are immutable once products reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Barcode Type
// =============================================================================

/// Supported barcode symbologies for product labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum BarcodeType {
    Code128,
    Code39,
    Ean13,
    Qr,
}

impl Default for BarcodeType {
    fn default() -> Self {
        BarcodeType::Code128
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock banding, computed from `stock_quantity`, never stored.
///
/// 0 → out of stock, 1..=10 → low stock, >10 → in stock. The boundary is
/// [`LOW_STOCK_THRESHOLD`]; the analytics low-stock aggregate uses the same
/// constant (and by counting `<= 10` deliberately includes out-of-stock
/// rows, see `ProductStats`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    /// Bands a raw stock quantity.
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity <= LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `sku` is globally unique; when auto-generated it encodes category,
/// sequence and year (`ELEC-001-2026`). `category_code` references
/// `Category::code`. Only `is_active` products appear in the public catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category_code: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Units on hand; never negative.
    pub stock_quantity: i64,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub barcode_type: BarcodeType,
    pub is_active: bool,
    pub is_featured: bool,
    /// Comma-separated free-form tags, searched as a plain substring.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Derived stock banding for display.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.stock_quantity)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A finalized sale. Immutable after creation; all amounts are recomputed
/// server-side from the line items before persisting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Receipt {
    pub id: String,
    pub receipt_number: String,
    pub customer_name: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub subtotal_cents: i64,
    /// Tax rate in basis points (825 = 8.25%).
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    /// Discount rate in basis points.
    pub discount_rate_bps: u32,
    pub discount_cents: i64,
    /// total = (subtotal − discount) + tax.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    #[inline]
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn discount_rate(&self) -> Rate {
        Rate::from_bps(self.discount_rate_bps)
    }
}

// =============================================================================
// Receipt Item
// =============================================================================

/// A line item on a receipt.
///
/// Snapshot pattern: `product_name`, `product_sku` and `unit_price_cents`
/// are frozen copies taken at sale time. `product_id` is a weak reference —
/// the product may be edited or deleted later without touching this row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReceiptItem {
    pub id: String,
    pub receipt_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    /// Quantity sold; always ≥ 1.
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// unit_price × quantity.
    pub total_price_cents: i64,
}

impl ReceiptItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Wishlist
// =============================================================================

/// One product saved by one anonymous browser session.
///
/// `session_id` is an opaque client-generated token, distinct from admin
/// auth sessions. At most one row exists per (session_id, product_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WishlistItem {
    pub id: String,
    pub session_id: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product Review
// =============================================================================

/// A customer review. Owned by the product (cascade-deleted with it).
/// Average rating is always computed from rows, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductReview {
    pub id: String,
    pub product_id: String,
    pub customer_name: String,
    /// 1-5 inclusive.
    pub rating: i64,
    pub review_text: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

/// An admin-panel account. The password hash is an argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Analytics
// =============================================================================

/// Scalar aggregates over the product table.
///
/// `low_stock_count` counts products with `stock_quantity <=`
/// [`LOW_STOCK_THRESHOLD`] — by definition this includes out-of-stock rows,
/// which the display layer bands separately. `total_products` and
/// `total_value_cents` cover all products regardless of `is_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    pub total_products: i64,
    /// Σ price_cents × stock_quantity over all products.
    pub total_value_cents: i64,
    pub low_stock_count: i64,
    pub categories_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_status_banding() {
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(11), StockStatus::InStock);
    }

    #[test]
    fn barcode_type_serde_names() {
        assert_eq!(serde_json::to_string(&BarcodeType::Ean13).unwrap(), "\"ean13\"");
        assert_eq!(
            serde_json::from_str::<BarcodeType>("\"qr\"").unwrap(),
            BarcodeType::Qr
        );
    }

    #[test]
    fn user_never_serializes_password_hash() {
        let user = User {
            id: "u1".into(),
            username: "admin".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
