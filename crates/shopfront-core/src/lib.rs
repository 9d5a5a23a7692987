//! # shopfront-core: Pure Business Logic for Shopfront
//!
//! The heart of the inventory/point-of-sale system. Everything in this crate
//! is a deterministic function over plain types.
//!
//! ## Architecture Position
//! ```text
//! HTTP handlers (apps/server)
//!        │
//!        ▼
//! shopfront-core (THIS CRATE)   money · sku · receipt · catalog · validation
//!        │
//!        ▼
//! shopfront-db                  SQLite queries, migrations, repositories
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Receipt, etc.)
//! - [`money`] - Integer-cents [`money::Money`] and basis-point [`money::Rate`]
//! - [`sku`] - SKU formatting (`CODE-NNN-YYYY`)
//! - [`receipt`] - Receipt totals computation
//! - [`catalog`] - Catalog filter/sort model
//! - [`validation`] - Field-level input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. No I/O: database, network and clock access are forbidden here; callers
//!    pass timestamps and counts in.
//! 2. Integer money: all monetary values are cents (i64), rates are basis
//!    points, rounding is round-half-even and happens in exactly one place.
//! 3. Explicit errors: typed enums, never strings or panics.

pub mod catalog;
pub mod error;
pub mod money;
pub mod receipt;
pub mod sku;
pub mod types;
pub mod validation;

pub use catalog::{CatalogFilter, SortBy, SortOrder};
pub use error::{CoreError, ValidationError};
pub use money::{Money, Rate};
pub use receipt::ReceiptTotals;
pub use types::*;

/// Stock level at or below which a product counts as "low stock".
///
/// The same constant drives both the analytics aggregate (products with
/// `stock_quantity <= LOW_STOCK_THRESHOLD`, which includes out-of-stock
/// rows) and the display-oriented [`types::StockStatus`] banding, so the
/// two can never drift apart.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Zero-pad width for the sequence part of generated SKUs.
pub const SKU_SEQUENCE_WIDTH: usize = 3;

/// Maximum attempts when a generated SKU or receipt number collides with an
/// existing row before the operation fails permanently.
pub const MAX_GENERATE_ATTEMPTS: u32 = 5;

/// Hard cap on rows returned by the admin product listing.
pub const ADMIN_LIST_CAP: u32 = 100;
