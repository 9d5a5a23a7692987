//! # shopfront-db: Database Layer for Shopfront
//!
//! SQLite persistence for the inventory/point-of-sale system.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./shopfront.db")).await?;
//! let products = db.products().query_catalog(&filter).await?;
//! ```
//!
//! ## Correctness model
//! Requests perform bounded sequences of reads and writes with no
//! application-level locking; uniqueness (sku, receipt_number, category
//! code/name, wishlist pairs) is enforced entirely by store constraints.
//! The two count-then-format generators (SKU, receipt number) catch their
//! own uniqueness conflicts and retry with a recomputed value, bounded by
//! `MAX_GENERATE_ATTEMPTS`.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::product::{NewProduct, ProductRepository, ProductUpdate};
pub use repository::receipt::{NewReceipt, NewReceiptItem, ReceiptRepository, ReceiptWithItems};
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
pub use repository::wishlist::WishlistRepository;
