//! # Repositories
//!
//! One repository per aggregate, each a thin struct over the shared pool.
//! Construct them through the [`crate::Database`] accessors.

pub mod category;
pub mod product;
pub mod receipt;
pub mod review;
pub mod user;
pub mod wishlist;

use uuid::Uuid;

/// Generates a fresh entity id (UUID v4).
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
