//! HTTP handlers, one module per resource.

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod products;
pub mod receipts;
pub mod reviews;
pub mod uploads;
pub mod wishlist;
