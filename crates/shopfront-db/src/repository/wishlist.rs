//! # Wishlist Repository
//!
//! Wishlists belong to anonymous storefront sessions: the `session_id` is
//! an opaque client-generated token, unrelated to admin auth. The
//! UNIQUE(session_id, product_id) constraint keeps membership set-like;
//! `add` is idempotent on top of it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use shopfront_core::WishlistItem;

const COLUMNS: &str = "id, session_id, product_id, created_at";

/// Repository for wishlist database operations.
#[derive(Debug, Clone)]
pub struct WishlistRepository {
    pool: SqlitePool,
}

impl WishlistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        WishlistRepository { pool }
    }

    /// Adds a product to a session's wishlist. Idempotent: adding an
    /// existing member changes nothing and returns the existing row.
    ///
    /// ## Errors
    /// `DbError::ForeignKeyViolation` if the product does not exist.
    pub async fn add(&self, session_id: &str, product_id: &str) -> DbResult<WishlistItem> {
        debug!(session = %session_id, product = %product_id, "Wishlist add");

        sqlx::query(
            "INSERT INTO wishlist_items (id, session_id, product_id, created_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (session_id, product_id) DO NOTHING",
        )
        .bind(new_id())
        .bind(session_id)
        .bind(product_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        // Read back whichever row won: the fresh one or the pre-existing one.
        let item = sqlx::query_as::<_, WishlistItem>(&format!(
            "SELECT {COLUMNS} FROM wishlist_items WHERE session_id = ?1 AND product_id = ?2"
        ))
        .bind(session_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("WishlistItem", product_id))
    }

    /// Removes a product from a session's wishlist. Returns whether a row
    /// was actually deleted.
    pub async fn remove(&self, session_id: &str, product_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM wishlist_items WHERE session_id = ?1 AND product_id = ?2",
        )
        .bind(session_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a session's wishlist, oldest first.
    pub async fn list_for_session(&self, session_id: &str) -> DbResult<Vec<WishlistItem>> {
        let items = sqlx::query_as::<_, WishlistItem>(&format!(
            "SELECT {COLUMNS} FROM wishlist_items WHERE session_id = ?1 ORDER BY created_at, id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;

    async fn db_with_product() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.categories()
            .insert("Electronics", "ELEC", None, None)
            .await
            .unwrap();
        let product = db
            .products()
            .insert_with_generated_sku(&NewProduct::new("Cable", "ELEC", 999))
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn double_add_is_idempotent() {
        let (db, product_id) = db_with_product().await;
        let repo = db.wishlist();

        let first = repo.add("sess-1", &product_id).await.unwrap();
        let second = repo.add("sess-1", &product_id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.list_for_session("sess-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let (db, product_id) = db_with_product().await;
        let repo = db.wishlist();

        repo.add("sess-1", &product_id).await.unwrap();
        assert!(repo.list_for_session("sess-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_reports_membership() {
        let (db, product_id) = db_with_product().await;
        let repo = db.wishlist();

        repo.add("sess-1", &product_id).await.unwrap();
        assert!(repo.remove("sess-1", &product_id).await.unwrap());
        assert!(!repo.remove("sess-1", &product_id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let (db, _) = db_with_product().await;
        let err = db.wishlist().add("sess-1", "no-such-product").await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn product_deletion_cascades_into_wishlists() {
        let (db, product_id) = db_with_product().await;

        db.wishlist().add("sess-1", &product_id).await.unwrap();
        db.products().delete(&product_id).await.unwrap();

        assert!(db.wishlist().list_for_session("sess-1").await.unwrap().is_empty());
    }
}
