//! # Review Repository
//!
//! Reviews are owned by their product (cascade-deleted with it). The
//! average rating is computed from the rows on every read, never stored,
//! so it can't drift.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use shopfront_core::ProductReview;

const COLUMNS: &str = "id, product_id, customer_name, rating, review_text, is_verified, created_at";

/// Repository for product review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Inserts a review. The rating range (1..=5) is validated upstream and
    /// backstopped by a CHECK constraint.
    ///
    /// ## Errors
    /// `DbError::ForeignKeyViolation` if the product does not exist.
    pub async fn insert(
        &self,
        product_id: &str,
        customer_name: &str,
        rating: i64,
        review_text: Option<&str>,
    ) -> DbResult<ProductReview> {
        let review = ProductReview {
            id: new_id(),
            product_id: product_id.to_string(),
            customer_name: customer_name.to_string(),
            rating,
            review_text: review_text.map(str::to_string),
            is_verified: false,
            created_at: Utc::now(),
        };

        debug!(product = %product_id, rating, "Inserting review");

        sqlx::query(
            "INSERT INTO product_reviews (id, product_id, customer_name, rating, \
             review_text, is_verified, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&review.id)
        .bind(&review.product_id)
        .bind(&review.customer_name)
        .bind(review.rating)
        .bind(&review.review_text)
        .bind(review.is_verified)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;

        Ok(review)
    }

    /// Lists a product's reviews, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<ProductReview>> {
        let reviews = sqlx::query_as::<_, ProductReview>(&format!(
            "SELECT {COLUMNS} FROM product_reviews WHERE product_id = ?1 \
             ORDER BY created_at DESC, id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Average rating for a product, or `None` when it has no reviews.
    pub async fn average_rating(&self, product_id: &str) -> DbResult<Option<f64>> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating) FROM product_reviews WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(avg)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
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
    async fn average_is_computed_from_rows() {
        let (db, product_id) = db_with_product().await;
        let repo = db.reviews();

        assert_eq!(repo.average_rating(&product_id).await.unwrap(), None);

        repo.insert(&product_id, "Ada", 5, Some("Great")).await.unwrap();
        repo.insert(&product_id, "Bob", 2, None).await.unwrap();

        assert_eq!(repo.average_rating(&product_id).await.unwrap(), Some(3.5));
        assert_eq!(repo.list_for_product(&product_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let (db, _) = db_with_product().await;
        let err = db.reviews().insert("ghost", "Ada", 4, None).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn product_deletion_cascades_into_reviews() {
        let (db, product_id) = db_with_product().await;

        db.reviews().insert(&product_id, "Ada", 5, None).await.unwrap();
        db.products().delete(&product_id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_reviews")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
