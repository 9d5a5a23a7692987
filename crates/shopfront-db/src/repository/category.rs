//! # Category Repository
//!
//! Categories are created by admin action and their identity (id, code) is
//! immutable once products reference them; updates touch only the
//! descriptive fields. Duplicate name or code surfaces as a distinct
//! uniqueness conflict so the admin UI can prompt for another value.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use shopfront_core::Category;

const COLUMNS: &str = "id, name, code, description, image_url, created_at";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the name or code is already taken.
    pub async fn insert(
        &self,
        name: &str,
        code: &str,
        description: Option<&str>,
        image_url: Option<&str>,
    ) -> DbResult<Category> {
        let category = Category {
            id: new_id(),
            name: name.to_string(),
            code: code.to_string(),
            description: description.map(str::to_string),
            image_url: image_url.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(code = %category.code, "Inserting category");

        sqlx::query(
            "INSERT INTO categories (id, name, code, description, image_url, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.code)
        .bind(&category.description)
        .bind(&category.image_url)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its SKU-prefix code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Updates the descriptive fields of a category. Identity (id, code)
    /// stays fixed.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        image_url: Option<&str>,
    ) -> DbResult<()> {
        debug!(id = %id, "Updating category");

        let result = sqlx::query(
            "UPDATE categories SET name = ?2, description = ?3, image_url = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(image_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Deletes a category. Fails with a foreign key violation while
    /// products still reference its code.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts all categories (one of the stats aggregates).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn insert_and_fetch() {
        let db = db().await;
        let repo = db.categories();

        let created = repo
            .insert("Electronics", "ELEC", Some("Gadgets"), None)
            .await
            .unwrap();
        assert_eq!(created.code, "ELEC");

        let fetched = repo.get_by_code("ELEC").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Electronics");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_code_is_a_distinct_conflict() {
        let db = db().await;
        let repo = db.categories();

        repo.insert("Electronics", "ELEC", None, None).await.unwrap();
        let err = repo.insert("Electro 2", "ELEC", None, None).await.unwrap_err();
        assert!(err.is_unique_violation_on("code"));

        let err = repo.insert("Electronics", "EL2", None, None).await.unwrap_err();
        assert!(err.is_unique_violation_on("name"));
    }

    #[tokio::test]
    async fn update_touches_descriptive_fields_only() {
        let db = db().await;
        let repo = db.categories();

        let created = repo.insert("Groceries", "GRO", None, None).await.unwrap();
        repo.update(&created.id, "Grocery", Some("Food"), None)
            .await
            .unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Grocery");
        assert_eq!(fetched.code, "GRO");
        assert_eq!(fetched.description.as_deref(), Some("Food"));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let db = db().await;
        let err = db.categories().delete("nope").await.unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound { .. }));
    }
}
