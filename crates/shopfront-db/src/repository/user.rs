//! # User Repository
//!
//! Admin-panel accounts. Password hashes are argon2 PHC strings produced
//! and verified by the server layer; this repository only stores them.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use shopfront_core::{Role, User};

const COLUMNS: &str = "id, username, password_hash, role, created_at";

/// Repository for user account database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the username is taken.
    pub async fn insert(&self, username: &str, password_hash: &str, role: Role) -> DbResult<User> {
        let user = User {
            id: new_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };

        debug!(username = %user.username, "Inserting user");

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks a user up by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert("admin", "$argon2id$fake", Role::Admin).await.unwrap();

        let user = repo.get_by_username("admin").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(repo.get_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert("admin", "h1", Role::Admin).await.unwrap();
        let err = repo.insert("admin", "h2", Role::Staff).await.unwrap_err();
        assert!(err.is_unique_violation_on("username"));
    }
}
