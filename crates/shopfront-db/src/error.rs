//! # Database Error Types
//!
//! Wraps sqlx errors with the categories the application reacts to.
//! Uniqueness violations carry the violating column so the SKU and
//! receipt-number generators can recognize their own collisions and retry;
//! everything else propagates up to become a caller-facing failure.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation. `column` is SQLite's
    /// `table.column` spelling from the constraint message.
    #[error("Duplicate value for {column}")]
    UniqueViolation { column: String },

    /// Foreign key constraint violation (referenced row missing).
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),

    /// Domain validation failed before any write happened (e.g. a receipt
    /// with no items). Nothing was persisted.
    #[error(transparent)]
    Validation(#[from] shopfront_core::ValidationError),
}

impl DbError {
    /// Creates a NotFound error for an entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound { entity, id: id.into() }
    }

    /// True if this is a unique violation on the named column
    /// (e.g. `"sku"` matches `products.sku`).
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { column: c }
            if c == column || c.ends_with(&format!(".{column}")))
    }
}

/// Maps sqlx errors onto the categories above.
///
/// SQLite spells constraint failures out in the message:
/// `UNIQUE constraint failed: products.sku` and
/// `FOREIGN KEY constraint failed`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record",
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    // For multi-column constraints SQLite lists all columns;
                    // keep the first, it identifies the index well enough.
                    let column = column.split(',').next().unwrap_or(column).trim();
                    DbError::UniqueViolation { column: column.to_string() }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_column_matching() {
        let err = DbError::UniqueViolation { column: "products.sku".to_string() };
        assert!(err.is_unique_violation_on("sku"));
        assert!(err.is_unique_violation_on("products.sku"));
        assert!(!err.is_unique_violation_on("receipt_number"));

        let err = DbError::not_found("Product", "p1");
        assert!(!err.is_unique_violation_on("sku"));
    }
}
