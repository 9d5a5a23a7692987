//! Unified API error handling.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl maps
//! each category to a status code and a small JSON body. Internal causes are
//! logged server-side and never leak into responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use shopfront_core::{CoreError, ValidationError};
use shopfront_db::DbError;

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Validation { field: Option<String>, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody { error: "Authentication required".to_string(), field: None },
            ),

            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody { error: format!("{what} not found"), field: None },
            ),

            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                ErrorBody { error: message, field: None },
            ),

            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: message, field },
            ),

            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: message, field: None },
            ),

            ApiError::Internal(cause) => {
                error!(%cause, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody { error: "Internal server error".to_string(), field: None },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            field: Some(err.field().to_string()),
            message: err.to_string(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::NotFound(entity.to_string()),
            DbError::UniqueViolation { column } => {
                ApiError::Conflict(format!("Duplicate value for {column}"))
            }
            // A missing referenced row (unknown category code, deleted
            // product) reads as a not-found to the client.
            DbError::ForeignKeyViolation(_) => {
                ApiError::NotFound("Referenced record".to_string())
            }
            DbError::Validation(err) => err.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CategoryNotFound(_) => ApiError::NotFound("Category".to_string()),
            CoreError::ProductNotFound(_) => ApiError::NotFound("Product".to_string()),
            CoreError::EmptyReceipt => ApiError::Validation {
                field: Some("items".to_string()),
                message: err.to_string(),
            },
            CoreError::GeneratorExhausted { .. } => ApiError::Conflict(err.to_string()),
            CoreError::Validation(err) => err.into(),
        }
    }
}
