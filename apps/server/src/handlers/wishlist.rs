//! Anonymous wishlist endpoints.
//!
//! `session_id` is an opaque token the storefront client generates and
//! keeps; there is no authentication here and no link to admin sessions.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;
use shopfront_core::{ValidationError, WishlistItem};

#[derive(Debug, Deserialize)]
pub struct AddWishlistRequest {
    pub session_id: String,
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

fn require_session_id(session_id: &str) -> Result<&str, ApiError> {
    let trimmed = session_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "session_id" }.into());
    }
    Ok(trimmed)
}

/// `POST /api/wishlist` — idempotent; re-adding a member returns the
/// existing row.
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddWishlistRequest>,
) -> Result<Json<WishlistItem>, ApiError> {
    let session_id = require_session_id(&request.session_id)?;
    let item = state
        .db
        .wishlist()
        .add(session_id, &request.product_id)
        .await?;
    Ok(Json(item))
}

/// `DELETE /api/wishlist/{product_id}?session_id=...`
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = require_session_id(&query.session_id)?;
    let removed = state.db.wishlist().remove(session_id, &product_id).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// `GET /api/wishlist?session_id=...`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    let session_id = require_session_id(&query.session_id)?;
    Ok(Json(state.db.wishlist().list_for_session(session_id).await?))
}
