//! Admin category CRUD.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::forms::empty_as_none;
use crate::session::AdminSession;
use crate::state::AppState;
use shopfront_core::validation::{validate_category_code, validate_name};
use shopfront_core::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub code: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
}

/// `GET /api/admin/categories`
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.db.categories().list().await?))
}

/// `POST /api/admin/categories`
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    validate_name(&request.name)?;
    validate_category_code(&request.code)?;

    let category = state
        .db
        .categories()
        .insert(
            request.name.trim(),
            request.code.trim(),
            request.description.as_deref(),
            request.image_url.as_deref(),
        )
        .await?;

    Ok(Json(category))
}

/// `PUT /api/admin/categories/{id}` — descriptive fields only; the code is
/// immutable because existing SKUs embed it.
pub async fn update(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    validate_name(&request.name)?;

    let categories = state.db.categories();
    categories
        .update(
            &id,
            request.name.trim(),
            request.description.as_deref(),
            request.image_url.as_deref(),
        )
        .await?;

    let category = categories
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    Ok(Json(category))
}

/// `DELETE /api/admin/categories/{id}`
///
/// Fails with 409 while products still reference the category.
pub async fn remove(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.db.categories().delete(&id).await {
        Err(err) if matches!(err, shopfront_db::DbError::ForeignKeyViolation(_)) => {
            Err(ApiError::Conflict("Category still has products".to_string()))
        }
        other => {
            other?;
            Ok(Json(serde_json::json!({ "ok": true })))
        }
    }
}
