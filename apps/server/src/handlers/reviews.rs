//! Public product reviews.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::forms::{empty_as_none, lenient_i64};
use crate::state::AppState;
use shopfront_core::validation::{validate_name, validate_rating};
use shopfront_core::ProductReview;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub customer_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub rating: i64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub review_text: Option<String>,
}

/// Review listing plus the average computed from the rows.
#[derive(Debug, Serialize)]
pub struct ReviewListing {
    pub reviews: Vec<ProductReview>,
    pub average_rating: Option<f64>,
}

/// `GET /api/catalog/{id}/reviews`
pub async fn list(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ReviewListing>, ApiError> {
    let repo = state.db.reviews();
    let reviews = repo.list_for_product(&product_id).await?;
    let average_rating = repo.average_rating(&product_id).await?;

    Ok(Json(ReviewListing { reviews, average_rating }))
}

/// `POST /api/catalog/{id}/reviews`
pub async fn create(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<ProductReview>, ApiError> {
    validate_name(&request.customer_name)?;
    validate_rating(request.rating)?;

    let review = state
        .db
        .reviews()
        .insert(
            &product_id,
            request.customer_name.trim(),
            request.rating,
            request.review_text.as_deref(),
        )
        .await?;

    Ok(Json(review))
}
