//! Admin product management: CRUD, SKU generation, listing, stats.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::forms::{empty_as_none, lenient_i64, lenient_opt_i64};
use crate::session::AdminSession;
use crate::state::AppState;
use shopfront_core::validation::{
    validate_name, validate_price_cents, validate_search_query, validate_sku,
    validate_stock_quantity,
};
use shopfront_core::{BarcodeType, Product, ProductStats};
use shopfront_db::{NewProduct, ProductUpdate};

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category_code: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub price_cents: i64,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub stock_quantity: Option<i64>,
    /// Absent means: generate one.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub dimensions: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub barcode_type: Option<BarcodeType>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tags: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub price_cents: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub stock_quantity: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub dimensions: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub barcode_type: Option<BarcodeType>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSkuRequest {
    pub category_code: String,
}

/// Query parameters for the admin listing. Lenient strings, same as the
/// catalog query.
#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/admin/products` — includes inactive rows, newest first.
pub async fn list_admin(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let search = match query.search.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(validate_search_query(s)?),
    };

    let limit = parse_opt_u32(query.limit.as_deref(), "limit")?;
    let offset = parse_opt_u32(query.offset.as_deref(), "offset")?;

    let products = state
        .db
        .products()
        .list_admin(search.as_deref(), query.category.as_deref(), limit, offset)
        .await?;

    Ok(Json(products))
}

/// `POST /api/admin/products`
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validate_name(&request.name)?;
    validate_price_cents(request.price_cents)?;
    let stock = request.stock_quantity.unwrap_or(0);
    validate_stock_quantity(stock)?;

    let mut new = NewProduct::new(
        request.name.trim(),
        request.category_code.trim(),
        request.price_cents,
    );
    new.stock_quantity = stock;
    new.description = request.description;
    new.brand = request.brand;
    new.model = request.model;
    new.dimensions = request.dimensions;
    new.image_url = request.image_url;
    new.barcode_type = request.barcode_type.unwrap_or_default();
    new.is_featured = request.is_featured.unwrap_or(false);
    new.tags = request.tags;

    let products = state.db.products();
    let product = match request.sku {
        Some(sku) => {
            validate_sku(&sku)?;
            products.insert(sku.trim(), &new).await?
        }
        None => products.insert_with_generated_sku(&new).await?,
    };

    Ok(Json(product))
}

/// `POST /api/admin/products/generate-sku`
pub async fn generate_sku(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<GenerateSkuRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sku = state
        .db
        .products()
        .generate_sku(request.category_code.trim())
        .await?;
    Ok(Json(serde_json::json!({ "sku": sku })))
}

/// `GET /api/admin/products/{id}`
pub async fn get_one(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(Json(product))
}

/// `PUT /api/admin/products/{id}`
pub async fn update(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(price) = request.price_cents {
        validate_price_cents(price)?;
    }
    if let Some(stock) = request.stock_quantity {
        validate_stock_quantity(stock)?;
    }

    let update = ProductUpdate {
        name: request.name,
        category_code: request.category_code,
        price_cents: request.price_cents,
        stock_quantity: request.stock_quantity,
        description: request.description,
        brand: request.brand,
        model: request.model,
        dimensions: request.dimensions,
        image_url: request.image_url,
        barcode_type: request.barcode_type,
        is_active: request.is_active,
        is_featured: request.is_featured,
        tags: request.tags,
    };

    let product = state.db.products().update(&id, &update).await?;
    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}`
///
/// Hard delete. Reviews and wishlist entries cascade; historical receipt
/// items keep their snapshot.
pub async fn remove(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.products().delete(&id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/admin/stats`
pub async fn stats(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ProductStats>, ApiError> {
    Ok(Json(state.db.products().stats().await?))
}

fn parse_opt_u32(value: Option<&str>, field: &'static str) -> Result<Option<u32>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            ApiError::Validation {
                field: Some(field.to_string()),
                message: format!("{field} must be a non-negative number"),
            }
        }),
    }
}
