//! Public storefront catalog.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::forms::CatalogQuery;
use crate::state::AppState;
use shopfront_core::{Product, StockStatus};

/// A product as the storefront sees it: the row plus its derived stock
/// banding.
#[derive(Debug, Serialize)]
pub struct CatalogProduct {
    #[serde(flatten)]
    pub product: Product,
    pub stock_status: StockStatus,
}

impl From<Product> for CatalogProduct {
    fn from(product: Product) -> Self {
        let stock_status = product.stock_status();
        CatalogProduct { product, stock_status }
    }
}

/// `GET /api/catalog`
///
/// Full filter surface: search, category, price bounds, in-stock,
/// featured, sort and pagination. Only active products ever appear.
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<CatalogProduct>>, ApiError> {
    let filter = query.into_filter()?;
    let products = state.db.products().query_catalog(&filter).await?;
    Ok(Json(products.into_iter().map(CatalogProduct::from).collect()))
}

/// `GET /api/catalog/{id}`
///
/// Inactive products 404 here just like they vanish from browse results.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CatalogProduct>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| ApiError::not_found("Product"))?;

    Ok(Json(product.into()))
}
