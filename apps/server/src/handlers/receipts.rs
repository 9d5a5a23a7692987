//! Admin receipt endpoints.
//!
//! Clients submit product ids and quantities only; the server snapshots
//! each product and recomputes every amount. Any totals a client sends are
//! ignored by construction since the request type has no field for them.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::forms::{empty_as_none, lenient_i64, lenient_opt_i64};
use crate::session::AdminSession;
use crate::state::AppState;
use shopfront_core::validation::{validate_quantity, validate_rate_bps};
use shopfront_core::{CoreError, PaymentMethod, Receipt, ValidationError};
use shopfront_db::{NewReceipt, NewReceiptItem, ReceiptWithItems};

#[derive(Debug, Deserialize)]
pub struct ReceiptItemRequest {
    pub product_id: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateReceiptRequest {
    pub items: Vec<ReceiptItemRequest>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub business_address: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub business_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub tax_rate_bps: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub discount_rate_bps: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// `POST /api/admin/receipts`
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreateReceiptRequest>,
) -> Result<Json<ReceiptWithItems>, ApiError> {
    if request.items.is_empty() {
        return Err(CoreError::EmptyReceipt.into());
    }

    let tax_rate_bps = rate_from(request.tax_rate_bps, "tax_rate_bps")?;
    let discount_rate_bps = rate_from(request.discount_rate_bps, "discount_rate_bps")?;

    let products = state.db.products();
    let mut items = Vec::with_capacity(request.items.len());
    for item in &request.items {
        validate_quantity(item.quantity)?;
        let product = products
            .get_by_id(&item.product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product"))?;
        items.push(NewReceiptItem::from_product(&product, item.quantity));
    }

    let header = NewReceipt {
        customer_name: request.customer_name,
        business_name: request.business_name,
        business_address: request.business_address,
        business_phone: request.business_phone,
        tax_rate_bps,
        discount_rate_bps,
        payment_method: request.payment_method.unwrap_or_default(),
    };

    let receipt = state.db.receipts().create(&header, &items).await?;
    Ok(Json(receipt))
}

/// `GET /api/admin/receipts`
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    Ok(Json(state.db.receipts().list().await?))
}

/// `GET /api/admin/receipts/{id}`
pub async fn get_one(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReceiptWithItems>, ApiError> {
    let receipt = state
        .db
        .receipts()
        .get_with_items(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Receipt"))?;
    Ok(Json(receipt))
}

/// `DELETE /api/admin/receipts/{id}`
pub async fn remove(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.receipts().delete(&id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

fn rate_from(value: Option<i64>, field: &'static str) -> Result<u32, ApiError> {
    let raw = value.unwrap_or(0);
    if raw < 0 {
        return Err(ValidationError::Negative { field }.into());
    }
    let bps = raw as u32;
    validate_rate_bps(bps)?;
    Ok(bps)
}
