//! Router assembly.

use axum::extract::State;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, catalog, categories, products, receipts, reviews, uploads, wishlist};
use crate::state::AppState;

/// Builds the full application router.
///
/// `/api/admin/*` handlers each take the `AdminSession` extractor, so the
/// whole subtree rejects unauthenticated requests with 401; `/api/*` is
/// public; `/uploads` serves stored product images.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            put(categories::update).delete(categories::remove),
        )
        .route("/products", get(products::list_admin).post(products::create))
        .route("/products/generate-sku", post(products::generate_sku))
        .route(
            "/products/:id",
            get(products::get_one)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/stats", get(products::stats))
        .route("/receipts", get(receipts::list).post(receipts::create))
        .route(
            "/receipts/:id",
            get(receipts::get_one).delete(receipts::remove),
        )
        .route("/uploads", post(uploads::upload));

    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/catalog", get(catalog::browse))
        .route("/catalog/:id", get(catalog::detail))
        .route(
            "/catalog/:id/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route("/wishlist", get(wishlist::list).post(wishlist::add))
        .route("/wishlist/:product_id", delete(wishlist::remove))
        .route("/health", get(health));

    Router::new()
        .nest("/api/admin", admin)
        .nest("/api", public)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /api/health`
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = state.db.health_check().await;
    Json(serde_json::json!({ "ok": database, "database": database }))
}
