//! # Shopfront Server
//!
//! HTTP JSON API for the inventory/point-of-sale system.
//!
//! ## Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Shopfront Server                        │
//! │                                                              │
//! │  Admin panel ──► /api/admin/* (session cookie) ─┐            │
//! │                                                 ├─► SQLite   │
//! │  Storefront ───► /api/catalog, /api/wishlist ───┘            │
//! │                  /api/catalog/{id}/reviews                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod forms;
mod handlers;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;
use shopfront_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Shopfront server...");

    let config = ServerConfig::load()?;
    info!(
        port = config.port,
        db = %config.database_path.display(),
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
    info!("Database ready");

    let state = AppState::new(db, config.clone());
    let app = routes::router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
