//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::session::SessionStore;
use shopfront_db::Database;

/// State handed to every handler. Cheap to clone: the database wraps a
/// pool, the session store an `Arc<DashMap>`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
        AppState { db, sessions, config: Arc::new(config) }
    }
}
