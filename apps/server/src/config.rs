//! Server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use std::env;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Directory for uploaded product images
    pub upload_dir: PathBuf,

    /// Admin session lifetime in seconds
    pub session_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            port: env::var("SHOPFRONT_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPFRONT_PORT".to_string()))?,

            database_path: env::var("SHOPFRONT_DB_PATH")
                .unwrap_or_else(|_| "./shopfront.db".to_string())
                .into(),

            upload_dir: env::var("SHOPFRONT_UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),

            session_ttl_secs: env::var("SHOPFRONT_SESSION_TTL_SECS")
                .unwrap_or_else(|_| "28800".to_string()) // 8 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SHOPFRONT_SESSION_TTL_SECS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        // Env vars are process-global; only assert the fallback values that
        // no other test overrides.
        let config = ServerConfig::load().unwrap();
        assert!(config.session_ttl_secs > 0);
        assert!(config.port > 0);
    }
}
