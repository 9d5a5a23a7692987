//! Admin session store and auth extractor.
//!
//! Sessions are opaque UUID tokens in an in-memory map, handed to the
//! browser as an HttpOnly cookie at login. A restart logs everyone out,
//! which is acceptable for a single-instance admin panel.
//!
//! These are unrelated to the anonymous wishlist `session_id` strings,
//! which are client-generated and never authenticated.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use shopfront_core::Role;

/// Cookie name for the admin session token.
pub const SESSION_COOKIE: &str = "shopfront_session";

/// One live admin session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    expires_at: Instant,
}

impl Session {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Concurrent map of token → session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore { sessions: Arc::new(DashMap::new()), ttl }
    }

    /// Creates a session and returns its opaque token.
    pub fn create(&self, user_id: &str, username: &str, role: Role) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id: user_id.to_string(),
                username: username.to_string(),
                role,
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Looks a token up, evicting it when expired.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired() {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    /// Removes a session (logout). Unknown tokens are a no-op.
    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }
}

/// Extractor for handlers behind the admin panel.
///
/// Reads the session cookie, validates the token against the store and
/// rejects with 401 when absent, unknown or expired.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub session: Session,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts
            .headers
            .get(header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = find_cookie(cookies, SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;

        let session = state.sessions.get(token).ok_or(ApiError::Unauthorized)?;

        Ok(AdminSession { token: token.to_string(), session })
    }
}

/// Finds a cookie value in a `Cookie:` header.
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_parsing() {
        let header = "theme=dark; shopfront_session=abc123; other=x";
        assert_eq!(find_cookie(header, SESSION_COOKIE), Some("abc123"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie("shopfront_session=solo", SESSION_COOKIE), Some("solo"));
    }

    #[test]
    fn store_lifecycle() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create("u1", "admin", Role::Admin);

        let session = store.get(&token).unwrap();
        assert_eq!(session.username, "admin");

        store.remove(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn expired_sessions_are_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create("u1", "admin", Role::Admin);
        assert!(store.get(&token).is_none());
    }
}
