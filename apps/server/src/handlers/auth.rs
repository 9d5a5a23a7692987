//! Admin authentication: login, logout, current session.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::{AdminSession, SESSION_COOKIE};
use crate::state::AppState;
use shopfront_core::Role;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub username: String,
    pub role: Role,
}

/// `POST /api/auth/login`
///
/// Verifies the password against the stored argon2 hash and issues an
/// opaque session token as an HttpOnly cookie. Unknown usernames and wrong
/// passwords get the same 401 to avoid leaking which part failed.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .db
        .users()
        .get_by_username(&request.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %request.username, "Login attempt for unknown user");
            ApiError::Unauthorized
        })?;

    let hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is malformed: {e}")))?;

    Argon2::default()
        .verify_password(request.password.as_bytes(), &hash)
        .map_err(|_| {
            warn!(username = %request.username, "Login attempt with wrong password");
            ApiError::Unauthorized
        })?;

    let token = state.sessions.create(&user.id, &user.username, user.role);
    info!(username = %user.username, "Login successful");

    let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/");
    let body = Json(SessionInfo { username: user.username, role: user.role });

    Ok(([(SET_COOKIE, cookie)], body).into_response())
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    admin: AdminSession,
) -> Result<Response, ApiError> {
    state.sessions.remove(&admin.token);
    info!(username = %admin.session.username, "Logged out");

    // Expire the cookie client-side too.
    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    Ok(([(SET_COOKIE, cookie)], Json(serde_json::json!({ "ok": true }))).into_response())
}

/// `GET /api/auth/me`
pub async fn me(admin: AdminSession) -> Json<SessionInfo> {
    Json(SessionInfo {
        username: admin.session.username,
        role: admin.session.role,
    })
}
