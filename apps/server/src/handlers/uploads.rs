//! Product image upload.
//!
//! Multipart upload that writes the file under the configured upload
//! directory with a generated UUID name (the client-supplied name is used
//! only for its extension) and returns the public path. Files are served
//! back via the static `/uploads` route.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// `POST /api/admin/uploads`
pub async fn upload(
    _admin: crate::session::AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.file_name().is_none() {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                ApiError::bad_request(format!(
                    "File extension must be one of {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Upload read failed: {e}")))?;

        if data.is_empty() {
            return Err(ApiError::bad_request("Uploaded file is empty"));
        }

        let file_name = format!("{}.{extension}", Uuid::new_v4());
        let target = state.config.upload_dir.join(&file_name);

        tokio::fs::write(&target, &data)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store upload: {e}")))?;

        info!(file = %file_name, bytes = data.len(), "Stored upload");
        return Ok(Json(serde_json::json!({ "path": format!("/uploads/{file_name}") })));
    }

    Err(ApiError::bad_request("No file field in multipart body"))
}
