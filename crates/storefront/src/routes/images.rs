//! Image upload route handlers (admin only).
//!
//! Uploads are `multipart/form-data` with the file in a field named `image`.

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::ValidJson;
use crate::middleware::RequireAdmin;
use crate::models::{FieldErrors, Payload};
use crate::services::images::{ImageError, ImageKind, MAX_IMAGE_BYTES, StoredImage};
use crate::state::AppState;

/// Multipart field carrying the file.
const FIELD_NAME: &str = "image";

/// Payload for `DELETE /api/delete-image`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageRequest {
    #[serde(default)]
    pub image_url: String,
}

impl Payload for DeleteImageRequest {
    fn check(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.image_url.trim().is_empty() {
            errors.push("imageUrl", "Image URL is required");
        }
        errors.into_result()
    }
}

#[instrument(skip(state, _admin, multipart))]
pub async fn upload_product_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredImage>> {
    upload(&state, ImageKind::Product, multipart).await
}

#[instrument(skip(state, _admin, multipart))]
pub async fn upload_category_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredImage>> {
    upload(&state, ImageKind::Category, multipart).await
}

#[instrument(skip(state, _admin, multipart))]
pub async fn upload_homepage_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredImage>> {
    upload(&state, ImageKind::Homepage, multipart).await
}

/// Delete a previously uploaded image by its public URL.
#[instrument(skip(state, _admin))]
pub async fn delete_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidJson(body): ValidJson<DeleteImageRequest>,
) -> Result<Json<Value>> {
    state.images().delete(body.image_url.trim()).await?;
    Ok(Json(json!({ "message": "Image deleted successfully" })))
}

/// Find the `image` field and hand it to the image store. Other fields are
/// ignored.
async fn upload(
    state: &AppState,
    kind: ImageKind,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredImage>> {
    let mut multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_owned();
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let stored = state
            .images()
            .save(kind, &original_name, &mimetype, &bytes)
            .await?;
        tracing::info!(url = %stored.image_url, size = stored.size, "Image uploaded");
        return Ok(Json(stored));
    }

    Err(ImageError::Missing.into())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImageError::TooLarge {
            max: MAX_IMAGE_BYTES,
        }
        .into()
    } else {
        AppError::BadRequest(err.body_text())
    }
}
