//! Upload Routes
//!
//! Endpoints:
//! - POST /upload - multipart form with an `image` field
//! - POST /api/v1/upload - same handler under the versioned prefix

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::finder::FinderResponse;
use crate::state::AppState;

/// Multipart field carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// Create the upload router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/api/v1/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// POST /upload
///
/// Runs the book finder on the uploaded photo.
async fn upload_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<FinderResponse>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("upload", %request_id);

    async move {
        let mut multipart = multipart.map_err(|e| {
            tracing::warn!("Rejected non-multipart upload: {}", e);
            AppError::BadRequest("No image uploaded".to_string())
        })?;

        let image = read_image_field(&mut multipart)
            .await?
            .ok_or_else(|| AppError::BadRequest("No image uploaded".to_string()))?;

        tracing::debug!("Read {} bytes of image data", image.len());
        let response = state.finder().process(image).await?;
        Ok(Json(response))
    }
    .instrument(span)
    .await
}

/// Find the first non-empty `image` field
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<axum::body::Bytes>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        tracing::debug!(
            "Received field: name='{}', filename={:?}, content_type={:?}",
            name,
            field.file_name(),
            field.content_type()
        );

        if name != IMAGE_FIELD {
            continue;
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if !data.is_empty() {
            return Ok(Some(data));
        }
    }

    tracing::warn!("No image field found in multipart upload");
    Ok(None)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    tracing::error!("Failed to read multipart field: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read upload: {}", err.body_text()))
    }
}
