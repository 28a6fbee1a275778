//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub ocr_provider: &'static str,
    pub ocr_available: bool,
    /// MIME type of `highlighted_image` in upload responses
    pub image_format: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let finder = state.finder();
    let ocr = finder.ocr();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "book-finder-server",
        ocr_provider: ocr.provider_type().as_str(),
        ocr_available: ocr.is_available().await,
        image_format: finder.settings().output_format.mime_type(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check))
}
