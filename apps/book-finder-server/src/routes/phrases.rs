//! Phrase dictionary endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct PhraseListResponse {
    pub phrases: Vec<String>,
    pub total: usize,
    /// File the list was read from
    pub source: String,
}

/// GET /api/v1/phrases
async fn list_phrases(State(state): State<AppState>) -> Json<PhraseListResponse> {
    let dictionary = state.finder().dictionary();
    let phrases = dictionary.phrases().await;

    Json(PhraseListResponse {
        total: phrases.len(),
        phrases: phrases.as_ref().clone(),
        source: dictionary.path().display().to_string(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/phrases", get(list_phrases))
}
