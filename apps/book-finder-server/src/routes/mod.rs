//! Route modules for Book Finder Server

pub mod health;
pub mod phrases;
pub mod upload;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    // The browser front end posts from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().server.max_upload_bytes;

    Router::new()
        .merge(health::router())
        .merge(upload::router(max_upload_bytes))
        .merge(phrases::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
