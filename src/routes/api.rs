use axum::{Router, extract::DefaultBodyLimit, routing::post};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handlers::analyze;
use crate::state::AppState;
use std::sync::Arc;

/// Create the analysis API router
///
/// Upload bodies are capped at `max_upload_bytes`.
pub fn create_api_router(config: &ServerConfig) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analyze-tajwid", post(analyze::analyze_tajwid))
        .route(
            "/api/analyze-tajwid-stream",
            post(analyze::analyze_tajwid_stream),
        )
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
