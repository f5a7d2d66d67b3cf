use axum::{extract::State, response::Json};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::state::AppState;

/// Service identifier reported by `/health`
pub const SERVICE_NAME: &str = "tajwid-gateway";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Active analyzer backend (`process` or `remote`)
    pub backend: &'static str,
}

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "OK"}))
}

/// Health report including the active analyzer backend
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        backend: state.analyzer.backend().as_str(),
    })
}
