pub mod api;

use axum::{Router, routing::get};
use http::{HeaderValue, header};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Public routes (`/`, `/health`) and the analysis API share one state and
/// the same security headers.
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::api::health_check))
        .route("/health", get(handlers::api::health));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    public_routes
        .merge(api::create_api_router(&state.config))
        .with_state(state)
        .layer(security_headers)
}
