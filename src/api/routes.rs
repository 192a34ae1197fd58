//! API Routes
//!
//! Configures the Axum router for the proxy and operational endpoints.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    fallback_handler, health_handler, preflight_handler, proxy_handler, stats_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `GET {proxy_prefix}/*path` - Proxied upstream traffic
/// - `GET /cache/stats` - Tile cache statistics
/// - `GET /health` - Health check endpoint
/// - `OPTIONS` on any path - Fixed CORS preflight
pub fn create_router(state: AppState) -> Router {
    let proxy_route = format!("{}/*path", state.config.proxy_prefix);

    Router::new()
        .route(&proxy_route, get(proxy_handler).options(preflight_handler))
        .route("/cache/stats", get(stats_handler).options(preflight_handler))
        .route("/health", get(health_handler).options(preflight_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
