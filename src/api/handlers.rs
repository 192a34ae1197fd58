//! API Handlers
//!
//! The proxy dispatcher plus the small operational endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::{debug, warn};

use super::classify::TileRequestContext;
use super::upstream::UpstreamClient;
use crate::cache::TileCache;
use crate::config::Config;
use crate::error::{Result, TransformError};
use crate::models::{HealthResponse, StatsResponse};
use crate::tiles::{transform_tile, HideSet, TileKind, TransformOutcome};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide raw tile cache
    pub cache: Arc<RwLock<TileCache>>,
    pub upstream: UpstreamClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(cache: TileCache, upstream: UpstreamClient, config: Config) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            upstream,
            config: Arc::new(config),
        }
    }

    /// Creates the cache and upstream client from configuration.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let cache = TileCache::new(config.cache_max_entries, config.cache_ttl());
        let upstream = UpstreamClient::new(config.upstream_base_url.clone())?;
        Ok(Self::new(cache, upstream, config.clone()))
    }
}

/// Handler for GET `{proxy_prefix}/*path`
///
/// Forwards to upstream, intercepting tile responses for caching and
/// pixel rewriting.
pub async fn proxy_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri
        .path()
        .strip_prefix(state.config.proxy_prefix.as_str())
        .unwrap_or(uri.path());
    let ctx = TileRequestContext::new(&state.config.upstream_path_prefix, path, uri.query());

    match dispatch(&state, &ctx).await {
        Ok(response) => response,
        Err(err) => {
            warn!(upstream = %ctx.upstream_target, error = %err, "proxy request failed");
            err.into_response()
        }
    }
}

async fn dispatch(state: &AppState, ctx: &TileRequestContext) -> Result<Response> {
    let Some(kind) = ctx.tile_kind() else {
        let upstream = state.upstream.fetch(&ctx.upstream_target).await?;
        return Ok(passthrough_response(upstream));
    };

    // Bound separately so the write guard is released before rendering.
    let cached = state.cache.write().await.get(ctx.cache_key());
    if let Some(raw) = cached {
        debug!(key = ctx.cache_key(), "tile cache hit");
        let outcome = render_tile(raw, kind, ctx.hide.clone()).await;
        return Ok(tile_response(state, outcome, None));
    }
    debug!(key = ctx.cache_key(), "tile cache miss");

    let upstream = state.upstream.fetch(ctx.cache_key()).await?;
    let status = upstream.status();
    if status == StatusCode::NO_CONTENT || !has_image_content_type(&upstream) {
        debug!(%status, key = ctx.cache_key(), "no image for tile");
        return Ok(empty_tile_response());
    }
    if status != StatusCode::OK {
        return Ok(passthrough_response(upstream));
    }

    let declared = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let raw = upstream.bytes().await?;
    if raw.is_empty() {
        return Ok(empty_tile_response());
    }

    state
        .cache
        .write()
        .await
        .put(ctx.cache_key().to_string(), raw.clone());

    let outcome = render_tile(raw, kind, ctx.hide.clone()).await;
    Ok(tile_response(state, outcome, declared.as_deref()))
}

/// Runs decode/transform/encode off the async workers.
async fn render_tile(raw: Bytes, kind: TileKind, hide: HideSet) -> TransformOutcome {
    let fallback = raw.clone();
    let outcome = tokio::task::spawn_blocking(move || transform_tile(raw, kind, &hide))
        .await
        .unwrap_or_else(|err| TransformOutcome::Fallback {
            raw: fallback,
            error: TransformError::Task(err.to_string()),
        });

    if let TransformOutcome::Fallback { error, .. } = &outcome {
        warn!(%error, "tile transform failed, serving raw bytes");
    }
    outcome
}

fn has_image_content_type(upstream: &reqwest::Response) -> bool {
    upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("image/"))
}

// == Response Builders ==
/// `declared` is the upstream content type when this request fetched the tile.
fn tile_response(state: &AppState, outcome: TransformOutcome, declared: Option<&str>) -> Response {
    let (body, content_type) = outcome.into_body(declared);
    (
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", state.config.tile_max_age_secs),
            ),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        body,
    )
        .into_response()
}

/// Tells the map client this tile region has no data.
fn empty_tile_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Body::empty(),
    )
        .into_response()
}

/// Streams an upstream response through with its status and content type.
fn passthrough_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let cache_control = upstream
        .headers()
        .get(header::CACHE_CONTROL)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("no-cache"));

    let mut response = Body::from_stream(upstream.bytes_stream()).into_response();
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// Handler for OPTIONS on any path
pub async fn preflight_handler() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

/// Fallback for unmatched routes: preflight for OPTIONS, 404 otherwise.
pub async fn fallback_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        preflight_handler().await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(&stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
