//! Error types for the tile proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Failures that are surfaced to the client.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Connection, DNS, timeout or body transfer failure talking to upstream
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(#[from] reqwest::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        };

        // The cause is logged by the dispatcher; clients get a generic payload.
        let body = Json(json!({
            "error": "Proxy error"
        }));

        (status, [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], body).into_response()
    }
}

// == Transform Error Enum ==
/// Failures while decoding, recoloring or re-encoding a tile.
///
/// Never shown to the client: the dispatcher falls back to the raw bytes.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to decode tile: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode tile: {0}")]
    Encode(#[source] image::ImageError),

    /// The blocking transform task panicked or was cancelled
    #[error("Transform task failed: {0}")]
    Task(String),
}

// == Result Type Alias ==
/// Convenience Result type for the dispatcher.
pub type Result<T> = std::result::Result<T, ProxyError>;
