//! API Module
//!
//! Request classification, the upstream client and the HTTP surface.
//!
//! # Endpoints
//! - `GET {proxy_prefix}/*path` - Forward to upstream, rewriting tile pixels
//! - `GET /cache/stats` - Tile cache statistics
//! - `GET /health` - Health check endpoint
//! - `OPTIONS *` - CORS preflight

pub mod classify;
pub mod handlers;
pub mod routes;
pub mod upstream;

pub use classify::{RequestKind, TileRequestContext};
pub use handlers::*;
pub use routes::create_router;
pub use upstream::UpstreamClient;
