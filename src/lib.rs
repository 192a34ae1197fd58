//! Plow Tile Proxy - A tile-transforming reverse proxy
//!
//! Forwards map API traffic to an upstream origin, caching and rewriting the
//! pixels of plow-recency and designation tiles on the way back.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tiles;

pub use api::{create_router, AppState};
pub use config::Config;
