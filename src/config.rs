//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Scheme and host of the upstream tile API, without trailing slash
    pub upstream_base_url: String,
    /// Fixed path segment inserted between the upstream host and the forwarded path
    pub upstream_path_prefix: String,
    /// Inbound path prefix under which requests are proxied
    pub proxy_prefix: String,
    /// Maximum number of raw tiles the cache can hold
    pub cache_max_entries: usize,
    /// Lifetime of a cached tile in seconds
    pub cache_ttl_secs: u64,
    /// `max-age` advertised to downstream caches on tile responses
    pub tile_max_age_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_BASE_URL` - Upstream origin (default: https://gis.example.com)
    /// - `UPSTREAM_PATH_PREFIX` - Fixed upstream path segment (default: /arcgis/rest/services)
    /// - `PROXY_PREFIX` - Inbound proxy prefix (default: /api)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached tiles (default: 500)
    /// - `CACHE_TTL_SECS` - Tile cache TTL in seconds (default: 300)
    /// - `TILE_MAX_AGE_SECS` - Downstream cache hint in seconds (default: 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            upstream_base_url: lookup("UPSTREAM_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_path_prefix: lookup("UPSTREAM_PATH_PREFIX")
                .unwrap_or(defaults.upstream_path_prefix),
            proxy_prefix: lookup("PROXY_PREFIX")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.proxy_prefix),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_ttl_secs: parse_var(&lookup, "CACHE_TTL_SECS")
                .unwrap_or(defaults.cache_ttl_secs),
            tile_max_age_secs: parse_var(&lookup, "TILE_MAX_AGE_SECS")
                .unwrap_or(defaults.tile_max_age_secs),
        }
    }

    /// Tile cache TTL as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_base_url: "https://gis.example.com".to_string(),
            upstream_path_prefix: "/arcgis/rest/services".to_string(),
            proxy_prefix: "/api".to_string(),
            cache_max_entries: 500,
            cache_ttl_secs: 300,
            tile_max_age_secs: 60,
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}
