//! Request Classification
//!
//! Turns an inbound proxied path and query into a `TileRequestContext`:
//! what kind of request it is, where it goes upstream, and which categories
//! to hide.

use crate::tiles::{HideSet, TileKind};

/// Query parameter consumed locally and never forwarded upstream.
pub const HIDE_PARAM: &str = "hide";

/// Marker present in every intercepted tile path.
pub const TILE_MARKER: &str = "highlight";

/// Marker distinguishing plow-recency tiles from designation tiles.
pub const PLOW_MARKER: &str = "VISITED";

/// Tile-looking paths containing any of these are plain API traffic.
pub const EXCLUDED_MARKERS: [&str; 2] = ["active", "info"];

// == Request Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Streamed through untouched, never cached
    Passthrough,
    /// Cached and pixel-transformed
    Tile(TileKind),
}

/// Classifies an upstream path. Markers are matched case-sensitively.
pub fn classify_path(path: &str) -> RequestKind {
    let is_tile = path.contains(TILE_MARKER)
        && !EXCLUDED_MARKERS.iter().any(|marker| path.contains(marker));

    if !is_tile {
        RequestKind::Passthrough
    } else if path.contains(PLOW_MARKER) {
        RequestKind::Tile(TileKind::PlowRecency)
    } else {
        RequestKind::Tile(TileKind::Designation)
    }
}

// == Hide Parameter ==
/// Splits the `hide` parameter out of a raw query string.
///
/// Returns the remaining query (pairs kept in order, `None` when nothing is
/// left) and the parsed hide set. Repeated `hide` pairs are merged.
pub fn split_hide_param(query: Option<&str>) -> (Option<String>, HideSet) {
    let Some(query) = query else {
        return (None, HideSet::new());
    };

    let mut kept = Vec::new();
    let mut hidden = Vec::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name == HIDE_PARAM {
            hidden.push(value);
        } else {
            kept.push(pair);
        }
    }

    let remaining = (!kept.is_empty()).then(|| kept.join("&"));
    (remaining, HideSet::parse(&hidden.join(",")))
}

// == Tile Request Context ==
/// Everything the dispatcher needs to know about one inbound request.
#[derive(Debug, Clone)]
pub struct TileRequestContext {
    pub kind: RequestKind,
    /// Upstream path plus remaining query; also the canonical cache key
    pub upstream_target: String,
    pub hide: HideSet,
}

impl TileRequestContext {
    /// Builds the context for a path already stripped of the proxy prefix.
    pub fn new(upstream_path_prefix: &str, path: &str, query: Option<&str>) -> Self {
        let upstream_path = format!("{}{}", upstream_path_prefix, path);
        let (remaining, hide) = split_hide_param(query);
        let upstream_target = match remaining {
            Some(query) => format!("{}?{}", upstream_path, query),
            None => upstream_path.clone(),
        };

        Self {
            kind: classify_path(&upstream_path),
            upstream_target,
            hide,
        }
    }

    pub fn tile_kind(&self) -> Option<TileKind> {
        match self.kind {
            RequestKind::Tile(kind) => Some(kind),
            RequestKind::Passthrough => None,
        }
    }

    /// Cache key shared by every hide-set variant of the same tile.
    pub fn cache_key(&self) -> &str {
        &self.upstream_target
    }
}
