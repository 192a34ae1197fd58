//! Cache Entry Module
//!
//! Defines a cached upstream tile body with its insertion time.

use std::time::{Duration, Instant};

use bytes::Bytes;

// == Cache Entry ==
/// Raw, unprocessed upstream bytes for one tile.
///
/// Entries are never mutated after insertion, only replaced or evicted.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Upstream response body exactly as received
    pub raw: Bytes,
    /// When the entry was stored
    pub inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(raw: Bytes) -> Self {
        Self {
            raw,
            inserted_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since insertion.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// An entry whose age equals the TTL is still live; it expires once the
    /// age strictly exceeds it.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}
