//! Tile Cache Module
//!
//! Bounded, time-expiring store of raw upstream tile bytes, keyed by the
//! canonical tile path (hide parameter already stripped).

use std::time::Duration;

use bytes::Bytes;
use lru::LruCache;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == Tile Cache ==
/// LRU-with-TTL cache of unprocessed tile bodies.
///
/// Invariants: `len() <= max_entries`, and no entry older than `ttl` is ever
/// returned. Expiry is checked lazily on `get`; there is no background sweep.
#[derive(Debug)]
pub struct TileCache {
    // Unbounded: the entry limit is enforced in `put` so that a zero
    // capacity and overwrites behave as documented.
    entries: LruCache<String, CacheEntry>,
    stats: CacheStats,
    max_entries: usize,
    ttl: Duration,
}

impl TileCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_entries` tiles for `ttl` each.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::unbounded(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Get ==
    /// Returns the cached bytes for `key` if present and not expired.
    ///
    /// A hit moves the entry to the most-recently-used position. An expired
    /// entry is deleted and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        let Some(expired) = self.entries.peek(key).map(|e| e.is_expired(self.ttl)) else {
            self.stats.record_miss();
            return None;
        };

        if expired {
            self.entries.pop(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "tile cache entry expired");
            return None;
        }

        let raw = self.entries.get(key).map(|entry| entry.raw.clone());
        self.stats.record_hit();
        raw
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`, stamped with the current time.
    ///
    /// Adding a new key to a full cache first evicts the least recently used
    /// entry. Overwriting an existing key never evicts others.
    pub fn put(&mut self, key: String, raw: Bytes) {
        if self.max_entries == 0 {
            return;
        }

        let is_overwrite = self.entries.contains(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some((evicted, _)) = self.entries.pop_lru() {
                self.stats.record_eviction();
                debug!(key = %evicted, "tile cache entry evicted");
            }
        }

        self.entries.put(key, CacheEntry::new(raw));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Contains ==
    /// Checks for a live entry without refreshing its recency or counting a lookup.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
