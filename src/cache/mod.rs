//! Cache Module
//!
//! Provides the in-memory tile cache with TTL expiration and LRU eviction.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TileCache;
