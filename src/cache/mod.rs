//! Cache Module
//!
//! In-memory key-value cache with per-entry TTL, lazy eviction of stale
//! entries and an optional LRU capacity bound.

mod entry;
mod fetch;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fetch::{get_or_fetch, shared_cache, SharedCache};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::ExpiringCache;
