//! Cache Entry Module
//!
//! Defines a single stored value together with its insertion instant and TTL.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and freshness metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Monotonic instant at which the value was stored
    pub stored_at: Instant,
    /// Time-to-live measured from `stored_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry is still fresh.
    ///
    /// Fresh means `now - stored_at < ttl`; an entry read exactly at
    /// `stored_at + ttl` is already stale, and a zero TTL is never fresh.
    pub fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining TTL, saturating at zero once the entry is stale.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.stored_at.elapsed())
    }
}
