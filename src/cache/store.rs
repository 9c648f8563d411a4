//! Expiring Cache Module
//!
//! Key-value store with per-entry TTL and lazy eviction of stale entries.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Expiring Cache ==
/// Maps string keys to values stamped with an insertion instant and a TTL.
///
/// Stale entries are never returned; they are removed the next time they
/// are read. There is no background sweep. Unless built with
/// [`ExpiringCache::bounded`], the cache grows until callers invalidate.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency order, only maintained when a capacity bound is set
    lru: Option<LruTracker>,
    max_entries: Option<usize>,
    stats: CacheStats,
}

impl<V: Clone> ExpiringCache<V> {
    // == Constructors ==
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            lru: None,
            max_entries: None,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache holding at most `max_entries` entries, evicting the
    /// least recently used one when a new key arrives at capacity.
    ///
    /// A bound of zero is treated as one.
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: Some(LruTracker::new()),
            max_entries: Some(max_entries.max(1)),
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and fresh.
    ///
    /// A stale entry is evicted and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_with_ttl(key).map(|(value, _)| value)
    }

    /// Like [`get`](Self::get), also returning the remaining TTL.
    pub fn get_with_ttl(&mut self, key: &str) -> Option<(V, Duration)> {
        let fresh = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                return None;
            }
            Some(entry) => entry.is_fresh(),
        };

        if !fresh {
            self.remove_entry(key);
            self.stats.record_miss();
            self.stats.record_stale_eviction();
            debug!(key, "cache entry stale, evicted");
            return None;
        }

        let entry = self.entries.get(key)?;
        let found = (entry.value.clone(), entry.ttl_remaining());
        self.stats.record_hit();
        if let Some(lru) = self.lru.as_mut() {
            lru.touch(key);
        }
        Some(found)
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry and
    /// restarting its TTL from now.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if let (Some(max), Some(lru)) = (self.max_entries, self.lru.as_mut()) {
            if !is_overwrite && self.entries.len() >= max {
                if let Some(evicted) = lru.evict_oldest() {
                    self.entries.remove(&evicted);
                    self.stats.record_capacity_eviction();
                    debug!(key = %evicted, "cache entry evicted for capacity");
                }
            }
            lru.touch(&key);
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Invalidate ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of stored entries, stale ones not yet read included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            if let Some(lru) = self.lru.as_mut() {
                lru.remove(key);
            }
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}

impl<V: Clone> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
