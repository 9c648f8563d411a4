//! Read-Through Fetch
//!
//! Cache-aside helper: serve fresh entries from the cache, otherwise fetch
//! through the retry executor and store the result.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::ExpiringCache;
use crate::retry::{self, RetryPolicy};

/// Cache shared between every caller of the process.
pub type SharedCache<V> = Arc<RwLock<ExpiringCache<V>>>;

/// Creates an empty shared cache, bounded when `max_entries` is given.
pub fn shared_cache<V: Clone>(max_entries: Option<usize>) -> SharedCache<V> {
    let cache = match max_entries {
        Some(max) => ExpiringCache::bounded(max),
        None => ExpiringCache::new(),
    };
    Arc::new(RwLock::new(cache))
}

// == Get Or Fetch ==
/// Returns the fresh cached value for `key`, or fetches, stores and returns
/// a new one.
///
/// The lock is released while `fetch` runs, so concurrent misses on the
/// same key may each fetch; the last writer wins. When every attempt fails
/// the original error is returned and nothing is stored.
pub async fn get_or_fetch<V, E, F, Fut>(
    cache: &RwLock<ExpiringCache<V>>,
    key: &str,
    ttl: Duration,
    policy: &RetryPolicy,
    fetch: F,
) -> Result<V, E>
where
    V: Clone,
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.write().await.get(key) {
        return Ok(value);
    }

    debug!(key, "fetching value after cache miss");
    let value = retry::execute(policy, fetch).await?;

    cache.write().await.set(key, value.clone(), ttl);
    Ok(value)
}
