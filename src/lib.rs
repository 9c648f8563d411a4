//! Nav Cache - navigation cache and module preloading layer
//!
//! Caches fetched data with TTL expiration, tracks which UI code modules are
//! loaded, preloads modules adjacent to the user's location and retries
//! fragile operations with exponential backoff.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod modules;
pub mod prefetch;
pub mod retry;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{NavCacheError, Result};
pub use tasks::spawn_warmup_task;
