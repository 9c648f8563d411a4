//! Response DTOs for the navigation cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::modules::ModuleRecord;

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
    pub ttl_remaining_ms: u64,
}

/// Response body for `PUT /cache`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
    pub ttl_ms: u64,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, ttl_ms: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            ttl_ms,
        }
    }
}

/// Response body for `DELETE /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub key: String,
    /// Whether an entry existed
    pub removed: bool,
}

/// Response body for `POST /navigate`
#[derive(Debug, Clone, Serialize)]
pub struct NavigateResponse {
    /// Location derived from the path, `None` for the root path
    pub location: Option<String>,
    /// Modules scheduled for background preload
    pub scheduled: Vec<String>,
}

/// Response body for `GET /modules`
#[derive(Debug, Clone, Serialize)]
pub struct ModulesResponse {
    pub loaded_count: usize,
    pub pending_count: usize,
    pub modules: Vec<ModuleRecord>,
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub loaded_modules: usize,
    pub pending_modules: usize,
}

impl StatsResponse {
    pub fn new(cache: CacheStats, loaded_modules: usize, pending_modules: usize) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            loaded_modules,
            pending_modules,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
