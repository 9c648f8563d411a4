//! Request DTOs for the navigation cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted cache key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for `PUT /cache`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    /// Any JSON value
    pub value: Value,
    /// TTL in milliseconds, service default when absent
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Request body for `POST /navigate`
#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    /// Path the user navigated to, e.g. `/workout/today`
    pub path: String,
    /// Path the user came from
    #[serde(default)]
    pub from: Option<String>,
}

/// Request body for `POST /preload`
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadRequest {
    /// Modules to load, in priority order
    pub modules: Vec<String>,
}
