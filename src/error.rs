//! Error types for the navigation cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Nav Cache Error Enum ==
/// Unified error type for the navigation cache and its HTTP surface.
///
/// The retry executor and the module registry are generic over the caller's
/// error type, so this enum only shows up where the crate itself produces
/// failures (module sources, configuration, HTTP handlers).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavCacheError {
    /// Key not present (or no longer fresh) in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Retry policy or scheduler configuration rejected
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Module name absent from the module catalog
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// A module load attempt failed
    #[error("Failed to load module {module}: {reason}")]
    LoadFailed { module: String, reason: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NavCacheError {
    /// Shorthand for a [`NavCacheError::LoadFailed`].
    pub fn load_failed(module: impl Into<String>, reason: impl ToString) -> Self {
        NavCacheError::LoadFailed {
            module: module.into(),
            reason: reason.to_string(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for NavCacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            NavCacheError::NotFound(_) => StatusCode::NOT_FOUND,
            NavCacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            NavCacheError::InvalidPolicy(_) => StatusCode::BAD_REQUEST,
            NavCacheError::UnknownModule(_) => StatusCode::NOT_FOUND,
            NavCacheError::LoadFailed { .. } => StatusCode::BAD_GATEWAY,
            NavCacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the navigation cache.
pub type Result<T> = std::result::Result<T, NavCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (NavCacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (NavCacheError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (NavCacheError::InvalidPolicy("x".into()), StatusCode::BAD_REQUEST),
            (NavCacheError::UnknownModule("m".into()), StatusCode::NOT_FOUND),
            (NavCacheError::load_failed("m", "boom"), StatusCode::BAD_GATEWAY),
            (NavCacheError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_load_failed_message() {
        let err = NavCacheError::load_failed("coach", "connection reset");
        assert_eq!(
            err.to_string(),
            "Failed to load module coach: connection reset"
        );
    }
}
