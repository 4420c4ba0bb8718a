//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Config Error Enum ==
/// Construction-time configuration error.
///
/// Each sizing field of [`crate::config::CacheConfig`] has its own variant, so
/// callers can match on the offending field rather than parse a message.
/// These are the only errors the cache can produce: once constructed, the
/// runtime operations (get/set/delete/clear) never fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// max_cost must be a positive cost budget
    #[error("invalid configuration: max_cost must be positive")]
    InvalidMaxCost,

    /// num_counters must be a positive counter count
    #[error("invalid configuration: num_counters must be positive")]
    InvalidNumCounters,

    /// buffer_items must be a positive buffer size
    #[error("invalid configuration: buffer_items must be positive")]
    InvalidBufferItems,
}

impl ConfigError {
    /// Name of the configuration field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::InvalidMaxCost => "max_cost",
            ConfigError::InvalidNumCounters => "num_counters",
            ConfigError::InvalidBufferItems => "buffer_items",
        }
    }
}

// == Cache Error Enum ==
/// Unified error type for the HTTP surface of the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache (missing or expired)
    #[error("key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CacheError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            CacheError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, CacheError>;
