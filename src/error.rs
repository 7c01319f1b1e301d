//! Error types for the cache server
//!
//! Provides unified error handling using thiserror. Failures that end an
//! operation live in `CacheError`; the load-restart control signal used by
//! entry processing lives in `ProcessingError` and is deliberately a
//! separate type so it can never be surfaced to a caller as a failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// A failure stored in an entry (by a loader or an entry processor)
    /// was read back, re-surfaced with key context attached
    #[error("Stored failure for key '{key}': {message}")]
    StoredFailure { key: String, message: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Processing Error Enum ==
/// Outcome of reading a mutable entry during an entry-processor invocation.
///
/// `NeedsLoadRestart` is a control signal, not a failure: it tells the
/// invocation loop in `CacheStore::process_entry` to load the value and
/// re-run the processor with a fresh snapshot. Only the `Cache` variant
/// ever reaches callers.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The entry is a miss, nothing is pending, and read-through is on:
    /// load the value and re-enter the processor.
    #[error("value load required before processing can continue")]
    NeedsLoadRestart,

    /// A real failure, surfaced to the caller of `process_entry`.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::Expired(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::CacheFull(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::StoredFailure { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
