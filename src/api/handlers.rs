//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. The increment
//! handler is the one that goes through the entry-processor pipeline; the
//! rest use the store's plain operations.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, IncrRequest, IncrResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Contains the cache store wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let cache = CacheStore::new(config.max_entries, config.default_ttl);
        Self::new(cache)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    req.validate().map_err(CacheError::InvalidRequest)?;

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, req.ttl)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key. An entry holding a stored
/// failure surfaces it as a 502 with key context.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: the read touches recency tracking and stats
    let mut cache = state.cache.write().await;
    let value = cache.get(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /incr/:key
///
/// Atomically adds a delta to the integer stored under the key, through a
/// single entry-processor invocation. A missing counter starts at zero.
pub async fn incr_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<IncrRequest>,
) -> Result<Json<IncrResponse>> {
    let mut cache = state.cache.write().await;
    let value = cache.increment(&key, req.delta)?;

    Ok(Json(IncrResponse::new(key, value)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    let stats = cache.stats();

    Json(StatsResponse::new(&stats))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = AppState::new(CacheStore::new(100, 300));

        let req = SetRequest {
            key: "test_key".to_string(),
            value: "test_value".to_string(),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.value, "test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = AppState::new(CacheStore::new(100, 300));

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = AppState::new(CacheStore::new(100, 300));

        let req = SetRequest {
            key: "to_delete".to_string(),
            value: "value".to_string(),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = get_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_incr_handler_counts_from_zero() {
        let state = AppState::new(CacheStore::new(100, 300));

        let response = incr_handler(
            State(state.clone()),
            Path("counter".to_string()),
            Json(IncrRequest { delta: 5 }),
        )
        .await
        .unwrap();
        assert_eq!(response.value, 5);

        let response = incr_handler(
            State(state.clone()),
            Path("counter".to_string()),
            Json(IncrRequest { delta: -2 }),
        )
        .await
        .unwrap();
        assert_eq!(response.value, 3);
    }

    #[tokio::test]
    async fn test_incr_handler_rejects_non_integer() {
        let state = AppState::new(CacheStore::new(100, 300));

        let req = SetRequest {
            key: "text".to_string(),
            value: "hello".to_string(),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let result = incr_handler(
            State(state),
            Path("text".to_string()),
            Json(IncrRequest { delta: 1 }),
        )
        .await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = AppState::new(CacheStore::new(100, 300));

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.loads, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = AppState::new(CacheStore::new(100, 300));

        let req = SetRequest {
            key: "".to_string(), // Empty key is invalid
            value: "value".to_string(),
            ttl: None,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(result.is_err());
    }
}
