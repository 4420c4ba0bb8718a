//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, ConfigError, Result};
use crate::metrics::ServerMetrics;
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The TTL cache; thread-safe on its own, no outer lock needed
    pub cache: Arc<Cache<String>>,
    /// Server-level request counters
    pub metrics: Arc<ServerMetrics>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Cache<String>) -> Self {
        Self {
            cache: Arc::new(cache),
            metrics: Arc::new(ServerMetrics::new()),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the cache sizing parameters are invalid; no partial state is
    /// created in that case.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let cache = Cache::new(config.cache.clone())?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        state.metrics.record_error();
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.map(Duration::from_secs);
    state.cache.set(req.key.clone(), req.value, ttl).await;
    state.metrics.record_set();

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key. Missing and expired keys both
/// surface as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    state.metrics.record_get();

    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Deleting an absent key succeeds, since the
/// outcome is the same either way.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(&key).await;
    state.metrics.record_delete();

    Json(DeleteResponse::new(key))
}

/// Handler for POST /clear
///
/// Removes every entry from the cache.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    state.metrics.record_clear();

    Json(ClearResponse::new())
}

/// Handler for GET /stats
///
/// Returns cache hit/miss statistics plus server request counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache_stats = state.cache.stats().await;
    let server = state.metrics.snapshot();

    Json(StatsResponse::new(cache_stats, server))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
