//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    CacheInfoResponse, ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse,
};
use crate::tasks::{PingService, PingSettings, PingStatus};

/// Cache type shared by the HTTP layer: any JSON value except `null`.
pub type JsonCache = CacheStore<Value>;

/// Application state shared across all handlers.
///
/// Both members are handles; cloning the state shares the same cache and
/// ping counters.
#[derive(Clone)]
pub struct AppState {
    pub cache: JsonCache,
    pub ping: PingService,
}

impl AppState {
    pub fn new(cache: JsonCache, ping: PingService) -> Self {
        Self { cache, ping }
    }

    /// Builds the cache and ping service from configuration. The ping
    /// service memoises its responses in the same cache.
    pub fn from_config(config: &Config) -> Self {
        let cache = JsonCache::new(config.cache_capacity, config.cache_ttl());
        let ping = PingService::new(PingSettings::from_config(config)).with_cache(cache.clone());
        Self::new(cache, ping)
    }
}

/// Handler for GET /
pub async fn index_handler() -> &'static str {
    "Greetings from hello_cache!"
}

/// Handler for PUT /cache
///
/// A missing or `null` key or value is rejected with 400.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>, ApiError> {
    let SetRequest { key, value } = req;
    state.cache.put(key.as_deref(), value)?;

    Ok(Json(SetResponse::new(key.unwrap_or_default())))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>, ApiError> {
    match state.cache.get(key.as_str()) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
///
/// Deleting an unknown key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(key.as_str());
    Json(DeleteResponse::new(key))
}

/// Handler for GET /cache
pub async fn info_handler(State(state): State<AppState>) -> Json<CacheInfoResponse> {
    Json(CacheInfoResponse {
        size: state.cache.size(),
        capacity: state.cache.capacity(),
        ttl_secs: state.cache.ttl().as_secs(),
    })
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    Json(ClearResponse::cleared())
}

/// Handler for GET /ping-status
pub async fn ping_status_handler(State(state): State<AppState>) -> Json<PingStatus> {
    Json(state.ping.status())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::up(state.ping.status()))
}
