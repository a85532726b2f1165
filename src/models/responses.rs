//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::tasks::PingStatus;

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for `PUT /cache`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for `DELETE /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for `GET /cache`
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfoResponse {
    /// Current number of live entries
    pub size: usize,
    /// Maximum number of live entries
    pub capacity: usize,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, always "UP" when the server answers
    pub status: String,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub ping_status: PingStatus,
}

impl HealthResponse {
    /// Creates an "UP" response stamped with the current time.
    pub fn up(ping_status: PingStatus) -> Self {
        Self {
            status: "UP".to_string(),
            message: "hello_cache is running".to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            ping_status,
        }
    }
}
