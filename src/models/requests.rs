//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for `PUT /cache`
///
/// Both fields are optional on the wire: a missing or `null` key or value is
/// passed through to the cache, which rejects it as an invalid argument.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetRequest {
    /// The cache key
    #[serde(default)]
    pub key: Option<String>,
    /// Any JSON value except `null`
    #[serde(default)]
    pub value: Option<Value>,
}
