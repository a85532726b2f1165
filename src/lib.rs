//! hello_cache - a small web service around a bounded in-memory cache
//!
//! The cache keeps every entry for a fixed TTL and evicts the least recently
//! used entry once its capacity is reached. An HTTP API and a keep-alive
//! ping job sit on top of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use crate::api::AppState;
pub use crate::cache::CacheStore;
pub use crate::config::Config;
pub use crate::error::{ApiError, CacheError};
pub use crate::tasks::{spawn_cleanup_task, spawn_ping_task};
