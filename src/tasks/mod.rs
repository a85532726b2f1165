//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals
//! - Ping: Requests a keep-alive URL at a fixed rate

mod cleanup;
mod ping;

pub use cleanup::spawn_cleanup_task;
pub use ping::{spawn_ping_task, PingService, PingSettings, PingStatus, LAST_RESPONSE_KEY};
