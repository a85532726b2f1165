//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and LRU eviction.

use std::time::Duration;

mod entry;
mod lru;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of live entries
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default time-to-live applied to every entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
