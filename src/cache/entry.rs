//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write timestamp
    pub inserted_at: Instant,
    /// `inserted_at + ttl`, or `None` when that instant is not representable
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry written now, expiring after `ttl`.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::written_at(value, Instant::now(), ttl)
    }

    /// Creates an entry with an explicit write time.
    ///
    /// A TTL too large to add to `inserted_at` makes the entry never expire.
    pub fn written_at(value: V, inserted_at: Instant, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at,
            expires_at: inserted_at.checked_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so a
    /// fully elapsed TTL never yields the value.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(
            entry.expires_at,
            Some(entry.inserted_at + Duration::from_secs(60))
        );
        assert!(!entry.is_expired_at(entry.inserted_at));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = CacheEntry::written_at(1u32, now, Duration::from_millis(30));

        assert!(!entry.is_expired_at(now + Duration::from_millis(10)));
        assert!(entry.is_expired_at(now + Duration::from_millis(60)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::written_at("test", now, Duration::ZERO);

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_not_expired_just_before_boundary() {
        let now = Instant::now();
        let entry = CacheEntry::written_at("test", now, Duration::from_secs(5));

        assert!(!entry.is_expired_at(now + Duration::from_millis(4_999)));
        assert!(entry.is_expired_at(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let now = Instant::now();
        let entry = CacheEntry::written_at("test", now, Duration::from_secs(u64::MAX));

        assert_eq!(entry.expires_at, None);
        assert!(!entry.is_expired_at(now + Duration::from_secs(365 * 24 * 3600)));
    }
}
