//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, LruTracker, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::error::{CacheError, Result};

// == Store Inner ==
/// Entry map and recency bookkeeping, always mutated together under one lock.
#[derive(Debug)]
struct StoreInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
}

impl<V: Clone> StoreInner<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
        }
    }

    fn insert(&mut self, key: &str, entry: CacheEntry<V>, capacity: usize) {
        if let Some(existing) = self.entries.get_mut(key) {
            *existing = entry;
            self.lru.touch(key);
            return;
        }

        if self.entries.len() >= capacity {
            // Expired entries give their slots back before any live one is evicted
            let reclaimed = self.purge_expired(entry.inserted_at);
            if reclaimed > 0 {
                debug!(reclaimed, "reclaimed expired entries to make room");
            }
        }

        if self.entries.len() >= capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                trace!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
    }

    fn get(&mut self, key: &str, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.is_expired_at(now) {
            self.remove(key);
            debug!(key, "dropped expired entry on read");
            return None;
        }

        let value = entry.value.clone();
        self.lru.touch(key);
        Some(value)
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    fn live_count(&self, now: Instant) -> usize {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }
}

// == Cache Store ==
/// Bounded key-value store with a uniform TTL and LRU eviction.
///
/// `CacheStore` is a cheap handle: clones share the same underlying entries,
/// so one instance can be created at startup and handed to every caller.
/// All operations take `&self` and are safe to call from many threads.
///
/// Keys and values are accepted as `Option`s at the `put`/`get`/`delete`
/// boundary so that callers holding possibly-absent input (JSON bodies,
/// query parameters) pass it straight through. Plain `&str` and `V` convert
/// implicitly.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Arc<Mutex<StoreInner<V>>>,
    /// Maximum number of live entries
    capacity: usize,
    /// Lifetime of every entry, restarted on each write
    ttl: Duration,
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
            ttl: self.ttl,
        }
    }
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and TTL.
    ///
    /// A capacity of zero is raised to one so that the newest write is
    /// always retrievable.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::new())),
            capacity: capacity.max(1),
            ttl,
        }
    }

    // == Put ==
    /// Stores a value under `key`, restarting its TTL.
    ///
    /// Overwriting an existing key never evicts. Admitting a new key into a
    /// full store evicts exactly one entry, the least recently used one.
    ///
    /// # Errors
    /// `CacheError::InvalidArgument` if the key or the value is absent. The
    /// store is left untouched in that case.
    pub fn put<'k>(
        &self,
        key: impl Into<Option<&'k str>>,
        value: impl Into<Option<V>>,
    ) -> Result<()> {
        let key = key
            .into()
            .ok_or_else(|| CacheError::InvalidArgument("Cache key cannot be null".to_string()))?;
        let value = value
            .into()
            .ok_or_else(|| CacheError::InvalidArgument("Cache value cannot be null".to_string()))?;

        self.insert(key, value);
        Ok(())
    }

    /// Infallible form of [`put`](Self::put) for callers that already hold
    /// a key and a value.
    pub fn insert(&self, key: &str, value: V) {
        let entry = CacheEntry::new(value, self.ttl);
        self.inner.lock().insert(key, entry, self.capacity);
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// An absent key, a missing entry and an expired entry all yield `None`.
    /// Expired entries found here are removed on the spot. A hit marks the
    /// key as recently used.
    pub fn get<'k>(&self, key: impl Into<Option<&'k str>>) -> Option<V> {
        let key = key.into()?;
        let now = Instant::now();
        self.inner.lock().get(key, now)
    }

    // == Delete ==
    /// Removes the entry under `key`, if any. Absent or unknown keys are a no-op.
    pub fn delete<'k>(&self, key: impl Into<Option<&'k str>>) {
        if let Some(key) = key.into() {
            self.inner.lock().remove(key);
        }
    }

    // == Size ==
    /// Returns the number of live (unexpired) entries.
    pub fn size(&self) -> usize {
        let now = Instant::now();
        self.inner.lock().live_count(now)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    ///
    /// Expiry is decided under the store lock, so an entry refreshed by a
    /// concurrent `put` is never removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        self.inner.lock().purge_expired(now)
    }

    /// Number of entries physically held, including expired ones not yet
    /// reclaimed.
    pub fn resident(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
