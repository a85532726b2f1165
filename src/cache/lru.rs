//! LRU Tracker Module
//!
//! Recency ordering used to pick the eviction victim when the store is full.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Orders keys from least to most recently used.
///
/// Every touch stamps the key with the next value of a monotonic counter.
/// `order` maps stamps back to keys, so its first entry is always the least
/// recently used key and ties cannot occur.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Stamp of the latest use per key
    stamps: HashMap<String, u64>,
    /// Keys by stamp, oldest first
    order: BTreeMap<u64, String>,
    /// Next stamp to hand out
    clock: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a tracker with no keys and the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if new.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.clock;
        self.clock += 1;

        match self.stamps.get_mut(key) {
            Some(previous) => {
                if let Some(owned) = self.order.remove(&*previous) {
                    self.order.insert(stamp, owned);
                }
                *previous = stamp;
            }
            None => {
                self.stamps.insert(key.to_string(), stamp);
                self.order.insert(stamp, key.to_string());
            }
        }
    }

    // == Remove ==
    /// Stops tracking `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Pops the key with the oldest stamp, or `None` when nothing is tracked.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Clear ==
    /// Forgets every tracked key.
    pub fn clear(&mut self) {
        self.stamps.clear();
        self.order.clear();
    }
}

// Inspection helpers for tests
#[cfg(test)]
impl LruTracker {
    /// Key that `evict_oldest` would return next.
    fn peek_oldest(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    fn len(&self) -> usize {
        self.stamps.len()
    }

    fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }
}
