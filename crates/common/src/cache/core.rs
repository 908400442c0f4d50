//! TTL cache implementation

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::stats::MetricsCollector;
use crate::cache::CacheStats;
use crate::resilience::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe keyed cache with per-entry time-to-live
///
/// Entries expire `ttl` after insertion; expiry is checked lazily on `get`.
/// There is no size bound: the expected population is one entry per active
/// user. Clones share the same storage.
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone`)
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for expiry checks (defaults to `SystemClock`)
pub struct TtlCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    storage: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache with the given time-to-live using the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            metrics: MetricsCollector::default(),
            clock,
        }
    }

    /// Insert a value, resetting its TTL window
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry { value, inserted_at: self.clock.now() };
        if let Ok(mut storage) = self.storage.write() {
            storage.insert(key, entry);
            self.metrics.record_insert();
        }
    }

    /// Get a value, returning `None` if the key is absent or expired
    ///
    /// Expired entries are removed on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        let Ok(mut storage) = self.storage.write() else {
            return None;
        };

        match storage.get(key) {
            None => {
                self.metrics.record_miss();
                None
            }
            Some(entry) => {
                let age = self.clock.now().duration_since(entry.inserted_at);
                if age >= self.ttl {
                    storage.remove(key);
                    self.metrics.record_miss();
                    self.metrics.record_expiration();
                    None
                } else {
                    self.metrics.record_hit();
                    Some(entry.value.clone())
                }
            }
        }
    }

    /// Remove a single entry
    pub fn remove(&self, key: &K) -> Option<V> {
        self.storage.write().ok()?.remove(key).map(|e| e.value)
    }

    /// Clear all entries and reset metrics
    pub fn clear(&self) {
        if let Ok(mut storage) = self.storage.write() {
            storage.clear();
        }
        self.metrics.reset();
    }

    /// Current number of entries, expired or not
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of access counters
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }
}

impl<K, V, C> Clone for TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            ttl: self.ttl,
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
