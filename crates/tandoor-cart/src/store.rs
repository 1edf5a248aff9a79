//! A bounded key-value store with insertion-order eviction and read-time
//! expiry.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Map keyed by call ID with an explicit capacity bound and a retention
/// window.
///
/// Writes are last-write-wins per key. When the store is full, the entry
/// least recently written is evicted. Reads ignore (and drop) entries
/// older than the retention window relative to the supplied `now`.
pub struct BoundedTtlMap<V> {
    entries: HashMap<String, Entry<V>>,
    write_order: VecDeque<String>,
    capacity: usize,
    retention: Duration,
}

impl<V> BoundedTtlMap<V> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-capacity cache is a
    /// configuration error.
    pub fn new(capacity: usize, retention: Duration) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");
        Self {
            entries: HashMap::new(),
            write_order: VecDeque::new(),
            capacity,
            retention,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or overwrites the value for `key`, evicting the oldest
    /// entry if the store is at capacity.
    pub fn insert(&mut self, key: impl Into<String>, value: V, now: DateTime<Utc>) {
        let key = key.into();

        if self.entries.contains_key(&key) {
            self.write_order.retain(|existing| *existing != key);
        } else if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.write_order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!(key = %oldest, "evicted oldest cache entry at capacity");
            }
        }

        self.write_order.push_back(key.clone());
        self.entries.insert(key, Entry { value, stored_at: now });
    }

    /// Returns the value for `key` if present and within retention.
    ///
    /// An expired entry is removed and reported absent.
    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<&V> {
        if self.expire_if_stale(key, now) {
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Removes and returns the value for `key`, subject to the same
    /// retention check as [`get`](Self::get).
    pub fn remove(&mut self, key: &str, now: DateTime<Utc>) -> Option<V> {
        if self.expire_if_stale(key, now) {
            return None;
        }
        self.write_order.retain(|existing| existing != key);
        self.entries.remove(key).map(|entry| entry.value)
    }

    fn expire_if_stale(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        let stale = self
            .entries
            .get(key)
            .is_some_and(|entry| now - entry.stored_at > self.retention);
        if stale {
            self.entries.remove(key);
            self.write_order.retain(|existing| existing != key);
            tracing::debug!(key = %key, "dropped cache entry past retention window");
        }
        stale
    }
}
