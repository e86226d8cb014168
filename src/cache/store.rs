// In-memory response cache.
// Maps a request key (the full URL) to a previously fetched value with an optional expiry.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Default TTL for cached API responses: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default number of responses kept before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 256;

/// A cached value with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached value.
    pub value: V,
    /// When the value was stored.
    pub inserted_at: DateTime<Utc>,
    /// When the value stops being served. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, now: DateTime<Utc>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.and_then(|ttl| {
            chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|delta| now.checked_add_signed(delta))
        });
        Self {
            value,
            inserted_at: now,
            expires_at,
        }
    }

    /// Check if this entry has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// Key-value cache with lazy TTL eviction and an optional size bound.
#[derive(Debug, Clone)]
pub struct ResponseCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    default_ttl: Option<Duration>,
    capacity: Option<usize>,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl: None,
            capacity: None,
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Create an unbounded cache whose entries never expire unless given a TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL applied by `set` when the caller passes `None`.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Bound the number of entries. A capacity of 0 is treated as 1.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Get a value if present and not expired.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    /// Get a value as of `now`. An expired entry is removed and reported as a miss.
    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let expired = self.entries.get(key)?.is_expired(now);
        if expired {
            debug!(key, "cache entry expired");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value. `ttl = None` uses the default TTL, if any.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.set_at(key, value, ttl, Utc::now());
    }

    /// Store a value as of `now`.
    pub fn set_at(
        &mut self,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) {
        let key = key.into();
        let ttl = ttl.or(self.default_ttl);

        if let Some(capacity) = self.capacity {
            if !self.entries.contains_key(&key) && self.entries.len() >= capacity {
                self.purge_expired_at(now);
                if self.entries.len() >= capacity {
                    self.evict_oldest();
                }
            }
        }

        self.entries.insert(key, CacheEntry::new(value, now, ttl));
    }

    /// Remove a single entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!(key, "evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }
}
