//! Thread-safe expiring LRU cache.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::config::{CacheConfig, CacheMetrics};
use super::entry::CacheEntry;

/// Capacity- and time-bounded key/value store with LRU eviction.
///
/// Every entry carries its own expiry. Expired entries are never returned:
/// they are dropped lazily by `get`/`has` and in bulk by `cleanup`. When a
/// new key is inserted at capacity the least recently used entry is evicted,
/// ties going to the earliest insertion.
pub struct ExpiringCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// The underlying LRU cache wrapped in a RwLock
    cache: RwLock<LruCache<K, CacheEntry<V>>>,

    /// Cache configuration
    config: CacheConfig,

    /// Atomic counters for metrics
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a new cache with the given configuration
    pub fn new(mut config: CacheConfig) -> Self {
        config.capacity = config.capacity.max(1);
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(CacheConfig::with_capacity(capacity))
    }

    /// Gets a value from the cache, marking it most recently used
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().ok()?;

        if let Some(entry) = cache.peek(key) {
            if entry.is_expired() {
                cache.pop(key);
                self.record(&self.expirations, 1);
                self.record(&self.misses, 1);
                return None;
            }
        }

        // get_mut promotes the entry in LRU order
        if let Some(entry) = cache.get_mut(key) {
            entry.touch();
            self.record(&self.hits, 1);
            Some(entry.value.clone())
        } else {
            self.record(&self.misses, 1);
            None
        }
    }

    /// Inserts a value with the default TTL
    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.config.default_ttl);
    }

    /// Inserts a value that expires `ttl` from now
    ///
    /// Replacing an existing key discards its old position. Inserting a new
    /// key at capacity evicts the least recently used entry first.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let Ok(mut cache) = self.cache.write() else {
            return;
        };

        let entry = CacheEntry::new(value, ttl);
        if let Some((evicted, _)) = cache.push(key.clone(), entry) {
            if evicted != key {
                self.record(&self.evictions, 1);
            }
        }
    }

    /// Checks whether a fresh value exists, without affecting LRU order
    ///
    /// An expired entry found here is removed.
    pub fn has(&self, key: &K) -> bool {
        let Ok(mut cache) = self.cache.write() else {
            return false;
        };

        match cache.peek(key).map(CacheEntry::is_expired) {
            Some(false) => true,
            Some(true) => {
                cache.pop(key);
                self.record(&self.expirations, 1);
                false
            }
            None => false,
        }
    }

    /// Reads a fresh value without affecting LRU order or metrics
    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.cache.read().ok()?;
        cache
            .peek(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Removes a value from the cache
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().ok()?;
        cache.pop(key).map(CacheEntry::into_value)
    }

    /// Removes every expired entry, returning how many were dropped
    pub fn cleanup(&self) -> usize {
        let Ok(mut cache) = self.cache.write() else {
            return 0;
        };

        let now = Instant::now();
        let expired_keys: Vec<K> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            cache.pop(&key);
        }

        self.record(&self.expirations, count as u64);
        count
    }

    /// Returns the current number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Alias of `len`
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Checks if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity of the cache
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Clears all entries from the cache
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> Vec<K> {
        self.cache
            .read()
            .map(|c| c.iter().rev().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the current cache metrics
    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            size: self.len(),
            capacity: self.capacity(),
        }
    }

    /// Resets all metrics counters
    pub fn reset_metrics(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
    }

    /// Returns the configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Gets entry metadata without returning the value or touching recency
    pub fn entry_metadata(&self, key: &K) -> Option<EntryMetadata> {
        let cache = self.cache.read().ok()?;
        cache.peek(key).map(|entry| EntryMetadata {
            access_count: entry.access_count,
            age: entry.age(),
            remaining_ttl: entry.remaining_ttl(),
            is_expired: entry.is_expired(),
        })
    }

    fn record(&self, counter: &AtomicU64, n: u64) {
        if self.config.track_metrics && n > 0 {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }
}

/// Metadata about a cache entry
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    /// Number of reads served by the entry
    pub access_count: u64,

    /// How long since the entry was stored
    pub age: Duration,

    /// Remaining TTL (None if expired)
    pub remaining_ttl: Option<Duration>,

    /// Whether the entry has expired
    pub is_expired: bool,
}
