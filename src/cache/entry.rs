//! Cache entry with expiry metadata.

use std::time::{Duration, Instant};

/// Shortest TTL an entry can carry, so that `expires_at > stored_at` holds
pub const MIN_TTL: Duration = Duration::from_millis(1);

/// A cache entry with its storage and expiry instants
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached value
    pub value: V,

    /// When the entry was stored
    pub stored_at: Instant,

    /// After this instant the entry must not be returned
    pub expires_at: Instant,

    /// Number of reads served by this entry
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry expiring `ttl` from now
    pub fn new(value: V, ttl: Duration) -> Self {
        let stored_at = Instant::now();
        Self {
            value,
            stored_at,
            expires_at: stored_at + ttl.max(MIN_TTL),
            access_count: 0,
        }
    }

    /// Checks if this entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    /// Records a read
    pub fn touch(&mut self) {
        self.access_count += 1;
    }

    /// Returns the age of this entry
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Returns remaining TTL (None if expired)
    pub fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }

    /// Consumes the entry and returns the value
    pub fn into_value(self) -> V {
        self.value
    }
}
