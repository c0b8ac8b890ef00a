//! Configuration for the cache module.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the expiring LRU cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache
    pub capacity: usize,

    /// Time-to-live used when `set` is called without an explicit TTL
    pub default_ttl: Duration,

    /// Whether to track cache metrics
    pub track_metrics: bool,

    /// Interval for the background cleanup job (None = lazy expiry only)
    pub cleanup_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            default_ttl: Duration::from_secs(15 * 60), // 15 minutes
            track_metrics: true,
            cleanup_interval: Some(Duration::from_secs(300)), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Creates a new cache configuration with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Sets the default TTL for cache entries
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.default_ttl = duration;
        self
    }

    /// Sets whether to track metrics
    pub fn track_metrics(mut self, track: bool) -> Self {
        self.track_metrics = track;
        self
    }

    /// Sets the cleanup interval
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = Some(interval);
        self
    }

    /// Disables the background cleanup job
    pub fn no_cleanup(mut self) -> Self {
        self.cleanup_interval = None;
        self
    }

    /// Loads configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = std::env::var("RECIPES_CACHE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.capacity = capacity;
        }

        if let Some(minutes) = std::env::var("RECIPES_CACHE_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|m| *m > 0)
        {
            config.default_ttl = Duration::from_secs(minutes * 60);
        }

        if let Some(secs) = std::env::var("RECIPES_CACHE_CLEANUP_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.cleanup_interval = if secs > 0 {
                Some(Duration::from_secs(secs))
            } else {
                None
            };
        }

        config
    }
}

/// Counters reported by `ExpiringCache::metrics`.
///
/// Expired entries count as misses on `get`; `expirations` also counts what
/// `cleanup` removes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    /// New keys that pushed out the least recently used entry
    pub evictions: u64,
    /// Entries dropped because their TTL ran out
    pub expirations: u64,
    /// Entries held right now, expired ones not yet swept included
    pub size: usize,
    pub capacity: usize,
}

impl CacheMetrics {
    /// Share of lookups served from the cache; 0.0 before any lookup
    pub fn hit_rate(&self) -> f64 {
        match self.total_requests() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Lookups made through `get`
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.default_ttl, Duration::from_secs(900));
        assert!(config.track_metrics);
        assert!(config.cleanup_interval.is_some());
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::with_capacity(500)
            .ttl(Duration::from_secs(60))
            .track_metrics(false)
            .no_cleanup();

        assert_eq!(config.capacity, 500);
        assert_eq!(config.default_ttl, Duration::from_secs(60));
        assert!(!config.track_metrics);
        assert!(config.cleanup_interval.is_none());
    }

    #[test]
    fn test_metrics_hit_rate() {
        let mut metrics = CacheMetrics::default();
        assert_eq!(metrics.hit_rate(), 0.0);

        metrics.hits = 75;
        metrics.misses = 25;
        assert!((metrics.hit_rate() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_metrics_total_requests() {
        let metrics = CacheMetrics {
            hits: 100,
            misses: 50,
            ..Default::default()
        };
        assert_eq!(metrics.total_requests(), 150);
    }
}
