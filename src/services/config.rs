//! Service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;

/// Regions fetched to assemble the full corpus.
pub const DEFAULT_SEED_REGIONS: &[&str] = &["Indian", "Chinese", "Italian"];

/// Regions reported when the gateway cannot list them.
pub const FALLBACK_REGIONS: &[&str] = &[
    "Indian", "Chinese", "Italian", "Mexican", "Thai", "French", "Japanese",
];

/// Recipe types reported when the gateway cannot list them.
pub const FALLBACK_TYPES: &[&str] = &["Main Course", "Dessert", "Appetizer", "Side Dish", "Snack"];

/// Configuration for the retrieval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Cache sizing, default TTL and cleanup interval.
    pub cache: CacheConfig,

    /// Regions fetched (concurrently) for the full corpus.
    pub seed_regions: Vec<String>,

    /// TTL of the cached full corpus.
    pub corpus_ttl: Duration,

    /// TTL of cached search results.
    pub search_ttl: Duration,

    /// Maximum number of recently viewed recipes kept.
    pub recent_views_size: usize,

    /// Key under which recent views and favorites are persisted.
    pub state_key: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            seed_regions: DEFAULT_SEED_REGIONS.iter().map(|s| s.to_string()).collect(),
            corpus_ttl: Duration::from_secs(10 * 60), // 10 minutes
            search_ttl: Duration::from_secs(5 * 60),  // 5 minutes
            recent_views_size: 10,
            state_key: "forgotten-recipes".to_string(),
        }
    }
}

impl RetrievalConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Builder: set seed regions.
    pub fn with_seed_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set corpus TTL.
    pub fn with_corpus_ttl(mut self, ttl: Duration) -> Self {
        self.corpus_ttl = ttl;
        self
    }

    /// Builder: set search TTL.
    pub fn with_search_ttl(mut self, ttl: Duration) -> Self {
        self.search_ttl = ttl;
        self
    }

    /// Builder: set recent views size.
    pub fn with_recent_views_size(mut self, size: usize) -> Self {
        self.recent_views_size = size.max(1);
        self
    }

    /// Builder: set state key.
    pub fn with_state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = key.into();
        self
    }

    /// Creates configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            cache: CacheConfig::from_env(),
            ..Self::default()
        };

        if let Ok(val) = std::env::var("RECIPES_SEED_REGIONS") {
            let regions: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !regions.is_empty() {
                config.seed_regions = regions;
            }
        }

        if let Ok(val) = std::env::var("RECIPES_RECENT_VIEWS") {
            if let Ok(size) = val.parse::<usize>() {
                config.recent_views_size = size.max(1);
            }
        }

        if let Ok(key) = std::env::var("RECIPES_STATE_KEY") {
            if !key.trim().is_empty() {
                config.state_key = key.trim().to_string();
            }
        }

        config
    }
}
