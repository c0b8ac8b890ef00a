//! Expiring LRU cache for recipe retrieval.
//!
//! This module provides:
//! - Thread-safe LRU cache with per-entry TTL
//! - A typed recipe cache (corpus, single recipes, search results)
//! - Cache metrics for monitoring
//!
//! # Example
//!
//! ```rust,ignore
//! use forgotten_recipes::cache::{CacheConfig, ExpiringCache};
//!
//! let config = CacheConfig::with_capacity(100)
//!     .ttl(std::time::Duration::from_secs(15 * 60));
//! let cache: ExpiringCache<String, u64> = ExpiringCache::new(config);
//! cache.set("answer".to_string(), 42);
//! ```

pub mod config;
pub mod entry;
pub mod lru_cache;
pub mod recipe_cache;

// Re-exports
pub use config::{CacheConfig, CacheMetrics};
pub use entry::CacheEntry;
pub use lru_cache::{EntryMetadata, ExpiringCache};
pub use recipe_cache::{CacheKey, CacheValue, RecipeCache};
