//! forgotten-recipes: retrieval and caching core of a recipe browser
//!
//! Exposes the library's public API: an expiring LRU cache, a multi-field
//! inverted index, bounded recent views, identity-keyed favorites, and the
//! retrieval service that composes them in front of a recipe gateway.

pub mod cache;
pub mod collections;
pub mod error;
pub mod gateway;
pub mod index;
pub mod models;
pub mod services;

// Re-export main types
pub use error::{RecipeError, Result};
pub use models::{Recipe, SearchFilters};

// Cache exports
pub use cache::{CacheConfig, CacheKey, CacheMetrics, CacheValue, ExpiringCache, RecipeCache};

// Collection exports
pub use collections::{BoundedDedupQueue, IdentitySet, KeyFn};

// Index exports
pub use index::{IndexField, InvertedIndex, Postings};

// Gateway exports
pub use gateway::{
    FileRecipeGateway, GatewayConfig, GatewayFactory, MockRecipeGateway, RecipeCorpus,
    RecipeGateway,
};

// Service exports
pub use services::{
    CacheCleanupJob, FileStateStore, MemoryStateStore, PersistedState, RetrievalConfig,
    RetrievalService, RetrievalServiceBuilder, StateStore,
};
