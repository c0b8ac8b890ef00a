//! Business services for forgotten-recipes.
//!
//! This module provides:
//! - **Retrieval**: cache-aside recipe access, search, recent views, favorites
//! - **Storage**: persistence of recent views and favorites
//! - **Cleanup**: background expiry of cache entries
//! - **Configuration**: service-level settings
//!
//! # Retrieval
//!
//! ```ignore
//! use forgotten_recipes::services::{RetrievalConfig, RetrievalService};
//! use forgotten_recipes::models::SearchFilters;
//!
//! let service = RetrievalService::builder()
//!     .with_config(RetrievalConfig::from_env())
//!     .with_gateway(gateway)
//!     .with_store(store)
//!     .load()
//!     .await;
//!
//! let curries = service.search(&SearchFilters::new().tag("curry"), "").await;
//! ```

pub mod cleanup;
pub mod config;
pub mod retrieval;
pub mod storage;

// Re-exports
pub use cleanup::CacheCleanupJob;
pub use config::{RetrievalConfig, DEFAULT_SEED_REGIONS, FALLBACK_REGIONS, FALLBACK_TYPES};
pub use retrieval::{RetrievalService, RetrievalServiceBuilder};
pub use storage::{FileStateStore, MemoryStateStore, PersistedState, StateStore};
