//! Periodic removal of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::retrieval::RetrievalService;

/// Cleanup job that runs periodically
pub struct CacheCleanupJob {
    service: Arc<RetrievalService>,
    interval: Duration,
}

impl CacheCleanupJob {
    pub fn new(service: Arc<RetrievalService>, interval: Duration) -> Self {
        Self {
            service,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Uses the cache cleanup interval from the service configuration.
    ///
    /// Returns `None` when cleanup is disabled (lazy expiry only).
    pub fn from_config(service: Arc<RetrievalService>) -> Option<Self> {
        let interval = service.config().cache.cleanup_interval?;
        Some(Self::new(service, interval))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the cleanup job (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let count = self.service.cleanup_cache();
                if count > 0 {
                    debug!("Cleanup job removed {} expired cache entries", count);
                }
            }
        })
    }
}
