//! Mock recipe gateway for testing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::corpus::RecipeCorpus;
use super::provider::RecipeGateway;
use crate::error::{RecipeError, Result};
use crate::models::Recipe;

/// Number of calls made to each gateway method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub by_region: usize,
    pub by_ingredient: usize,
    pub by_query: usize,
    pub by_id: usize,
    pub list_regions: usize,
    pub list_types: usize,
}

impl CallCounts {
    /// Calls that fetch recipes (metadata listings excluded)
    pub fn fetches(&self) -> usize {
        self.by_region + self.by_ingredient + self.by_query + self.by_id
    }
}

#[derive(Debug, Default)]
struct Counters {
    by_region: AtomicUsize,
    by_ingredient: AtomicUsize,
    by_query: AtomicUsize,
    by_id: AtomicUsize,
    list_regions: AtomicUsize,
    list_types: AtomicUsize,
}

/// Mock gateway serving an in-memory corpus
///
/// Counts every call, and can be configured to fail globally, to fail for
/// specific regions, or to add latency.
pub struct MockRecipeGateway {
    corpus: RecipeCorpus,
    latency: Duration,
    should_fail: bool,
    failing_regions: HashSet<String>,
    failures_left: AtomicUsize,
    counters: Counters,
}

impl MockRecipeGateway {
    /// Creates a mock gateway over the given recipes
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            corpus: RecipeCorpus::new(recipes),
            latency: Duration::ZERO,
            should_fail: false,
            failing_regions: HashSet::new(),
            failures_left: AtomicUsize::new(0),
            counters: Counters::default(),
        }
    }

    /// Creates a mock gateway with no recipes
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Creates a mock gateway that fails every call
    pub fn failing() -> Self {
        Self::empty().should_fail(true)
    }

    /// Sets the simulated latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the gateway fail on all operations
    pub fn should_fail(mut self, fail: bool) -> Self {
        self.should_fail = fail;
        self
    }

    /// Makes `fetch_by_region` fail for this region only
    pub fn fail_region(mut self, region: impl Into<String>) -> Self {
        self.failing_regions.insert(region.into());
        self
    }

    /// Makes the next `count` calls fail, after which the gateway recovers
    pub fn fail_times(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Snapshot of the call counters
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            by_region: self.counters.by_region.load(Ordering::SeqCst),
            by_ingredient: self.counters.by_ingredient.load(Ordering::SeqCst),
            by_query: self.counters.by_query.load(Ordering::SeqCst),
            by_id: self.counters.by_id.load(Ordering::SeqCst),
            list_regions: self.counters.list_regions.load(Ordering::SeqCst),
            list_types: self.counters.list_types.load(Ordering::SeqCst),
        }
    }

    pub fn corpus(&self) -> &RecipeCorpus {
        &self.corpus
    }

    async fn enter(&self, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.should_fail {
            return Err(RecipeError::Upstream(
                "Mock gateway configured to fail".to_string(),
            ));
        }

        let transient = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if transient {
            return Err(RecipeError::Upstream(
                "Mock gateway transient failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeGateway for MockRecipeGateway {
    async fn fetch_by_region(&self, region: &str) -> Result<Vec<Recipe>> {
        self.enter(&self.counters.by_region).await?;
        if self.failing_regions.contains(region) {
            return Err(RecipeError::Upstream(format!(
                "Mock gateway configured to fail for region {}",
                region
            )));
        }
        Ok(self.corpus.by_region(region))
    }

    async fn fetch_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>> {
        self.enter(&self.counters.by_ingredient).await?;
        Ok(self.corpus.by_ingredient(ingredient))
    }

    async fn fetch_by_query(
        &self,
        query: &str,
        region: Option<&str>,
        recipe_type: Option<&str>,
    ) -> Result<Vec<Recipe>> {
        self.enter(&self.counters.by_query).await?;
        Ok(self.corpus.by_query(query, region, recipe_type))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        self.enter(&self.counters.by_id).await?;
        Ok(self.corpus.by_id(id))
    }

    async fn list_regions(&self) -> Result<Vec<String>> {
        self.enter(&self.counters.list_regions).await?;
        Ok(self.corpus.regions())
    }

    async fn list_types(&self) -> Result<Vec<String>> {
        self.enter(&self.counters.list_types).await?;
        Ok(self.corpus.types())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.should_fail)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MockRecipeGateway {
        MockRecipeGateway::new(vec![
            Recipe::new(1, "Dal").with_region("Indian"),
            Recipe::new(2, "Risotto").with_region("Italian"),
        ])
    }

    #[tokio::test]
    async fn test_mock_gateway_counts_calls() {
        let gw = gateway();

        gw.fetch_by_region("Indian").await.unwrap();
        gw.fetch_by_id("1").await.unwrap();
        gw.fetch_by_id("1").await.unwrap();
        gw.list_regions().await.unwrap();

        let calls = gw.calls();
        assert_eq!(calls.by_region, 1);
        assert_eq!(calls.by_id, 2);
        assert_eq!(calls.list_regions, 1);
        assert_eq!(calls.fetches(), 3);
    }

    #[tokio::test]
    async fn test_mock_gateway_should_fail() {
        let gw = MockRecipeGateway::failing();

        let err = gw.fetch_by_region("Indian").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(gw.fetch_by_id("1").await.is_err());
        assert!(!gw.health_check().await.unwrap());

        // Failed calls are still counted
        assert_eq!(gw.calls().fetches(), 2);
    }

    #[tokio::test]
    async fn test_mock_gateway_fail_single_region() {
        let gw = gateway().fail_region("Italian");

        assert_eq!(gw.fetch_by_region("Indian").await.unwrap().len(), 1);
        assert!(gw.fetch_by_region("Italian").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_gateway_recovers_after_transient_failures() {
        let gw = gateway().fail_times(2);

        assert!(gw.fetch_by_region("Indian").await.is_err());
        assert!(gw.fetch_by_id("1").await.is_err());
        assert_eq!(gw.fetch_by_region("Indian").await.unwrap().len(), 1);
        assert_eq!(gw.calls().fetches(), 3);
    }

    #[tokio::test]
    async fn test_mock_gateway_not_found_is_none() {
        let gw = gateway();
        assert!(gw.fetch_by_id("404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_gateway_latency() {
        let gw = gateway().with_latency(Duration::from_millis(20));
        let start = std::time::Instant::now();
        gw.list_types().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_mock_gateway_name() {
        assert_eq!(MockRecipeGateway::empty().provider_name(), "mock");
    }
}
