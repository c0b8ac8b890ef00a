//! Recipe gateway backed by a JSON file of recipes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::corpus::RecipeCorpus;
use super::provider::RecipeGateway;
use crate::error::{RecipeError, Result};
use crate::models::Recipe;

/// Gateway that reads a JSON array of recipes on first use
///
/// The file is read once, under the configured timeout; later calls answer
/// from memory. A failed load is not cached, so the next call retries.
pub struct FileRecipeGateway {
    path: PathBuf,
    timeout: Duration,
    corpus: OnceCell<RecipeCorpus>,
}

impl FileRecipeGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: Duration::from_secs(30),
            corpus: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn corpus(&self) -> Result<&RecipeCorpus> {
        self.corpus.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<RecipeCorpus> {
        debug!("Loading recipe corpus from {}", self.path.display());

        let raw = tokio::time::timeout(self.timeout, tokio::fs::read_to_string(&self.path))
            .await?
            .map_err(|e| {
                RecipeError::Upstream(format!("Failed to read {}: {}", self.path.display(), e))
            })?;

        let recipes: Vec<Recipe> = serde_json::from_str(&raw)?;
        info!(
            "Loaded {} recipes from {}",
            recipes.len(),
            self.path.display()
        );

        Ok(RecipeCorpus::new(recipes))
    }
}

#[async_trait]
impl RecipeGateway for FileRecipeGateway {
    async fn fetch_by_region(&self, region: &str) -> Result<Vec<Recipe>> {
        Ok(self.corpus().await?.by_region(region))
    }

    async fn fetch_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>> {
        Ok(self.corpus().await?.by_ingredient(ingredient))
    }

    async fn fetch_by_query(
        &self,
        query: &str,
        region: Option<&str>,
        recipe_type: Option<&str>,
    ) -> Result<Vec<Recipe>> {
        Ok(self.corpus().await?.by_query(query, region, recipe_type))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        Ok(self.corpus().await?.by_id(id))
    }

    async fn list_regions(&self) -> Result<Vec<String>> {
        Ok(self.corpus().await?.regions())
    }

    async fn list_types(&self) -> Result<Vec<String>> {
        Ok(self.corpus().await?.types())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.corpus().await.is_ok())
    }

    fn provider_name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_corpus(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("recipes.json");
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_gateway_serves_corpus() {
        let dir = TempDir::new().unwrap();
        let json = serde_json::to_string(&vec![
            Recipe::new(1, "Dal").with_region("Indian").with_type("Main Course"),
            Recipe::new(2, "Tiramisu").with_region("Italian").with_type("Dessert"),
        ])
        .unwrap();
        let path = write_corpus(&dir, &json).await;

        let gw = FileRecipeGateway::new(path);
        assert_eq!(gw.fetch_by_region("Indian").await.unwrap().len(), 1);
        assert_eq!(gw.fetch_by_id("2").await.unwrap().unwrap().title, "Tiramisu");
        assert_eq!(gw.list_regions().await.unwrap(), vec!["Indian", "Italian"]);
        assert_eq!(gw.list_types().await.unwrap(), vec!["Dessert", "Main Course"]);
        assert!(gw.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_gateway_missing_file_is_upstream_error() {
        let dir = TempDir::new().unwrap();
        let gw = FileRecipeGateway::new(dir.path().join("missing.json"));

        let err = gw.fetch_by_region("Indian").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(!gw.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_gateway_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_corpus(&dir, "{not json").await;
        let gw = FileRecipeGateway::new(path);

        let err = gw.list_regions().await.unwrap_err();
        assert!(matches!(err, RecipeError::Decode(_)));
    }

    #[tokio::test]
    async fn test_file_gateway_retries_after_failed_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        let gw = FileRecipeGateway::new(&path);

        assert!(gw.fetch_by_id("1").await.is_err());

        let json = serde_json::to_string(&vec![Recipe::new(1, "Dal")]).unwrap();
        tokio::fs::write(&path, json).await.unwrap();

        assert!(gw.fetch_by_id("1").await.unwrap().is_some());
    }
}
