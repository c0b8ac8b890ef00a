//! Recipe gateway trait: the boundary to the remote recipe source.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Recipe;

/// Trait for recipe sources
///
/// Implementations fetch and normalize recipes from wherever they live. Every
/// method may fail; failures are returned as `RecipeError` values and the
/// retrieval service decides what to do with them.
#[async_trait]
pub trait RecipeGateway: Send + Sync {
    /// Recipes from one cuisine/region
    async fn fetch_by_region(&self, region: &str) -> Result<Vec<Recipe>>;

    /// Recipes using an ingredient
    async fn fetch_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>>;

    /// Free-text search, optionally narrowed by region and type
    async fn fetch_by_query(
        &self,
        query: &str,
        region: Option<&str>,
        recipe_type: Option<&str>,
    ) -> Result<Vec<Recipe>>;

    /// A single recipe, `None` if the source has no such id
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Recipe>>;

    /// Regions the source knows about
    async fn list_regions(&self) -> Result<Vec<String>>;

    /// Recipe types (categories) the source knows about
    async fn list_types(&self) -> Result<Vec<String>>;

    /// Checks if the source is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Returns the provider name for logging
    fn provider_name(&self) -> &str;
}
