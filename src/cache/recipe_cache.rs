//! Typed view over the expiring cache for recipe lookups.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::config::{CacheConfig, CacheMetrics};
use super::lru_cache::ExpiringCache;
use crate::models::{Recipe, SearchFilters};

/// Cache keys used by the retrieval service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full seeded corpus
    AllRecipes,
    /// A single recipe by id
    Recipe(u64),
    /// A search result, keyed by the normalized filter/query string
    Search(String),
}

impl CacheKey {
    pub fn search(filters: &SearchFilters, query: &str) -> Self {
        CacheKey::Search(filters.cache_key(query))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::AllRecipes => write!(f, "all"),
            CacheKey::Recipe(id) => write!(f, "recipe:{}", id),
            CacheKey::Search(key) => write!(f, "search:{}", key),
        }
    }
}

/// Values stored in the recipe cache. Recipes are shared, never copied.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Recipes(Arc<Vec<Arc<Recipe>>>),
    Recipe(Arc<Recipe>),
}

/// Cache for corpus, per-recipe and search results
pub struct RecipeCache {
    cache: ExpiringCache<CacheKey, CacheValue>,
}

impl RecipeCache {
    pub fn new(config: CacheConfig) -> Self {
        info!(
            "Initializing RecipeCache with capacity: {}, default TTL: {:?}",
            config.capacity, config.default_ttl
        );
        Self {
            cache: ExpiringCache::new(config),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(CacheConfig::with_capacity(capacity))
    }

    /// Gets a recipe list (corpus or search result)
    pub fn get_recipes(&self, key: &CacheKey) -> Option<Arc<Vec<Arc<Recipe>>>> {
        match self.cache.get(key) {
            Some(CacheValue::Recipes(recipes)) => {
                debug!("Cache hit: {} ({} recipes)", key, recipes.len());
                Some(recipes)
            }
            Some(CacheValue::Recipe(_)) => {
                debug!("Cache key {} holds a single recipe, treating as miss", key);
                None
            }
            None => {
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    /// Gets a single recipe by id
    pub fn get_recipe(&self, id: u64) -> Option<Arc<Recipe>> {
        let key = CacheKey::Recipe(id);
        match self.cache.get(&key) {
            Some(CacheValue::Recipe(recipe)) => {
                debug!("Cache hit: {}", key);
                Some(recipe)
            }
            _ => {
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    /// Reads the cached corpus without a recency bump or metric change
    pub fn peek_corpus(&self) -> Option<Arc<Vec<Arc<Recipe>>>> {
        match self.cache.peek(&CacheKey::AllRecipes) {
            Some(CacheValue::Recipes(recipes)) => Some(recipes),
            _ => None,
        }
    }

    pub fn put_recipes(&self, key: CacheKey, recipes: Arc<Vec<Arc<Recipe>>>, ttl: Duration) {
        debug!("Caching {} ({} recipes, ttl {:?})", key, recipes.len(), ttl);
        self.cache.set_with_ttl(key, CacheValue::Recipes(recipes), ttl);
    }

    /// Caches a recipe under its id with the default TTL
    pub fn put_recipe(&self, recipe: Arc<Recipe>) {
        let key = CacheKey::Recipe(recipe.id);
        debug!("Caching {}", key);
        self.cache.set(key, CacheValue::Recipe(recipe));
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&self) {
        info!("Clearing recipe cache");
        self.cache.clear();
    }

    /// Removes expired entries
    pub fn cleanup(&self) -> usize {
        let count = self.cache.cleanup();
        if count > 0 {
            debug!("Cleaned up {} expired recipe cache entries", count);
        }
        count
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(ids: &[u64]) -> Arc<Vec<Arc<Recipe>>> {
        Arc::new(
            ids.iter()
                .map(|id| Arc::new(Recipe::new(*id, format!("Recipe {}", id))))
                .collect(),
        )
    }

    #[test]
    fn test_key_display() {
        assert_eq!(CacheKey::AllRecipes.to_string(), "all");
        assert_eq!(CacheKey::Recipe(52772).to_string(), "recipe:52772");
        let key = CacheKey::search(&SearchFilters::new().region("Thai"), "");
        assert!(key.to_string().starts_with("search:"));
    }

    #[test]
    fn test_recipe_round_trip_shares_value() {
        let cache = RecipeCache::with_capacity(10);
        let recipe = Arc::new(Recipe::new(1, "Dal"));
        cache.put_recipe(Arc::clone(&recipe));

        let cached = cache.get_recipe(1).unwrap();
        assert!(Arc::ptr_eq(&cached, &recipe));
        assert!(cache.get_recipe(2).is_none());
    }

    #[test]
    fn test_recipes_under_key() {
        let cache = RecipeCache::with_capacity(10);
        cache.put_recipes(CacheKey::AllRecipes, corpus(&[1, 2, 3]), Duration::from_secs(60));

        assert_eq!(cache.get_recipes(&CacheKey::AllRecipes).unwrap().len(), 3);
        assert!(cache.get_recipes(&CacheKey::Search("x".into())).is_none());
    }

    #[test]
    fn test_mismatched_value_kind_is_a_miss() {
        let cache = RecipeCache::with_capacity(10);
        cache.put_recipe(Arc::new(Recipe::new(1, "Dal")));
        assert!(cache.get_recipes(&CacheKey::Recipe(1)).is_none());
    }

    #[test]
    fn test_peek_corpus_leaves_metrics_alone() {
        let cache = RecipeCache::with_capacity(10);
        assert!(cache.peek_corpus().is_none());

        cache.put_recipes(CacheKey::AllRecipes, corpus(&[1]), Duration::from_secs(60));
        assert!(cache.peek_corpus().is_some());
        assert_eq!(cache.metrics().total_requests(), 0);
    }

    #[test]
    fn test_cleanup_and_clear() {
        let cache = RecipeCache::with_capacity(10);
        cache.put_recipes(CacheKey::AllRecipes, corpus(&[1]), Duration::from_millis(10));
        cache.put_recipe(Arc::new(Recipe::new(2, "Soup")));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.cleanup(), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
