//! Retrieval service: cache-aside access to recipes, plus recent views and
//! favorites.
//!
//! Every read goes through the expiring cache first and falls back to the
//! gateway on a miss. Gateway failures never reach callers; they are logged
//! and turned into empty results. Once persisted state has been restored,
//! recent views and favorites are saved to the state store after every
//! mutation.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::config::{RetrievalConfig, FALLBACK_REGIONS, FALLBACK_TYPES};
use super::storage::{MemoryStateStore, PersistedState, StateStore};
use crate::cache::{CacheKey, CacheMetrics, RecipeCache};
use crate::collections::{BoundedDedupQueue, IdentitySet};
use crate::error::{RecipeError, Result};
use crate::gateway::{GatewayFactory, RecipeGateway};
use crate::index::{IndexField, InvertedIndex, Postings};
use crate::models::{Recipe, SearchFilters};

fn recipe_key(recipe: &Recipe) -> String {
    recipe.identity_key()
}

fn shared_recipe_key(recipe: &Arc<Recipe>) -> String {
    recipe.identity_key()
}

fn share(recipes: Vec<Recipe>) -> Vec<Arc<Recipe>> {
    recipes.into_iter().map(Arc::new).collect()
}

/// Retrieval and caching layer in front of a recipe gateway
pub struct RetrievalService {
    config: RetrievalConfig,
    gateway: Arc<dyn RecipeGateway>,
    store: Arc<dyn StateStore>,
    cache: RecipeCache,
    index: RwLock<InvertedIndex>,
    recent_views: Mutex<BoundedDedupQueue<Arc<Recipe>>>,
    favorites: Mutex<IdentitySet<Recipe>>,
    regions: RwLock<Vec<String>>,
    types: RwLock<Vec<String>>,
    restored: AtomicBool,
}

impl RetrievalService {
    /// Creates a service with empty recent views and favorites.
    ///
    /// Persisted state is not loaded, and mutations are not saved until
    /// [`restore`](Self::restore) has run. Use the builder's `load` to get a
    /// service that does both.
    pub fn new(
        config: RetrievalConfig,
        gateway: Arc<dyn RecipeGateway>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        info!(
            "Initializing RetrievalService with gateway '{}', seed regions {:?}",
            gateway.provider_name(),
            config.seed_regions
        );

        Self {
            cache: RecipeCache::new(config.cache.clone()),
            index: RwLock::new(InvertedIndex::new()),
            recent_views: Mutex::new(BoundedDedupQueue::new(
                config.recent_views_size,
                shared_recipe_key,
            )),
            favorites: Mutex::new(IdentitySet::new(recipe_key)),
            regions: RwLock::new(Vec::new()),
            types: RwLock::new(Vec::new()),
            restored: AtomicBool::new(false),
            config,
            gateway,
            store,
        }
    }

    pub fn builder() -> RetrievalServiceBuilder {
        RetrievalServiceBuilder::new()
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<dyn RecipeGateway> {
        &self.gateway
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    /// Returns the full corpus, fetching every seed region on a miss.
    ///
    /// Regions are fetched concurrently. A failed region is skipped; if all of
    /// them fail the result is empty and nothing is cached.
    pub async fn get_all_recipes(&self) -> Vec<Arc<Recipe>> {
        self.load_corpus().await.unwrap_or_default()
    }

    /// Cached corpus, or a fresh load. `None` when every seed region failed.
    async fn load_corpus(&self) -> Option<Vec<Arc<Recipe>>> {
        if let Some(recipes) = self.cache.get_recipes(&CacheKey::AllRecipes) {
            return Some(recipes.as_ref().clone());
        }

        let fetches = self.config.seed_regions.iter().map(|region| async move {
            (region, self.gateway.fetch_by_region(region).await)
        });

        let mut recipes = Vec::new();
        let mut loaded = 0usize;
        for (region, result) in join_all(fetches).await {
            match result {
                Ok(batch) => {
                    debug!("Fetched {} recipes for region {}", batch.len(), region);
                    loaded += 1;
                    recipes.extend(share(batch));
                }
                Err(e) => warn!("Failed to fetch recipes for region {}: {}", region, e),
            }
        }

        if loaded == 0 {
            warn!("No seed region could be fetched, corpus left uncached");
            return None;
        }

        let index = InvertedIndex::from_recipes(&recipes);
        debug!(
            "Rebuilt index: {} recipes, {} ingredient tokens",
            index.recipe_count(),
            index.token_count()
        );
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = index;

        self.cache.put_recipes(
            CacheKey::AllRecipes,
            Arc::new(recipes.clone()),
            self.config.corpus_ttl,
        );

        info!(
            "Loaded corpus of {} recipes from {}/{} regions",
            recipes.len(),
            loaded,
            self.config.seed_regions.len()
        );
        Some(recipes)
    }

    /// Returns one recipe, fetching it on a miss.
    ///
    /// A recipe resolved from the gateway is cached and becomes the newest
    /// recent view. Cache hits leave recent views untouched.
    pub async fn get_recipe(&self, id: u64) -> Option<Arc<Recipe>> {
        if let Some(recipe) = self.cache.get_recipe(id) {
            return Some(recipe);
        }

        let recipe = match self.fetch_recipe(id).await {
            Ok(recipe) => Arc::new(recipe),
            Err(RecipeError::NotFound(what)) => {
                debug!("Recipe {} not found", what);
                return None;
            }
            Err(e) => {
                warn!("Failed to fetch recipe {}: {}", id, e);
                return None;
            }
        };

        self.cache.put_recipe(recipe.clone());
        self.recent().push_front(recipe.clone());
        self.persist().await;

        Some(recipe)
    }

    async fn fetch_recipe(&self, id: u64) -> Result<Recipe> {
        let id = id.to_string();
        let found = self.gateway.fetch_by_id(&id).await?;
        found.ok_or(RecipeError::NotFound(id))
    }

    /// Searches by free-text query and filters.
    ///
    /// On a miss the first applicable source wins: a non-blank query goes to
    /// the gateway's text search (narrowed by region and type), then an
    /// ingredient filter, then a region filter. With none of those set the
    /// cached corpus is filtered locally, keeping corpus order. Failed
    /// lookups, including a corpus that could not be loaded, are not cached.
    pub async fn search(&self, filters: &SearchFilters, query: &str) -> Vec<Arc<Recipe>> {
        let key = CacheKey::search(filters, query);
        if let Some(results) = self.cache.get_recipes(&key) {
            return results.as_ref().clone();
        }

        let query = query.trim();
        let fetched = if !query.is_empty() {
            self.gateway
                .fetch_by_query(query, filters.region_value(), filters.type_value())
                .await
                .map(share)
        } else if let Some(ingredient) = filters.ingredient_value() {
            self.gateway.fetch_by_ingredient(ingredient).await.map(share)
        } else if let Some(region) = filters.region_value() {
            self.gateway.fetch_by_region(region).await.map(share)
        } else {
            self.filter_local(filters)
                .await
                .ok_or_else(|| RecipeError::Upstream("corpus unavailable".to_string()))
        };

        match fetched {
            Ok(results) => {
                debug!("Search {} returned {} recipes", key, results.len());
                self.cache
                    .put_recipes(key, Arc::new(results.clone()), self.config.search_ttl);
                results
            }
            Err(e) => {
                warn!("Search {} failed: {}", key, e);
                Vec::new()
            }
        }
    }

    async fn filter_local(&self, filters: &SearchFilters) -> Option<Vec<Arc<Recipe>>> {
        let corpus = self.load_corpus().await?;

        let candidates = {
            let index = self.read_index();
            // A concurrent reload can leave the index describing another corpus
            if index.recipe_count() == corpus.len() {
                index.candidates(filters)
            } else {
                None
            }
        };

        let matched = corpus
            .into_iter()
            .filter(|r| candidates.as_ref().map_or(true, |ids| ids.contains(&r.id)))
            .filter(|r| filters.matches(r))
            .collect();
        Some(matched)
    }

    /// Recipe ids indexed under `value` for `field`, from the last corpus load
    pub fn lookup(&self, field: IndexField, value: &str) -> Postings {
        self.read_index().lookup(field, value)
    }

    // =========================================================================
    // Recent views
    // =========================================================================

    /// Recently viewed recipes, newest first
    pub fn get_recent_views(&self) -> Vec<Arc<Recipe>> {
        self.recent().to_ordered_sequence()
    }

    pub async fn clear_recent_views(&self) {
        self.recent().clear();
        self.persist().await;
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Flips favorite membership and returns the new state
    pub async fn toggle_favorite(&self, recipe: &Recipe) -> bool {
        let now_favorite = self.favs().toggle(recipe);
        debug!("Recipe {} favorite: {}", recipe.id, now_favorite);
        self.persist().await;
        now_favorite
    }

    pub fn is_favorite(&self, recipe: &Recipe) -> bool {
        self.favs().contains(recipe)
    }

    /// Favorites found in the cached corpus, in corpus order.
    ///
    /// Favorites outside the corpus, or any favorites while the corpus is not
    /// cached, are not returned.
    pub fn get_favorites(&self) -> Vec<Arc<Recipe>> {
        let Some(corpus) = self.cache.peek_corpus() else {
            return Vec::new();
        };
        let favorites = self.favs();
        corpus
            .iter()
            .filter(|r| favorites.contains_key(&r.identity_key()))
            .cloned()
            .collect()
    }

    /// Number of favorite ids, whether or not they resolve
    pub fn favorite_count(&self) -> usize {
        self.favs().len()
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Sorted unique tags of the cached corpus
    pub fn tags(&self) -> Vec<String> {
        self.cache
            .peek_corpus()
            .map(|corpus| {
                corpus
                    .iter()
                    .flat_map(|r| r.tags.iter().cloned())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn regions(&self) -> Vec<String> {
        Self::or_fallback(&self.regions, FALLBACK_REGIONS)
    }

    pub fn types(&self) -> Vec<String> {
        Self::or_fallback(&self.types, FALLBACK_TYPES)
    }

    /// Reloads region and type lists from the gateway.
    ///
    /// A failed or empty listing keeps whatever was known before.
    pub async fn refresh_metadata(&self) {
        let (regions, types) = tokio::join!(self.gateway.list_regions(), self.gateway.list_types());

        match regions {
            Ok(list) if !list.is_empty() => {
                debug!("Loaded {} regions", list.len());
                *self.regions.write().unwrap_or_else(PoisonError::into_inner) = list;
            }
            Ok(_) => debug!("Gateway listed no regions"),
            Err(e) => warn!("Failed to list regions: {}", e),
        }

        match types {
            Ok(list) if !list.is_empty() => {
                debug!("Loaded {} recipe types", list.len());
                *self.types.write().unwrap_or_else(PoisonError::into_inner) = list;
            }
            Ok(_) => debug!("Gateway listed no recipe types"),
            Err(e) => warn!("Failed to list recipe types: {}", e),
        }
    }

    fn or_fallback(list: &RwLock<Vec<String>>, fallback: &[&str]) -> Vec<String> {
        let list = list.read().unwrap_or_else(PoisonError::into_inner);
        if list.is_empty() {
            fallback.iter().map(|s| s.to_string()).collect()
        } else {
            list.clone()
        }
    }

    // =========================================================================
    // Cache maintenance
    // =========================================================================

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }

    /// Drops expired cache entries, returning how many were removed
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Loads recent views and favorites from the state store.
    ///
    /// Missing state leaves the service empty. Malformed state is logged and
    /// discarded, and the next mutation replaces it. If the store cannot be
    /// read at all, saving stays disabled so the stored record is not
    /// overwritten.
    pub async fn restore(&self) {
        let key = &self.config.state_key;
        let raw = match self.store.load(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted state under '{}'", key);
                self.restored.store(true, Ordering::SeqCst);
                return;
            }
            Err(e) => {
                warn!("Failed to load persisted state '{}': {}", key, e);
                return;
            }
        };

        let state = match PersistedState::from_json(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Discarding persisted state '{}': {}", key, e);
                self.restored.store(true, Ordering::SeqCst);
                return;
            }
        };

        let recent_count = state.recent_views.len();
        let favorite_count = state.favorites.len();
        {
            let mut recent = self.recent();
            recent.clear();
            // Stored newest first; pushing oldest first keeps that order
            for recipe in state.recent_views.into_iter().rev() {
                recent.push_front(Arc::new(recipe));
            }
        }
        {
            let mut favorites = self.favs();
            favorites.clear();
            for id in state.favorites {
                favorites.insert_key(id);
            }
        }

        self.restored.store(true, Ordering::SeqCst);
        info!(
            "Restored {} recent views and {} favorites",
            recent_count, favorite_count
        );
    }

    /// Whether persisted state has been loaded, which enables saving
    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }

    /// Writes recent views and favorites to the state store.
    ///
    /// Fails without writing if persisted state was never restored.
    pub async fn flush(&self) -> Result<()> {
        if !self.is_restored() {
            return Err(RecipeError::Storage(format!(
                "state '{}' was not restored, refusing to overwrite it",
                self.config.state_key
            )));
        }
        let raw = self.snapshot().to_json()?;
        self.store.save(&self.config.state_key, &raw).await
    }

    /// Current recent views and favorites, as persisted
    pub fn snapshot(&self) -> PersistedState {
        let recent_views = self
            .recent()
            .iter()
            .map(|r| r.as_ref().clone())
            .collect();
        let favorites = self.favs().to_keys();
        PersistedState {
            recent_views,
            favorites,
        }
    }

    async fn persist(&self) {
        if !self.is_restored() {
            warn!(
                "Skipping save of state '{}': persisted state not restored",
                self.config.state_key
            );
            return;
        }
        if let Err(e) = self.flush().await {
            warn!("Failed to persist state '{}': {}", self.config.state_key, e);
        }
    }

    fn read_index(&self) -> std::sync::RwLockReadGuard<'_, InvertedIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn recent(&self) -> MutexGuard<'_, BoundedDedupQueue<Arc<Recipe>>> {
        self.recent_views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn favs(&self) -> MutexGuard<'_, IdentitySet<Recipe>> {
        self.favorites.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for the retrieval service.
pub struct RetrievalServiceBuilder {
    config: RetrievalConfig,
    gateway: Option<Arc<dyn RecipeGateway>>,
    store: Option<Arc<dyn StateStore>>,
}

impl RetrievalServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: RetrievalConfig::default(),
            gateway: None,
            store: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the recipe gateway.
    pub fn with_gateway(mut self, gateway: Arc<dyn RecipeGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Sets the state store.
    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the service without loading persisted state.
    ///
    /// Mutations on the result are not saved until `restore` is called.
    pub fn build(self) -> RetrievalService {
        let gateway = self.gateway.unwrap_or_else(GatewayFactory::mock);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStateStore::new()));

        RetrievalService::new(self.config, gateway, store)
    }

    /// Builds the service and restores persisted state.
    pub async fn load(self) -> RetrievalService {
        let service = self.build();
        service.restore().await;
        service
    }
}

impl Default for RetrievalServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
