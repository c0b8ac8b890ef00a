use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forgotten_recipes::gateway::{GatewayConfig, GatewayFactory};
use forgotten_recipes::models::SearchFilters;
use forgotten_recipes::services::{
    CacheCleanupJob, FileStateStore, RetrievalConfig, RetrievalService,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forgotten_recipes=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting forgotten-recipes...");

    let gateway = GatewayFactory::create(GatewayConfig::from_env());
    match gateway.health_check().await {
        Ok(true) => info!("Recipe gateway '{}' is ready", gateway.provider_name()),
        Ok(false) => warn!("Recipe gateway '{}' is not healthy", gateway.provider_name()),
        Err(e) => warn!("Recipe gateway health check failed: {}", e),
    }

    let store = FileStateStore::from_env();
    info!("Persisting state under {:?}", store.dir());

    let service = Arc::new(
        RetrievalService::builder()
            .with_config(RetrievalConfig::from_env())
            .with_gateway(gateway)
            .with_store(Arc::new(store))
            .load()
            .await,
    );

    let cleanup_handle = CacheCleanupJob::from_config(service.clone()).map(|job| {
        info!("Cache cleanup job started (every {:?})", job.interval());
        job.start()
    });

    service.refresh_metadata().await;
    let corpus = service.get_all_recipes().await;

    info!("Corpus: {} recipes", corpus.len());
    info!("  - Regions: {}", service.regions().join(", "));
    info!("  - Types: {}", service.types().join(", "));
    info!("  - Tags: {}", service.tags().len());
    info!("  - Favorites: {}", service.get_favorites().len());
    info!("  - Recent views: {}", service.get_recent_views().len());

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !query.trim().is_empty() {
        let results = service.search(&SearchFilters::new(), &query).await;
        info!("Search '{}' found {} recipes", query.trim(), results.len());
        for recipe in &results {
            info!("  [{}] {} ({}, {})", recipe.id, recipe.title, recipe.region, recipe.recipe_type);
        }

        if let Some(first) = results.first() {
            if let Some(recipe) = service.get_recipe(first.id).await {
                info!("Opened '{}' ({} min total)", recipe.title, recipe.total_time());
            }
        }
    }

    let metrics = service.cache_metrics();
    info!(
        "Cache: {} entries, {} hits, {} misses ({:.0}% hit rate)",
        metrics.size,
        metrics.hits,
        metrics.misses,
        metrics.hit_rate() * 100.0
    );

    service.flush().await?;

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }

    info!("forgotten-recipes shut down gracefully");

    Ok(())
}
