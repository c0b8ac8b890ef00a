use std::sync::Arc;

use tempfile::TempDir;

use forgotten_recipes::gateway::MockRecipeGateway;
use forgotten_recipes::models::Recipe;
use forgotten_recipes::services::{
    FileStateStore, PersistedState, RetrievalConfig, RetrievalService, StateStore,
};

fn recipes() -> Vec<Recipe> {
    (1..=4)
        .map(|id| Recipe::new(id, format!("Recipe {}", id)).with_region("Thai"))
        .collect()
}

async fn open(dir: &TempDir) -> RetrievalService {
    RetrievalService::builder()
        .with_config(RetrievalConfig::new().with_seed_regions(["Thai"]))
        .with_gateway(Arc::new(MockRecipeGateway::new(recipes())))
        .with_store(Arc::new(FileStateStore::new(dir.path())))
        .load()
        .await
}

fn ids(recipes: &[Arc<Recipe>]) -> Vec<u64> {
    recipes.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_restore_preserves_recent_order_and_favorites() {
    let dir = TempDir::new().unwrap();

    {
        let service = open(&dir).await;
        service.get_recipe(2).await;
        service.get_recipe(4).await;
        service.get_recipe(1).await;
        service.toggle_favorite(&Recipe::new(3, "Recipe 3")).await;
        service.toggle_favorite(&Recipe::new(4, "Recipe 4")).await;
    }

    let service = open(&dir).await;
    assert_eq!(ids(&service.get_recent_views()), vec![1, 4, 2]);
    assert!(service.is_favorite(&Recipe::new(3, "Recipe 3")));
    assert!(service.is_favorite(&Recipe::new(4, "Recipe 4")));
    assert_eq!(service.favorite_count(), 2);

    service.get_all_recipes().await;
    assert_eq!(ids(&service.get_favorites()), vec![3, 4]);
}

#[tokio::test]
async fn test_state_file_format() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir).await;
    service.get_recipe(1).await;
    service.toggle_favorite(&Recipe::new(2, "Recipe 2")).await;

    let raw = FileStateStore::new(dir.path())
        .load("forgotten-recipes")
        .await
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["recentViews"][0]["id"], 1);
    assert_eq!(json["recentViews"][0]["title"], "Recipe 1");
    assert_eq!(json["favorites"], serde_json::json!(["2"]));
}

#[tokio::test]
async fn test_malformed_state_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path());
    store.save("forgotten-recipes", "{\"recentViews\": 7").await.unwrap();

    let service = open(&dir).await;
    assert!(service.get_recent_views().is_empty());
    assert_eq!(service.favorite_count(), 0);

    // The next mutation overwrites the bad record
    service.toggle_favorite(&Recipe::new(1, "Recipe 1")).await;
    let raw = store.load("forgotten-recipes").await.unwrap().unwrap();
    assert!(PersistedState::from_json(&raw).is_ok());
}

#[tokio::test]
async fn test_clear_recent_views_is_persisted() {
    let dir = TempDir::new().unwrap();
    {
        let service = open(&dir).await;
        service.get_recipe(1).await;
        service.clear_recent_views().await;
    }

    let service = open(&dir).await;
    assert!(service.get_recent_views().is_empty());
}

#[tokio::test]
async fn test_restore_truncates_to_configured_size() {
    let dir = TempDir::new().unwrap();
    let state = PersistedState {
        recent_views: recipes(),
        favorites: Vec::new(),
    };
    FileStateStore::new(dir.path())
        .save("forgotten-recipes", &state.to_json().unwrap())
        .await
        .unwrap();

    let service = RetrievalService::builder()
        .with_config(RetrievalConfig::new().with_recent_views_size(2))
        .with_store(Arc::new(FileStateStore::new(dir.path())))
        .load()
        .await;

    // Newest entries survive
    assert_eq!(ids(&service.get_recent_views()), vec![1, 2]);
}

#[tokio::test]
async fn test_custom_state_key() {
    let dir = TempDir::new().unwrap();
    let service = RetrievalService::builder()
        .with_config(RetrievalConfig::new().with_state_key("alice"))
        .with_store(Arc::new(FileStateStore::new(dir.path())))
        .load()
        .await;

    service.flush().await.unwrap();
    assert!(dir.path().join("alice.json").exists());
    assert!(!dir.path().join("forgotten-recipes.json").exists());
}

#[tokio::test]
async fn test_unrestored_service_leaves_saved_favorites_alone() {
    let dir = TempDir::new().unwrap();
    {
        let service = open(&dir).await;
        service.toggle_favorite(&Recipe::new(1, "Recipe 1")).await;
        service.toggle_favorite(&Recipe::new(2, "Recipe 2")).await;
    }

    let service = RetrievalService::builder()
        .with_config(RetrievalConfig::new().with_seed_regions(["Thai"]))
        .with_gateway(Arc::new(MockRecipeGateway::new(recipes())))
        .with_store(Arc::new(FileStateStore::new(dir.path())))
        .build();
    service.toggle_favorite(&Recipe::new(3, "Recipe 3")).await;
    service.get_recipe(4).await;

    let service = open(&dir).await;
    assert_eq!(service.favorite_count(), 2);
    assert!(service.is_favorite(&Recipe::new(1, "Recipe 1")));
    assert!(service.is_favorite(&Recipe::new(2, "Recipe 2")));
    assert!(!service.is_favorite(&Recipe::new(3, "Recipe 3")));
    assert!(service.get_recent_views().is_empty());
}
