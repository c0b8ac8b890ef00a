use std::sync::Arc;

use forgotten_recipes::gateway::{GatewayConfig, GatewayFactory, RecipeGateway};
use forgotten_recipes::models::SearchFilters;
use forgotten_recipes::services::RetrievalService;

const SAMPLE_CORPUS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/recipes.json");

fn gateway() -> Arc<dyn RecipeGateway> {
    GatewayFactory::create(GatewayConfig::new("file").with_corpus_path(SAMPLE_CORPUS))
}

#[tokio::test]
async fn test_sample_corpus_loads() {
    let gateway = gateway();
    assert_eq!(gateway.provider_name(), "file");
    assert!(gateway.health_check().await.unwrap());

    let regions = gateway.list_regions().await.unwrap();
    assert_eq!(regions, vec!["Chinese", "Indian", "Italian", "Thai"]);
}

#[tokio::test]
async fn test_service_over_sample_corpus() {
    let service = RetrievalService::builder().with_gateway(gateway()).build();

    // Default seed regions leave Thai out of the corpus
    let corpus = service.get_all_recipes().await;
    assert_eq!(corpus.len(), 7);
    assert!(corpus.iter().all(|r| r.region != "Thai"));

    let curries = service.search(&SearchFilters::new().tag("curry"), "").await;
    assert_eq!(curries.len(), 2);

    let noodles = service.search(&SearchFilters::new(), "noodles").await;
    assert_eq!(noodles.len(), 1);
    assert_eq!(noodles[0].title, "Pad Thai");

    let peanuts = service.search(&SearchFilters::new().ingredient("peanuts"), "").await;
    assert_eq!(peanuts.len(), 2);

    service.refresh_metadata().await;
    assert_eq!(service.types(), vec!["Appetizer", "Dessert", "Main Course"]);
    assert!(service.tags().contains(&"stir-fry".to_string()));
}
