//! Recipe gateways: where recipes come from.
//!
//! The retrieval service talks to a [`RecipeGateway`] and never to a concrete
//! source. Two implementations ship with the crate:
//!
//! - [`FileRecipeGateway`]: serves a JSON corpus from disk
//! - [`MockRecipeGateway`]: in-memory, with call counters and failure injection

pub mod config;
pub mod corpus;
pub mod file_gateway;
pub mod mock_gateway;
pub mod provider;

use std::sync::Arc;

pub use config::GatewayConfig;
pub use corpus::RecipeCorpus;
pub use file_gateway::FileRecipeGateway;
pub use mock_gateway::{CallCounts, MockRecipeGateway};
pub use provider::RecipeGateway;

// =============================================================================
// Factory
// =============================================================================

/// Factory for creating recipe gateways.
pub struct GatewayFactory;

impl GatewayFactory {
    /// Creates a gateway based on configuration.
    pub fn create(config: GatewayConfig) -> Arc<dyn RecipeGateway> {
        match config.provider.as_str() {
            "file" => match config.corpus_path {
                Some(path) => Arc::new(FileRecipeGateway::new(path).with_timeout(config.timeout)),
                None => {
                    tracing::warn!("File gateway needs a corpus path, falling back to mock");
                    Self::mock()
                }
            },
            "mock" => Self::mock(),
            _ => {
                tracing::warn!(
                    "Unknown recipe gateway '{}', falling back to mock",
                    config.provider
                );
                Self::mock()
            }
        }
    }

    /// Creates an empty mock gateway.
    pub fn mock() -> Arc<dyn RecipeGateway> {
        Arc::new(MockRecipeGateway::empty())
    }
}
