//! Configuration for recipe gateways.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the recipe gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Provider name ("file" or "mock")
    pub provider: String,

    /// JSON corpus served by the file provider
    pub corpus_path: Option<PathBuf>,

    /// Upper bound on a single gateway call
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: "file".to_string(),
            corpus_path: Some(PathBuf::from("data/recipes.json")),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Creates a new configuration.
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            ..Default::default()
        }
    }

    /// Builder: set corpus path.
    pub fn with_corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_path = Some(path.into());
        self
    }

    /// Builder: set timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("RECIPES_GATEWAY") {
            config.provider = provider.trim().to_lowercase();
        }

        if let Ok(path) = std::env::var("RECIPES_CORPUS_PATH") {
            config.corpus_path = Some(PathBuf::from(path));
        }

        if let Ok(val) = std::env::var("RECIPES_GATEWAY_TIMEOUT_SECONDS") {
            if let Ok(secs) = val.parse::<u64>() {
                config.timeout = Duration::from_secs(secs.max(1));
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gateway_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.provider, "file");
        assert!(config.corpus_path.is_some());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_gateway_config_builder() {
        let config = GatewayConfig::new("mock")
            .with_corpus_path("/tmp/corpus.json")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.provider, "mock");
        assert_eq!(config.corpus_path, Some(PathBuf::from("/tmp/corpus.json")));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
