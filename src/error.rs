//! Error types shared by gateways, state stores and the retrieval service.

use thiserror::Error;

/// Errors produced below the retrieval service boundary.
///
/// The service itself never returns these to callers; they are logged and
/// converted to empty results.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Malformed persisted state: {0}")]
    MalformedState(String),
}

impl RecipeError {
    /// Whether the error came from the remote source (transport or timeout).
    pub fn is_upstream(&self) -> bool {
        matches!(self, RecipeError::Upstream(_) | RecipeError::Timeout)
    }
}

impl From<std::io::Error> for RecipeError {
    fn from(err: std::io::Error) -> Self {
        RecipeError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RecipeError {
    fn from(err: serde_json::Error) -> Self {
        RecipeError::Decode(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for RecipeError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        RecipeError::Timeout
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
