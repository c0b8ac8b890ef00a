//! Key/value storage for persisted client state.
//!
//! The retrieval service saves recent views and favorites as one JSON record.
//! [`FileStateStore`] keeps each record in `<dir>/<key>.json`, written through
//! a temporary file and a rename so a crash never leaves half a record behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{RecipeError, Result};
use crate::models::Recipe;

/// Default directory for persisted state
pub const DEFAULT_STATE_DIR: &str = ".forgotten-recipes";

/// Backing store for persisted state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the record stored under `key`, `None` if there is none
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the record stored under `key`
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// The persisted record: recent views (newest first) and favorite ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(rename = "recentViews", default)]
    pub recent_views: Vec<Recipe>,

    #[serde(default)]
    pub favorites: Vec<String>,
}

impl PersistedState {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| RecipeError::MalformedState(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// File store
// =============================================================================

/// State store writing one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `RECIPES_STATE_DIR`, or [`DEFAULT_STATE_DIR`] when unset
    pub fn from_env() -> Self {
        let dir = std::env::var("RECIPES_STATE_DIR")
            .unwrap_or_else(|_| DEFAULT_STATE_DIR.to_string());
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(raw) => {
                debug!("Loaded state '{}' from {:?}", key, path);
                Ok(Some(raw))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Saved state '{}' to {:?} ({} bytes)", key, path, value.len());
        Ok(())
    }
}

// =============================================================================
// Memory store
// =============================================================================

/// In-memory state store, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding one record
    pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut records) = store.records.lock() {
            records.insert(key.into(), value.into());
        }
        store
    }

    /// Synchronous read, used by tests to inspect what was saved
    pub fn get(&self, key: &str) -> Option<String> {
        self.records.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let records = self
            .records
            .lock()
            .map_err(|_| RecipeError::Storage("state store lock poisoned".to_string()))?;
        Ok(records.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RecipeError::Storage("state store lock poisoned".to_string()))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
