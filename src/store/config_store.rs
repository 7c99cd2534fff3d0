//! File-backed store of named rule configs.
//!
//! The whole mapping lives in one JSON document (`{ "<name>": [rule, ...] }`).
//! Every operation is a load → (mutate → store) cycle against that document,
//! so a reader always sees the state left by the last completed write.
//!
//! Writes go to a sibling temp file that is then renamed over the document,
//! which keeps the document intact if the process dies mid-write. Operations
//! are serialized through an async mutex; without it two concurrent `save`
//! calls could each load the same snapshot and the later rename would drop
//! the other's entry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::observability::metrics;

/// One application-defined rule. Its structure is opaque to the store.
pub type Rule = Value;

type Document = BTreeMap<String, Vec<Rule>>;

/// Errors from config store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Request fields missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// No config with this name.
    #[error("config '{0}' not found")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for config store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable mapping from config name to an ordered list of rules.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigStore {
    /// Open the store at `path`, creating an empty document (and parent
    /// directories) if none exists yet.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        if tokio::fs::try_exists(&path).await? {
            // Fail fast on a corrupt document rather than on the first request.
            let document = read_document(&path).await?;
            tracing::info!(path = ?path, configs = document.len(), "Config store loaded");
        } else {
            write_document(&path, &Document::new()).await?;
            tracing::info!(path = ?path, "Config store created");
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All config names. Ordering is not part of the contract.
    pub async fn list(&self) -> StoreResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let document = read_document(&self.path).await?;
        Ok(document.into_keys().collect())
    }

    /// Rules stored under `name`.
    pub async fn get(&self, name: &str) -> StoreResult<Vec<Rule>> {
        let _guard = self.lock.lock().await;
        let mut document = read_document(&self.path).await?;
        document
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Store `rules` under the trimmed `name`, replacing any previous list.
    ///
    /// `rules` must be a JSON array (empty allowed). Returns the trimmed name.
    pub async fn save(&self, name: &str, rules: Value) -> StoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("name is required".to_string()));
        }
        let rules = match rules {
            Value::Array(rules) => rules,
            _ => return Err(StoreError::InvalidInput("rules must be an array".to_string())),
        };

        let _guard = self.lock.lock().await;
        let mut document = read_document(&self.path).await?;
        let replaced = document.insert(name.to_string(), rules).is_some();
        write_document(&self.path, &document).await?;

        metrics::record_config_write("save");
        tracing::info!(name = %name, replaced, "Config saved");
        Ok(name.to_string())
    }

    /// Remove the config stored under `name`.
    pub async fn delete(&self, name: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = read_document(&self.path).await?;
        if document.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        write_document(&self.path, &document).await?;

        metrics::record_config_write("delete");
        tracing::info!(name = %name, "Config deleted");
        Ok(())
    }
}

async fn read_document(path: &Path) -> StoreResult<Document> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

async fn write_document(path: &Path, document: &Document) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(document)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
