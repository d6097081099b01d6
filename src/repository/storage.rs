//! Local key/value storage medium, the on-disk counterpart of browser local storage.
//!
//! Each key is one file in the storage directory. Writes go to a `.tmp` sibling first
//! and are renamed over the target, so a reader sees either the old or the new value.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>>;
    /// Replace the value stored under `key` as a single unit.
    async fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;
    /// Returns whether a value was removed.
    async fn remove(&self, key: &str) -> RepositoryResult<bool>;
}

pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub async fn new(base_dir: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir).await.map_err(|e| {
            error!("Failed to create storage directory {}: {}", base_dir.display(), e);
            RepositoryError::storage(format!("Failed to create {}: {}", base_dir.display(), e))
        })?;
        Ok(FileStorage { base_dir })
    }

    fn path_for(&self, key: &str) -> RepositoryResult<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::validation(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.base_dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                debug!("Read {} bytes from {}", value.len(), path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self, value), fields(key = %key, bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, value).await {
            error!("Failed to write {}: {}", tmp.display(), e);
            return Err(RepositoryError::from(e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            error!("Failed to replace {}: {}", path.display(), e);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RepositoryError::from(e));
        }
        debug!("Wrote {}", path.display());
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn remove(&self, key: &str) -> RepositoryResult<bool> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                Err(RepositoryError::from(e))
            }
        }
    }
}

/// Process-local storage, used when nothing should touch the disk.
#[derive(Default)]
pub struct InMemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.data.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.data.lock().await.remove(key).is_some())
    }
}
