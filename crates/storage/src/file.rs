//! File-backed session store.
//!
//! Keeps all keys in one JSON object on disk so that separate CLI invocations
//! within a shell session see the same state. Every call re-reads the file.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::repository::{SessionStore, StorageError};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Use the JSON file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(StorageError::Unavailable(err.to_string())),
        };
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Entries to rewrite on the next write, and whether the file was
    /// corrupt. A corrupt file is replaced.
    async fn load_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        match self.load().await {
            Ok(entries) => Ok((entries, false)),
            Err(StorageError::Serialization(err)) => {
                tracing::debug!(path = %self.path.display(), error = %err, "replacing corrupt session file");
                Ok((BTreeMap::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StorageError::Unavailable(err.to_string()))?;
            }
        }
        let data = serde_json::to_string_pretty(entries)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        fs::write(&self.path, data)
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        tracing::trace!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.load().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut entries, _) = self.load_for_write().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let (mut entries, corrupt) = self.load_for_write().await?;
        if entries.remove(key).is_some() || corrupt {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}
