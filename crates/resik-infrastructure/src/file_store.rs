//! File-backed session store.
//!
//! Persists each key as one JSON document under a base directory. Writes go
//! through a temp file and an atomic rename, so a crash mid-write never
//! leaves a torn record behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use resik_core::error::{ResikError, Result};
use resik_core::session::SessionStore;
use tokio::fs;

use crate::paths::ResikPaths;

/// Session store backed by one file per key.
///
/// Directory structure:
/// ```text
/// base_dir/
/// ├── userSession.json
/// └── userSession.json.tmp   # transient, only during a write
/// ```
pub struct FileSessionStore {
    base_dir: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at `base_dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .context("Failed to create session store directory")?;

        Ok(Self { base_dir })
    }

    /// Creates a store at the default platform location
    /// (`~/.local/share/resik/session` on Linux).
    pub async fn default_location() -> anyhow::Result<Self> {
        let dir = ResikPaths::session_dir()
            .map_err(|e| anyhow::anyhow!("Failed to resolve session directory: {}", e))?;
        Self::new(dir).await
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ResikError::storage(format!(
                "Failed to read '{}': {}",
                key, e
            ))),
        }
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value)
            .await
            .map_err(|e| ResikError::storage(format!("Failed to write '{}': {}", key, e)))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| ResikError::storage(format!("Failed to commit '{}': {}", key, e)))?;

        tracing::debug!("Persisted '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ResikError::storage(format!(
                "Failed to remove '{}': {}",
                key, e
            ))),
        }
    }
}
