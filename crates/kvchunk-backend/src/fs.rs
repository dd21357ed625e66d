//! Filesystem-backed key-value store.
//!
//! Each key is stored as one file under a root directory. The file name is
//! the hex encoding of the key followed by [`VALUE_EXTENSION`], so arbitrary
//! key strings map to portable file names. Writes land in a temporary
//! sibling first and are renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{BackendError, BackendResult};
use crate::traits::KeyValueBackend;

/// Extension of files holding a value.
pub const VALUE_EXTENSION: &str = "val";

const TEMP_EXTENSION: &str = "tmp";

/// A [`KeyValueBackend`] that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
    value_limit: Option<usize>,
}

impl FsBackend {
    /// Open (creating if needed) a backend rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> BackendResult<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "opened filesystem backend");
        Ok(Self {
            root,
            value_limit: None,
        })
    }

    /// Reject values longer than `limit` bytes on `set`.
    pub fn with_value_limit(mut self, limit: usize) -> Self {
        self.value_limit = Some(limit);
        self
    }

    /// Root directory of this backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{VALUE_EXTENSION}", hex::encode(key.as_bytes())))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{TEMP_EXTENSION}", hex::encode(key.as_bytes())))
    }
}

#[async_trait]
impl KeyValueBackend for FsBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        match tokio::fs::read_to_string(self.value_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        if let Some(limit) = self.value_limit {
            if value.len() > limit {
                return Err(BackendError::ValueTooLarge {
                    key: key.to_string(),
                    len: value.len(),
                    limit,
                });
            }
        }
        let temp = self.temp_path(key);
        tokio::fs::write(&temp, value.as_bytes()).await?;
        if let Err(e) = tokio::fs::rename(&temp, self.value_path(key)).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!(path = %temp.display(), error = %cleanup, "failed to remove temp file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        match tokio::fs::remove_file(self.value_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> BackendResult<()> {
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        let mut removed = 0usize;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let owned = path
                .extension()
                .map(|e| e == VALUE_EXTENSION || e == TEMP_EXTENSION)
                .unwrap_or(false);
            if owned && entry.file_type().await?.is_file() {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        debug!(root = %self.root.display(), removed, "cleared filesystem backend");
        Ok(())
    }
}
