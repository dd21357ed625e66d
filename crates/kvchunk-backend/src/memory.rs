use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{BackendError, BackendResult};
use crate::traits::KeyValueBackend;

/// In-memory, HashMap-based key-value backend.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` and
/// cloned on read. An optional per-value ceiling emulates the size limits of
/// platform stores.
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    value_limit: Option<usize>,
}

impl InMemoryBackend {
    /// Create a new empty backend with no value ceiling.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            value_limit: None,
        }
    }

    /// Create a new empty backend that rejects values longer than `limit` bytes.
    pub fn with_value_limit(limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            value_limit: Some(limit),
        }
    }

    /// The per-value ceiling, if any.
    pub fn value_limit(&self) -> Option<usize> {
        self.value_limit
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.read_map().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read_map()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    /// Return a sorted list of all keys.
    pub fn keys(&self) -> Vec<String> {
        self.snapshot().into_keys().collect()
    }

    /// Copy the full contents into an ordered map.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.read_map()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn read_map(&self) -> BackendResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|e| BackendError::Poisoned(e.to_string()))
    }

    fn write_map(&self) -> BackendResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|e| BackendError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
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
        self.write_map()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        self.write_map()?.remove(key);
        Ok(())
    }

    async fn clear(&self) -> BackendResult<()> {
        self.write_map()?.clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("key_count", &self.len())
            .field("value_limit", &self.value_limit)
            .finish()
    }
}
