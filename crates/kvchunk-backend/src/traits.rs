//! The [`KeyValueBackend`] trait: the contract every storage backend meets.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BackendResult;

/// An asynchronous map from string keys to string values.
///
/// Implementations must be thread-safe (`Send + Sync`) and may impose a
/// per-value size ceiling. Each call is independently fallible; no
/// atomicity across multiple keys is assumed by callers.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> BackendResult<Option<String>>;

    /// Create or overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> BackendResult<()>;

    /// Delete `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> BackendResult<()>;

    /// Delete every key held by the backend.
    async fn clear(&self) -> BackendResult<()>;
}

#[async_trait]
impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Arc<B> {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        (**self).remove(key).await
    }

    async fn clear(&self) -> BackendResult<()> {
        (**self).clear().await
    }
}

#[async_trait]
impl<B: KeyValueBackend + ?Sized> KeyValueBackend for &B {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        (**self).remove(key).await
    }

    async fn clear(&self) -> BackendResult<()> {
        (**self).clear().await
    }
}
