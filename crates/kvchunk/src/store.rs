//! [`ChunkedStore`]: large values over a size-limited backend.
//!
//! An entry stored under `key` occupies a family of backend keys: the bare
//! `key` holds the chunk count as a decimal string (the count record) and
//! each chunk key holds one slice of the JSON payload. The count record is
//! written last and removed last, so it is the single source of truth for
//! whether an entry exists.
//!
//! Every backend call is awaited in sequence, chunk 0 first. Store relies on
//! that order to know exactly which prefix of chunks to undo when a write
//! fails.

use std::ops::Range;

use kvchunk_backend::{BackendOp, KeyValueBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::chunk::{parse_count, split_chunks, ParsedCount};
use crate::config::ChunkConfig;
use crate::error::{StoreError, StoreResult};
use crate::keys::{chunk_key, validate_key};

/// Stores serializable values of any size by splitting them into chunks.
///
/// No locking is performed: callers must ensure a single writer per key.
/// Concurrent writers on one key surface as [`StoreError::ChunkMissing`] or
/// [`StoreError::Parse`] on a later fetch rather than as silent corruption.
#[derive(Debug)]
pub struct ChunkedStore<B> {
    backend: B,
    config: ChunkConfig,
}

impl<B: KeyValueBackend> ChunkedStore<B> {
    /// Create a store with the default configuration.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: ChunkConfig::default(),
        }
    }

    /// Create a store with `config`, validating it first.
    pub fn with_config(backend: B, config: ChunkConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Consume the store and return its backend.
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// Chunks are written in index order, then the count record. If a chunk
    /// write fails, the chunks already written are removed (best-effort) and
    /// the original backend error is returned without writing the count
    /// record. A new key then reads as absent. When overwriting, the previous
    /// count record stays and now names removed chunks, so a fetch fails with
    /// [`StoreError::ChunkMissing`].
    ///
    /// When [`ChunkConfig::prune_stale_chunks`] is set, chunks beyond the new
    /// count left by a previous, larger value are removed after the count
    /// record is written.
    pub async fn store<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> StoreResult<()> {
        validate_key(key, self.config.key_scheme)?;
        let payload = serde_json::to_string(value).map_err(StoreError::Serialization)?;
        self.store_payload(key, &payload).await
    }

    async fn store_payload(&self, key: &str, payload: &str) -> StoreResult<()> {
        let chunks = split_chunks(payload, self.config.chunk_size);
        if chunks.is_empty() {
            return Err(StoreError::EmptyPayload {
                key: key.to_string(),
            });
        }

        let prior = if self.config.prune_stale_chunks {
            self.prior_count(key).await?
        } else {
            None
        };

        for (index, chunk) in chunks.iter().enumerate() {
            let ckey = self.chunk_key(key, index);
            if let Err(source) = self.backend.set(&ckey, chunk).await {
                warn!(key, index, error = %source, "chunk write failed, discarding written chunks");
                self.discard_chunks(key, 0..index).await;
                return Err(StoreError::backend(BackendOp::Set, &ckey, source));
            }
        }

        self.backend
            .set(key, &chunks.len().to_string())
            .await
            .map_err(|source| StoreError::backend(BackendOp::Set, key, source))?;
        debug!(key, chunks = chunks.len(), bytes = payload.len(), "stored entry");

        if let Some(prior) = prior {
            if prior > chunks.len() {
                debug!(key, stale = prior - chunks.len(), "pruning stale chunks");
                self.discard_chunks(key, chunks.len()..prior).await;
            }
        }
        Ok(())
    }

    /// Fetch and deserialize the value stored under `key`.
    ///
    /// A count record of zero, or chunks that concatenate to nothing, read as
    /// [`StoreError::NotFound`]. No shape validation happens beyond `T`'s
    /// own deserialization.
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> StoreResult<T> {
        validate_key(key, self.config.key_scheme)?;
        let count = match self.read_count(key).await? {
            Some(0) | None => return Err(StoreError::not_found(key)),
            Some(count) => count,
        };

        let mut payload = String::new();
        for index in 0..count {
            let ckey = self.chunk_key(key, index);
            let part = self
                .backend
                .get(&ckey)
                .await
                .map_err(|source| StoreError::backend(BackendOp::Get, &ckey, source))?
                .ok_or_else(|| StoreError::ChunkMissing {
                    key: key.to_string(),
                    index,
                    total: count,
                })?;
            payload.push_str(&part);
        }

        if payload.is_empty() {
            return Err(StoreError::not_found(key));
        }
        debug!(key, chunks = count, bytes = payload.len(), "fetched entry");

        serde_json::from_str(&payload).map_err(|source| StoreError::Parse {
            key: key.to_string(),
            source,
        })
    }

    /// Remove the entry stored under `key`.
    ///
    /// Removing an absent entry succeeds without touching the backend beyond
    /// one read. Chunks go first, in index order, and the count record last;
    /// the first failing removal aborts and leaves the rest in place.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key, self.config.key_scheme)?;
        let Some(count) = self.read_count(key).await? else {
            return Ok(());
        };

        for index in 0..count {
            let ckey = self.chunk_key(key, index);
            self.backend
                .remove(&ckey)
                .await
                .map_err(|source| StoreError::backend(BackendOp::Remove, &ckey, source))?;
        }
        self.backend
            .remove(key)
            .await
            .map_err(|source| StoreError::backend(BackendOp::Remove, key, source))?;
        debug!(key, chunks = count, "removed entry");
        Ok(())
    }

    /// Whether a count record exists for `key`. Chunks are not checked.
    pub async fn exists(&self, key: &str) -> StoreResult<bool> {
        validate_key(key, self.config.key_scheme)?;
        Ok(self.read_count_raw(key).await?.is_some())
    }

    /// The chunk count recorded for `key`, or `None` if there is no entry.
    pub async fn chunk_count(&self, key: &str) -> StoreResult<Option<usize>> {
        validate_key(key, self.config.key_scheme)?;
        self.read_count(key).await
    }

    fn chunk_key(&self, key: &str, index: usize) -> String {
        chunk_key(key, index, self.config.key_scheme)
    }

    async fn read_count_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.backend
            .get(key)
            .await
            .map_err(|source| StoreError::backend(BackendOp::Get, key, source))
    }

    async fn read_count(&self, key: &str) -> StoreResult<Option<usize>> {
        let Some(raw) = self.read_count_raw(key).await? else {
            return Ok(None);
        };
        match parse_count(&raw) {
            ParsedCount::Count(count) => Ok(Some(count)),
            ParsedCount::Invalid => Err(StoreError::CorruptCount {
                key: key.to_string(),
                raw,
            }),
        }
    }

    /// Count record of the entry about to be overwritten. A corrupt record
    /// says nothing about which chunks exist, so it is treated as absent.
    async fn prior_count(&self, key: &str) -> StoreResult<Option<usize>> {
        match self.read_count(key).await {
            Ok(count) => Ok(count),
            Err(StoreError::CorruptCount { raw, .. }) => {
                warn!(key, raw = %raw, "ignoring corrupt count record on overwrite");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort removal of chunks in `range`; failures are logged only.
    async fn discard_chunks(&self, key: &str, range: Range<usize>) {
        for index in range {
            let ckey = self.chunk_key(key, index);
            if let Err(e) = self.backend.remove(&ckey).await {
                warn!(key, index, error = %e, "failed to discard chunk");
            }
        }
    }
}
