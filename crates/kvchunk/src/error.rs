use kvchunk_backend::{BackendError, BackendOp};

/// Errors from chunked store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The logical key is empty, blank, or not allowed by the key scheme.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The value could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Serialization produced an empty payload.
    #[error("cannot store empty payload for key {key:?}")]
    EmptyPayload { key: String },

    /// A backend call failed.
    #[error("backend {op} failed for key {key:?}: {source}")]
    Backend {
        op: BackendOp,
        key: String,
        #[source]
        source: BackendError,
    },

    /// No entry is stored under the key.
    #[error("no data found for key {key:?}")]
    NotFound { key: String },

    /// The count record is not a non-negative integer.
    #[error("invalid chunk count for key {key:?}: {raw:?}")]
    CorruptCount { key: String, raw: String },

    /// The count record names a chunk that is not present.
    #[error("chunk {index} of {total} missing for key {key:?}")]
    ChunkMissing {
        key: String,
        index: usize,
        total: usize,
    },

    /// The reassembled payload is not valid JSON for the requested type.
    #[error("failed to parse data for key {key:?}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn backend(op: BackendOp, key: &str, source: BackendError) -> Self {
        StoreError::Backend {
            op,
            key: key.to_string(),
            source,
        }
    }

    pub(crate) fn not_found(key: &str) -> Self {
        StoreError::NotFound {
            key: key.to_string(),
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn chunk_missing_message() {
        let err = StoreError::ChunkMissing {
            key: "user".into(),
            index: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "chunk 1 of 3 missing for key \"user\"");
    }

    #[test]
    fn backend_error_keeps_source() {
        let err = StoreError::backend(
            BackendOp::Set,
            "user0",
            BackendError::Unavailable("disk full".into()),
        );
        assert_eq!(
            err.to_string(),
            "backend set failed for key \"user0\": backend unavailable: disk full"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn not_found_predicate() {
        assert!(StoreError::not_found("k").is_not_found());
        assert!(!StoreError::Config("x".into()).is_not_found());
    }
}
