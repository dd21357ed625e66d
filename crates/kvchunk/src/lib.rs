//! Chunked storage of large values over a size-limited key-value backend.
//!
//! Platform key-value stores cap the size of a single value. [`ChunkedStore`]
//! lets callers store arbitrarily large serializable values under one
//! logical key by splitting the JSON payload into fixed-size chunks.
//!
//! # Key layout
//!
//! For a logical key `user` holding three chunks:
//!
//! | Backend key | Value |
//! |-------------|-------|
//! | `user`      | `"3"` (the count record) |
//! | `user0`     | first chunk |
//! | `user1`     | second chunk |
//! | `user2`     | last chunk (remainder) |
//!
//! [`KeyScheme::Delimited`] inserts a separator before the index.
//!
//! # Design Rules
//!
//! 1. The count record is written last and removed last; it alone decides
//!    whether an entry exists.
//! 2. Backend calls are awaited one at a time in index order.
//! 3. A failed chunk write undoes the chunks written before it. Errors during
//!    that cleanup are logged and swallowed; every other error reaches the
//!    caller.
//! 4. Nothing is retried.

pub mod chunk;
pub mod config;
pub mod error;
pub mod keys;
pub mod store;

pub use config::{ChunkConfig, KeyScheme, DEFAULT_CHUNK_SIZE};
pub use error::{StoreError, StoreResult};
pub use kvchunk_backend::{
    BackendError, BackendOp, FsBackend, InMemoryBackend, InstrumentedBackend, KeyValueBackend,
};
pub use store::ChunkedStore;
