//! Asynchronous string key-value backends.
//!
//! A backend is a fallible async map from string keys to string values,
//! usually with a per-value size ceiling. The chunking layer in the
//! `kvchunk` crate is written against the [`KeyValueBackend`] trait and never
//! assumes atomicity across keys.
//!
//! # Backends
//!
//! - [`InMemoryBackend`] -- `HashMap`-based store for tests and embedding
//! - [`FsBackend`] -- one file per key under a directory
//! - [`InstrumentedBackend`] -- wraps another backend, recording calls and
//!   injecting faults

pub mod error;
pub mod fs;
pub mod instrumented;
pub mod memory;
pub mod traits;

pub use error::{BackendError, BackendOp, BackendResult};
pub use fs::FsBackend;
pub use instrumented::{BackendCall, InstrumentedBackend};
pub use memory::InMemoryBackend;
pub use traits::KeyValueBackend;
