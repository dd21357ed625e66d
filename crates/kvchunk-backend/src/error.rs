use std::fmt;

/// The backend operation that produced an error or a recorded call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendOp {
    Get,
    Set,
    Remove,
    Clear,
}

impl BackendOp {
    /// Lower-case name used in log fields and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendOp::Get => "get",
            BackendOp::Set => "set",
            BackendOp::Remove => "remove",
            BackendOp::Clear => "clear",
        }
    }
}

impl fmt::Display for BackendOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from key-value backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// I/O error from a persistent backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value exceeds the backend's per-value ceiling.
    #[error("value for key {key:?} is {len} bytes, backend limit is {limit}")]
    ValueTooLarge {
        key: String,
        len: usize,
        limit: usize,
    },

    /// The backend is temporarily or permanently unreachable.
    ///
    /// None of the bundled backends produce this; it is the variant for
    /// backends wrapping a remote or platform store.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A fault injected by [`InstrumentedBackend`](crate::InstrumentedBackend).
    #[error("injected fault on {op} of key {key:?}")]
    Injected { op: BackendOp, key: String },

    /// An internal lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
