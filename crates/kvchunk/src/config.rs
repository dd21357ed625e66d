use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default chunk threshold, in characters.
///
/// Platform stores cap single values somewhere between 1MB and 6MB; one
/// million characters leaves room for backend overhead and multi-byte
/// encoding.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// How chunk keys are derived from a logical key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyScheme {
    /// `{key}{index}`. Readable by every existing deployment, but `"a"` and
    /// `"a1"` share key space.
    #[default]
    Concatenated,
    /// `{key}{separator}{index}`. Logical keys may not contain the separator.
    Delimited { separator: char },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    pub key_scheme: KeyScheme,
    /// Remove chunks left over from a larger previous value after an overwrite.
    pub prune_stale_chunks: bool,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            key_scheme: KeyScheme::Concatenated,
            prune_stale_chunks: true,
        }
    }
}

impl ChunkConfig {
    /// Default configuration with a different chunk threshold.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.chunk_size == 0 {
            return Err(StoreError::Config("chunk_size must be positive".into()));
        }
        if let KeyScheme::Delimited { separator } = self.key_scheme {
            if separator.is_ascii_digit() {
                return Err(StoreError::Config(format!(
                    "key separator {separator:?} cannot be a decimal digit"
                )));
            }
        }
        Ok(())
    }
}
