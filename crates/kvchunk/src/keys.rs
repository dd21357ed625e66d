//! Logical key validation and chunk key derivation.

use crate::config::KeyScheme;
use crate::error::{StoreError, StoreResult};

/// Check that `key` can name a logical entry under `scheme`.
///
/// Blank keys are always rejected. Under [`KeyScheme::Delimited`] a key that
/// contains the separator is rejected too, since it could collide with
/// another entry's chunk keys.
pub fn validate_key(key: &str, scheme: KeyScheme) -> StoreResult<()> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key cannot be empty or whitespace-only".into(),
        });
    }
    if let KeyScheme::Delimited { separator } = scheme {
        if key.contains(separator) {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
                reason: format!("key cannot contain the chunk separator {separator:?}"),
            });
        }
    }
    Ok(())
}

/// Backend key holding chunk `index` of the entry at `key`.
pub fn chunk_key(key: &str, index: usize, scheme: KeyScheme) -> String {
    match scheme {
        KeyScheme::Concatenated => format!("{key}{index}"),
        KeyScheme::Delimited { separator } => format!("{key}{separator}{index}"),
    }
}
