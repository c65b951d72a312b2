//! Storage key generation.
//!
//! Key format: `{prefix}/{random-id}.{extension}` where the random id is 32
//! bytes from the operating system RNG, URL-safe base64 encoded without
//! padding. Keys are never built from client-supplied filenames.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::traits::{StorageError, StorageResult};

/// Number of random bytes in a key's unique segment.
pub const RANDOM_ID_BYTES: usize = 32;

/// A generated, never-reused object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generate a fresh key under `prefix` with the given file extension.
    pub fn generate(prefix: &str, extension: &str) -> StorageResult<Self> {
        validate_segment("prefix", prefix)?;
        validate_segment("extension", extension)?;
        let id = random_id()?;
        Ok(StorageKey(format!("{}/{}.{}", prefix, id, extension)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefix(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Draw a URL-safe random identifier from the OS entropy source.
pub fn random_id() -> StorageResult<String> {
    let mut bytes = [0u8; RANDOM_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::EntropyUnavailable(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn validate_segment(name: &str, value: &str) -> StorageResult<()> {
    if value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid key {}: {:?}",
            name, value
        )));
    }
    Ok(())
}
