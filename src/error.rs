// ============================================================================
// src/error.rs – typed failures surfaced by the forge library
// ============================================================================

use thiserror::Error;

/// Largest secret the tools will draw, in bytes.
pub const MAX_SECRET_BYTES: usize = 4096;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("secret length {0} out of range (1..={MAX_SECRET_BYTES} bytes)")]
    InvalidLength(usize),

    /// OS randomness source unavailable. Never retried with a weaker generator.
    #[error("secure randomness unavailable: {0}")]
    Entropy(String),

    #[error("generated value is not safe for a single env line")]
    UnsafeValue,

    #[error("invalid env key {0:?} (must be non-empty, no '=', whitespace or line breaks)")]
    InvalidKey(String),
}

/// Accept `len` only within `1..=MAX_SECRET_BYTES`.
pub fn check_length(len: usize) -> Result<usize, ForgeError> {
    if len == 0 || len > MAX_SECRET_BYTES {
        return Err(ForgeError::InvalidLength(len));
    }
    Ok(len)
}
