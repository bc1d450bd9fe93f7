//! Error types shared across the crate.

use std::io;
use thiserror::Error;

use crate::key::KeyRole;

/// Errors from key loading, signing, and verification.
///
/// A signature that simply fails its cryptographic check is NOT an error;
/// that outcome is reported as [`crate::scheme::Verdict::Invalid`] so callers
/// can tell "the signature is wrong" apart from "the inputs were malformed".
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid key format: {0}")]
    KeyFormat(String),

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("key role mismatch: expected a {expected} key, got a {actual} key")]
    RoleMismatch { expected: KeyRole, actual: KeyRole },

    /// Unanticipated failure inside a cryptographic primitive.
    #[error("cryptographic operation failed: {0}")]
    Crypto(String),
}

/// Result type for signing and verification operations.
pub type Result<T> = std::result::Result<T, Error>;
