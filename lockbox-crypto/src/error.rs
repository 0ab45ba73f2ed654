//! Error types for the envelope encryption core.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in the envelope encryption core.
///
/// None of these are transient: a failed call must never be retried with
/// the same inputs.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Caller misconfiguration, detected before any cryptography runs.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A presented metadata record is structurally unusable.
    #[error("malformed envelope metadata: {0}")]
    Metadata(String),

    /// Authentication tag verification failed. Wrong passphrase and
    /// tampered data produce this same fieldless value so callers cannot
    /// tell the two apart.
    #[error("invalid passphrase or corrupted data")]
    Authentication,

    /// An authenticated blob decrypted to key bytes of the wrong size.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Unexpected failure in the underlying cipher primitive.
    #[error("encryption failed: {0}")]
    Encryption(String),
}
