//! Errors raised by seed handling and address derivation.

use thiserror::Error;

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The supplied seed is not exactly 32 bytes.
    #[error("invalid seed length: expected 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    /// A public key or address could not be parsed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),
}
