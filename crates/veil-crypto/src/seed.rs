//! # Mixing Seeds
//!
//! A [`MixingSeed`] is the 32-byte secret from which every mixing address
//! is derived. The caller owns it; the engine borrows it per call and never
//! stores it.
//!
//! ## Security Invariant
//!
//! - The seed bytes are zeroized when the value is dropped.
//! - `Debug` prints a fixed redaction marker.
//! - No `Serialize` implementation exists.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Required seed length in bytes.
pub const SEED_LEN: usize = 32;

/// A 32-byte caller-supplied secret used only to derive child material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MixingSeed([u8; SEED_LEN]);

impl MixingSeed {
    /// Wrap an exact 32-byte array.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a seed from an arbitrary slice, rejecting anything but 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SEED_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSeedLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Parse a 64-character hex seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| CryptoError::KeyError(format!("seed hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    pub(crate) fn expose(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for MixingSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MixingSeed(<redacted>)")
    }
}
