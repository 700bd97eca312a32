//! # Deterministic Mixing-Address Derivation
//!
//! Every fragment of a private withdrawal is routed to a fresh address
//! derived from the caller's seed and a monotonically increasing index:
//!
//! ```text
//! child_secret = SHA256("veil/mixing-address/v1" || seed || index_be32)
//! keypair      = Ed25519::from_seed(child_secret)
//! address      = hex(keypair.verifying_key)
//! ```
//!
//! ## Security Invariant
//!
//! - Derivation is a pure function of `(seed, index)`: no I/O, no storage.
//! - Without the seed, addresses at different indices are unlinkable
//!   (SHA-256 output under a fixed domain tag).
//! - `DerivedKeypair` does not implement `Serialize` and redacts `Debug`.
//!
//! ## Serde
//!
//! Public keys serialize as hex-encoded strings.

use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::seed::MixingSeed;

const DERIVATION_DOMAIN: &[u8] = b"veil/mixing-address/v1";

/// An Ed25519 public key (32 bytes) identifying a mixing address.
///
/// Serializes as a hex-encoded string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MixingPublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes) produced by a derived keypair.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AddressSignature(pub [u8; 64]);

/// Private material for one derived address.
///
/// Does not implement `Serialize`; the signing key never leaves the process
/// through this type.
pub struct DerivedKeypair {
    signing_key: ed25519_dalek::SigningKey,
}

/// A derived mixing address as handed to the transfer layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivedAddress {
    /// Derivation index under the caller's seed.
    pub index: u32,
    /// Hex-encoded Ed25519 public key.
    pub public_address: String,
    /// Whether a fragment has already been routed to this address.
    pub used: bool,
}

// ---------------------------------------------------------------------------
// MixingPublicKey impls
// ---------------------------------------------------------------------------

impl MixingPublicKey {
    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a public key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let hex_str = hex_str.trim();
        if hex_str.len() != 64 {
            return Err(CryptoError::KeyError(format!(
                "public key hex must be 64 chars, got {}",
                hex_str.len()
            )));
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut arr)
            .map_err(|e| CryptoError::KeyError(e.to_string()))?;
        Ok(Self(arr))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl Serialize for MixingPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for MixingPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for MixingPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MixingPublicKey({}...)", hex::encode(&self.0[..4]))
    }
}

impl std::fmt::Display for MixingPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// AddressSignature impls
// ---------------------------------------------------------------------------

impl AddressSignature {
    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for AddressSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AddressSignature({}...)", hex::encode(&self.0[..4]))
    }
}

// ---------------------------------------------------------------------------
// DerivedKeypair impls
// ---------------------------------------------------------------------------

impl DerivedKeypair {
    /// Public key of this keypair.
    pub fn public_key(&self) -> MixingPublicKey {
        MixingPublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Hex-encoded address of this keypair.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Sign a transfer authorization message with the derived key.
    pub fn sign(&self, message: &[u8]) -> AddressSignature {
        AddressSignature(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for DerivedKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DerivedKeypair(<private>)")
    }
}

/// Verify a signature produced by a derived keypair against its hex address.
pub fn verify_address_signature(
    address: &str,
    message: &[u8],
    signature: &AddressSignature,
) -> Result<(), CryptoError> {
    let vk = MixingPublicKey::from_hex(address)?.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(message, &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
}

// ---------------------------------------------------------------------------
// AddressDeriver
// ---------------------------------------------------------------------------

/// Stateless deriver of mixing addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressDeriver;

impl AddressDeriver {
    /// Derive the keypair at `index` under `seed`.
    pub fn derive_keypair(&self, seed: &MixingSeed, index: u32) -> DerivedKeypair {
        let mut hasher = Sha256::new();
        hasher.update(DERIVATION_DOMAIN);
        hasher.update(seed.expose());
        hasher.update(index.to_be_bytes());
        let mut child = [0u8; 32];
        child.copy_from_slice(&hasher.finalize());

        let signing_key = ed25519_dalek::SigningKey::from_bytes(&child);
        zeroize::Zeroize::zeroize(&mut child);
        DerivedKeypair { signing_key }
    }

    /// Derive `(publicAddress, privateMaterial)` from raw seed bytes.
    ///
    /// Fails with [`CryptoError::InvalidSeedLength`] unless `seed` is
    /// exactly 32 bytes.
    pub fn derive(
        &self,
        seed: &[u8],
        index: u32,
    ) -> Result<(DerivedAddress, DerivedKeypair), CryptoError> {
        let seed = MixingSeed::from_slice(seed)?;
        Ok(self.derive_with_seed(&seed, index))
    }

    /// Derive `(publicAddress, privateMaterial)` from a validated seed.
    pub fn derive_with_seed(&self, seed: &MixingSeed, index: u32) -> (DerivedAddress, DerivedKeypair) {
        let keypair = self.derive_keypair(seed, index);
        let address = DerivedAddress {
            index,
            public_address: keypair.address(),
            used: false,
        };
        (address, keypair)
    }

    /// Derive the public address only.
    pub fn derive_address(&self, seed: &MixingSeed, index: u32) -> DerivedAddress {
        self.derive_with_seed(seed, index).0
    }

    /// Derive `count` consecutive addresses starting at `start`.
    ///
    /// Indices that would overflow `u32` are not produced.
    pub fn derive_batch(&self, seed: &MixingSeed, start: u32, count: u32) -> Vec<DerivedAddress> {
        (0..count)
            .map_while(|offset| start.checked_add(offset))
            .map(|index| self.derive_address(seed, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seed() -> MixingSeed {
        MixingSeed::from_bytes([42u8; 32])
    }

    #[test]
    fn derivation_is_deterministic() {
        let d = AddressDeriver;
        let a = d.derive_address(&seed(), 7);
        let b = d.derive_address(&seed(), 7);
        assert_eq!(a, b);
        assert_eq!(a.index, 7);
        assert!(!a.used);
        assert_eq!(a.public_address.len(), 64);
    }

    #[test]
    fn different_indices_produce_different_addresses() {
        let d = AddressDeriver;
        let addrs: HashSet<String> = d
            .derive_batch(&seed(), 0, 64)
            .into_iter()
            .map(|a| a.public_address)
            .collect();
        assert_eq!(addrs.len(), 64);
    }

    #[test]
    fn different_seeds_produce_different_addresses() {
        let d = AddressDeriver;
        let a = d.derive_address(&MixingSeed::from_bytes([1u8; 32]), 0);
        let b = d.derive_address(&MixingSeed::from_bytes([2u8; 32]), 0);
        assert_ne!(a.public_address, b.public_address);
    }

    #[test]
    fn raw_seed_length_is_enforced() {
        let d = AddressDeriver;
        let err = d.derive(&[0u8; 16], 0).unwrap_err();
        assert_eq!(err, CryptoError::InvalidSeedLength(16));
        assert!(d.derive(&[0u8; 32], 0).is_ok());
    }

    #[test]
    fn raw_and_typed_seed_paths_agree() {
        let d = AddressDeriver;
        let (raw, _) = d.derive(&[42u8; 32], 3).unwrap();
        assert_eq!(raw, d.derive_address(&seed(), 3));
    }

    #[test]
    fn batch_uses_consecutive_indices() {
        let d = AddressDeriver;
        let batch = d.derive_batch(&seed(), 10, 4);
        let indices: Vec<u32> = batch.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![10, 11, 12, 13]);
    }

    #[test]
    fn batch_stops_at_index_overflow() {
        let d = AddressDeriver;
        let batch = d.derive_batch(&seed(), u32::MAX - 1, 5);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn keypair_signs_for_its_address() {
        let d = AddressDeriver;
        let (addr, kp) = d.derive_with_seed(&seed(), 1);
        let sig = kp.sign(b"release fragment 1");
        verify_address_signature(&addr.public_address, b"release fragment 1", &sig)
            .expect("signature should verify");
        assert!(verify_address_signature(&addr.public_address, b"tampered", &sig).is_err());

        let other = d.derive_address(&seed(), 2);
        assert!(verify_address_signature(&other.public_address, b"release fragment 1", &sig).is_err());
    }

    #[test]
    fn debug_does_not_leak_private_key() {
        let kp = AddressDeriver.derive_keypair(&seed(), 0);
        let debug = format!("{kp:?}");
        assert_eq!(debug, "DerivedKeypair(<private>)");
    }

    #[test]
    fn public_key_serde_roundtrip() {
        let pk = AddressDeriver.derive_keypair(&seed(), 0).public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json.len(), 64 + 2);
        let back: MixingPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(pk, back);
    }

    #[test]
    fn public_key_invalid_hex() {
        assert!(MixingPublicKey::from_hex("not-hex").is_err());
        assert!(MixingPublicKey::from_hex("aabb").is_err());
        assert!(MixingPublicKey::from_hex(&"zz".repeat(32)).is_err());
    }
}
