//! # veil-crypto: Mixing-Address Key Material
//!
//! Provides the cryptographic building blocks for fragment routing:
//!
//! - **Seeds** ([`MixingSeed`]): 32-byte caller-owned secrets, zeroized on
//!   drop, never serialized or logged.
//! - **Address derivation** ([`AddressDeriver`]): a pure function of
//!   `(seed, index)` producing an Ed25519 keypair whose public key is the
//!   fragment's target address.
//!
//! ## Crate Policy
//!
//! - Derivation performs no I/O and holds no state across calls.
//! - Private key material does not implement `Serialize`.
//! - No mocking of cryptographic operations in tests.

pub mod address;
pub mod error;
pub mod seed;

pub use address::{
    verify_address_signature, AddressDeriver, AddressSignature, DerivedAddress, DerivedKeypair,
    MixingPublicKey,
};
pub use error::CryptoError;
pub use seed::{MixingSeed, SEED_LEN};
