//! # veil-zkp: Compliance Proofs
//!
//! Proves compliance predicates about a wallet holder without disclosing
//! the underlying values.
//!
//! ## Circuits
//!
//! - **Age verification**: `age >= minimum_age`
//! - **Risk threshold**: `risk_score <= max_allowed_risk`
//! - **Selective disclosure**: age ∧ risk ∧ not sanctioned ∧ `balance >= min_balance`
//!
//! ## Backends
//!
//! A real [`ProvingBackend`] is optional and decided when the [`Prover`] is
//! built. Without one, or when it fails, the prover issues
//! [placeholder proofs](placeholder) marked `is_real = false`.
//! Placeholders pass plain verification. The [`ProofPolicy`] decides
//! whether they pass the strict check.
//!
//! Artifacts and verifiers are cached per circuit in a [`CircuitCache`]
//! owned by the prover.

pub mod backend;
pub mod cache;
pub mod circuit;
pub mod error;
pub mod placeholder;
pub mod policy;
pub mod proof;
pub mod prover;

pub use backend::{CircuitArtifact, CircuitVerifier, ProvingBackend, SolvedWitness};
pub use cache::CircuitCache;
pub use circuit::{
    AgeProofInput, CircuitInput, CircuitType, RiskProofInput, SelectiveDisclosureInput,
};
pub use error::{BackendError, ProofError};
pub use placeholder::placeholder_proof;
pub use policy::{PolicyMode, ProofPolicy};
pub use proof::Proof;
pub use prover::Prover;
