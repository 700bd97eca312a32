//! # veil-attestation: Compliance Attestations
//!
//! Binds a screening verdict and a set of compliance proofs into one
//! [`Attestation`] that a counterparty can verify before a private transfer
//! proceeds.
//!
//! ```text
//! request ─validate─▶ ComplianceGateway ─verdict─▶ Prover (age, risk, SD) ─▶ Attestation
//! ```
//!
//! A subject that fails a predicate gets a non-compliant attestation, not
//! an error. Only malformed requests and screening failures are errors.

pub mod attestation;
pub mod error;
pub mod phase;
pub mod service;

pub use attestation::{
    Attestation, AttestationProofs, AttestationRequest, PublicInputs, DEFAULT_MAX_RISK_SCORE,
    DEFAULT_MINIMUM_AGE,
};
pub use error::AttestationError;
pub use phase::{AttestationPhase, PhaseTracker};
pub use service::AttestationService;
