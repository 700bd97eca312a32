//! # Placeholder Proofs
//!
//! Deterministic SHA-256 stand-ins produced when no real proving backend is
//! available or the backend fails. They carry `is_real = false` and have
//! **no cryptographic soundness**: anyone can compute one for any inputs.
//!
//! ```text
//! bytes = SHA256("veil/placeholder-proof/v1" || circuit_name || JSON(public_inputs))
//! ```
//!
//! Whether a verifier accepts them is decided by [`ProofPolicy`](crate::ProofPolicy).

use sha2::{Digest, Sha256};

use crate::circuit::CircuitType;
use crate::proof::Proof;

const DOMAIN: &[u8] = b"veil/placeholder-proof/v1";

/// Build the placeholder proof for a circuit and its public inputs.
pub fn placeholder_proof(circuit: CircuitType, public_inputs: Vec<String>) -> Proof {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update(circuit.name().as_bytes());
    // A Vec<String> always serializes; the empty fallback keeps this infallible.
    hasher.update(serde_json::to_vec(&public_inputs).unwrap_or_default());
    Proof {
        bytes: hasher.finalize().to_vec(),
        public_inputs,
        is_real: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_and_marked() {
        let a = placeholder_proof(CircuitType::AgeVerification, vec!["18".into()]);
        let b = placeholder_proof(CircuitType::AgeVerification, vec!["18".into()]);
        assert_eq!(a, b);
        assert_eq!(a.bytes.len(), 32);
        assert!(!a.is_real);
        assert_eq!(a.public_inputs, vec!["18"]);
    }

    #[test]
    fn domain_separated_by_circuit_and_inputs() {
        let age = placeholder_proof(CircuitType::AgeVerification, vec!["5".into()]);
        let risk = placeholder_proof(CircuitType::RiskThreshold, vec!["5".into()]);
        let other = placeholder_proof(CircuitType::AgeVerification, vec!["21".into()]);
        assert_ne!(age.bytes, risk.bytes);
        assert_ne!(age.bytes, other.bytes);
    }
}
