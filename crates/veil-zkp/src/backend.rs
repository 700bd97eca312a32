//! # Proving Backend Seam
//!
//! The circuit runtime and prover live outside this crate. A backend loads a
//! compiled circuit artifact, solves a witness against it, produces proof
//! bytes, and hands out a verifier for the circuit.
//!
//! Artifacts and verifiers are expensive to build. [`CircuitCache`](crate::CircuitCache)
//! keeps one of each per circuit.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::circuit::CircuitType;
use crate::error::BackendError;

/// A compiled circuit as loaded by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitArtifact {
    /// Circuit this artifact implements.
    pub circuit: CircuitType,
    /// Backend-specific compiled form.
    pub bytecode: Vec<u8>,
}

impl CircuitArtifact {
    /// Create an artifact.
    pub fn new(circuit: CircuitType, bytecode: Vec<u8>) -> Self {
        Self { circuit, bytecode }
    }

    /// SHA-256 of the bytecode, hex-encoded.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytecode))
    }
}

/// Witness solved against an artifact, ready for proving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedWitness(pub Vec<u8>);

/// Verifier bound to one circuit.
#[async_trait]
pub trait CircuitVerifier: Send + Sync {
    /// Check `proof` against `public_inputs`.
    async fn verify(&self, proof: &[u8], public_inputs: &[String]) -> Result<bool, BackendError>;
}

/// A real proving backend.
#[async_trait]
pub trait ProvingBackend: Send + Sync {
    /// Load the compiled artifact for `circuit`.
    async fn load_artifact(&self, circuit: CircuitType) -> Result<CircuitArtifact, BackendError>;

    /// Solve `witness` against `artifact`.
    async fn execute(
        &self,
        artifact: &CircuitArtifact,
        witness: &serde_json::Value,
    ) -> Result<SolvedWitness, BackendError>;

    /// Produce proof bytes for a solved witness.
    async fn generate_proof(
        &self,
        artifact: &CircuitArtifact,
        solved: &SolvedWitness,
    ) -> Result<Vec<u8>, BackendError>;

    /// Build a verifier for `artifact`.
    async fn load_verifier(
        &self,
        artifact: &CircuitArtifact,
    ) -> Result<Arc<dyn CircuitVerifier>, BackendError>;
}
