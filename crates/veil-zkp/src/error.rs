//! Proof error types.

use thiserror::Error;
use veil_core::ValidationError;

use crate::circuit::CircuitType;

/// Failure inside the proving backend.
///
/// Never surfaced from proof generation: the prover falls back to a
/// placeholder proof instead. Exposed for backend implementors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The circuit artifact could not be loaded.
    #[error("failed to load {circuit} artifact: {reason}")]
    ArtifactLoad {
        /// Circuit whose artifact failed to load.
        circuit: CircuitType,
        /// Backend-reported reason.
        reason: String,
    },
    /// Witness execution failed.
    #[error("witness execution failed: {0}")]
    Execution(String),
    /// Proof generation failed.
    #[error("prover error: {0}")]
    Proving(String),
    /// Proof verification could not run.
    #[error("verifier error: {0}")]
    Verification(String),
}

/// Error from a proof request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// Circuit input failed validation. Raised before any backend call.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The proving backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
