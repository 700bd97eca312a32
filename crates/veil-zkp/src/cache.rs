//! # Circuit Cache
//!
//! One artifact slot and one verifier slot per circuit. Each slot is a
//! `tokio::sync::OnceCell`:
//!
//! - concurrent first loads for the same circuit are coalesced (one loader
//!   runs, the others wait for its result);
//! - a failed load leaves the slot empty so the next call retries;
//! - once filled, a slot never changes.
//!
//! The cache is owned by whoever owns the prover. It is not a process
//! global.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::backend::{CircuitArtifact, CircuitVerifier, ProvingBackend};
use crate::circuit::CircuitType;
use crate::error::BackendError;

const SLOTS: usize = CircuitType::ALL.len();

/// Load-once store of circuit artifacts and verifiers.
#[derive(Default)]
pub struct CircuitCache {
    artifacts: [OnceCell<Arc<CircuitArtifact>>; SLOTS],
    verifiers: [OnceCell<Arc<dyn CircuitVerifier>>; SLOTS],
}

impl std::fmt::Debug for CircuitCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitCache")
            .field("artifacts", &loaded(&self.artifacts))
            .field("verifiers", &loaded(&self.verifiers))
            .finish()
    }
}

fn loaded<T>(cells: &[OnceCell<T>]) -> Vec<CircuitType> {
    CircuitType::ALL
        .iter()
        .zip(cells)
        .filter(|(_, cell)| cell.initialized())
        .map(|(circuit, _)| *circuit)
        .collect()
}

impl CircuitCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact for `circuit`, loading it through `backend` on first use.
    pub async fn artifact(
        &self,
        circuit: CircuitType,
        backend: &dyn ProvingBackend,
    ) -> Result<Arc<CircuitArtifact>, BackendError> {
        self.artifacts[circuit.slot()]
            .get_or_try_init(|| async {
                tracing::debug!(%circuit, "loading circuit artifact");
                let artifact = backend.load_artifact(circuit).await?;
                if artifact.circuit != circuit {
                    return Err(BackendError::ArtifactLoad {
                        circuit,
                        reason: format!("backend returned {} artifact", artifact.circuit),
                    });
                }
                Ok(Arc::new(artifact))
            })
            .await
            .cloned()
    }

    /// Verifier for `circuit`, built on first use and reused afterwards.
    pub async fn verifier(
        &self,
        circuit: CircuitType,
        backend: &dyn ProvingBackend,
    ) -> Result<Arc<dyn CircuitVerifier>, BackendError> {
        self.verifiers[circuit.slot()]
            .get_or_try_init(|| async {
                let artifact = self.artifact(circuit, backend).await?;
                tracing::debug!(%circuit, digest = %artifact.digest(), "building verifier");
                backend.load_verifier(&artifact).await
            })
            .await
            .cloned()
    }

    /// Whether the artifact for `circuit` is loaded.
    pub fn has_artifact(&self, circuit: CircuitType) -> bool {
        self.artifacts[circuit.slot()].initialized()
    }

    /// Whether the verifier for `circuit` is built.
    pub fn has_verifier(&self, circuit: CircuitType) -> bool {
        self.verifiers[circuit.slot()].initialized()
    }
}
