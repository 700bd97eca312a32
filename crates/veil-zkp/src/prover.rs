//! # Prover
//!
//! Generates and verifies compliance proofs.
//!
//! ## Generation
//!
//! 1. Validate the circuit input. A validation failure is returned as
//!    [`ProofError::Validation`] and nothing else runs.
//! 2. With a backend: load (cached) artifact → execute witness → prove.
//!    Any backend error is logged and replaced by a placeholder proof.
//! 3. Without a backend: placeholder proof.
//!
//! ## Verification
//!
//! - Placeholder proofs: valid iff the payload is non-empty.
//! - Real proofs: checked by the circuit's cached verifier. If no backend is
//!   configured or the backend errors, verification falls back to the
//!   non-empty structural check.
//!
//! [`Prover::verify_strict`] additionally rejects placeholder proofs when the
//! [`ProofPolicy`] is `Production`.
//!
//! Whether a backend exists is fixed at construction.

use std::sync::Arc;

use crate::backend::ProvingBackend;
use crate::cache::CircuitCache;
use crate::circuit::{
    AgeProofInput, CircuitInput, CircuitType, RiskProofInput, SelectiveDisclosureInput,
};
use crate::error::{BackendError, ProofError};
use crate::placeholder::placeholder_proof;
use crate::policy::ProofPolicy;
use crate::proof::Proof;

/// Compliance proof generator and verifier.
#[derive(Clone)]
pub struct Prover {
    backend: Option<Arc<dyn ProvingBackend>>,
    cache: Arc<CircuitCache>,
    policy: ProofPolicy,
}

impl std::fmt::Debug for Prover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prover")
            .field("backend", &self.backend.is_some())
            .field("cache", &self.cache)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Prover {
    /// Prover with an optional real backend.
    pub fn new(backend: Option<Arc<dyn ProvingBackend>>, policy: ProofPolicy) -> Self {
        Self {
            backend,
            cache: Arc::new(CircuitCache::new()),
            policy,
        }
    }

    /// Prover backed by `backend`.
    pub fn with_backend(backend: Arc<dyn ProvingBackend>, policy: ProofPolicy) -> Self {
        Self::new(Some(backend), policy)
    }

    /// Prover that only produces placeholder proofs.
    pub fn placeholder_only(policy: ProofPolicy) -> Self {
        Self::new(None, policy)
    }

    /// Whether a real backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// The active policy.
    pub fn policy(&self) -> ProofPolicy {
        self.policy
    }

    /// The artifact/verifier cache.
    pub fn cache(&self) -> &CircuitCache {
        &self.cache
    }

    /// Generate a proof for any circuit input.
    pub async fn generate<I: CircuitInput + Sync>(&self, input: &I) -> Result<Proof, ProofError> {
        let circuit = I::CIRCUIT;
        input.validate()?;
        let public_inputs = input.public_inputs();

        let Some(backend) = &self.backend else {
            tracing::debug!(%circuit, "no proving backend, issuing placeholder proof");
            return Ok(placeholder_proof(circuit, public_inputs));
        };

        match self.prove_real(backend.as_ref(), circuit, &input.witness()).await {
            Ok(bytes) => {
                tracing::debug!(%circuit, len = bytes.len(), "real proof generated");
                Ok(Proof {
                    bytes,
                    public_inputs,
                    is_real: true,
                })
            }
            Err(e) => {
                tracing::warn!(%circuit, error = %e, "proving backend failed, falling back to placeholder proof");
                Ok(placeholder_proof(circuit, public_inputs))
            }
        }
    }

    /// Prove `age >= minimum_age`.
    pub async fn generate_age_proof(&self, input: &AgeProofInput) -> Result<Proof, ProofError> {
        self.generate(input).await
    }

    /// Prove `risk_score <= max_allowed_risk`.
    pub async fn generate_risk_proof(&self, input: &RiskProofInput) -> Result<Proof, ProofError> {
        self.generate(input).await
    }

    /// Prove the combined age, risk, sanction, and balance predicate.
    pub async fn generate_selective_disclosure_proof(
        &self,
        input: &SelectiveDisclosureInput,
    ) -> Result<Proof, ProofError> {
        self.generate(input).await
    }

    async fn prove_real(
        &self,
        backend: &dyn ProvingBackend,
        circuit: CircuitType,
        witness: &serde_json::Value,
    ) -> Result<Vec<u8>, BackendError> {
        let artifact = self.cache.artifact(circuit, backend).await?;
        let solved = backend.execute(&artifact, witness).await?;
        let bytes = backend.generate_proof(&artifact, &solved).await?;
        if bytes.is_empty() {
            return Err(BackendError::Proving("backend returned an empty proof".into()));
        }
        Ok(bytes)
    }

    /// Verify under the active policy: like [`Prover::verify`], but a
    /// `Production` policy rejects placeholder proofs outright.
    pub async fn verify_strict(&self, circuit: CircuitType, proof: &Proof) -> bool {
        if !proof.is_real && !self.policy.accepts_placeholders() {
            tracing::warn!(%circuit, "placeholder proof rejected by production policy");
            return false;
        }
        self.verify(circuit, proof).await
    }

    /// Verify a proof for `circuit`.
    pub async fn verify(&self, circuit: CircuitType, proof: &Proof) -> bool {
        if proof.is_empty() {
            return false;
        }
        if !proof.is_real {
            return true;
        }

        let Some(backend) = &self.backend else {
            tracing::warn!(%circuit, "real proof but no backend, using structural check");
            return true;
        };

        let outcome = match self.cache.verifier(circuit, backend.as_ref()).await {
            Ok(verifier) => verifier.verify(&proof.bytes, &proof.public_inputs).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(%circuit, error = %e, "verifier failed, using structural check");
                true
            }
        }
    }
}
