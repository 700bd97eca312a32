//! # Attestation Service
//!
//! Orchestrates one attestation:
//!
//! 1. Validate the request (no I/O).
//! 2. Screen the address through the [`ComplianceGateway`]. A screening
//!    failure aborts the request.
//! 3. Generate the age, risk, and selective-disclosure proofs in that order.
//!    If any circuit rejects its input, the attestation is issued as
//!    non-compliant with no proofs and the rejection as `failure_reason`.
//!
//! `is_compliant` is true iff all three proofs were generated. The proofs
//! judge the risk score against the request's own `max_risk_score`. The
//! gateway's verdict, made against the gateway threshold, is recorded
//! alongside but does not decide the outcome.
//!
//! Verification fails closed: an attestation without a selective-disclosure
//! proof is never valid. [`AttestationService::verify_attestation_strict`]
//! also applies the prover's [`ProofPolicy`](veil_zkp::ProofPolicy) to
//! placeholder proofs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use veil_compliance::{ComplianceGateway, RiskVerdict};
use veil_core::AttestationId;
use veil_zkp::{
    AgeProofInput, CircuitType, Proof, ProofError, Prover, RiskProofInput,
    SelectiveDisclosureInput,
};

use crate::attestation::{Attestation, AttestationProofs, AttestationRequest};
use crate::error::AttestationError;
use crate::phase::{AttestationPhase, PhaseTracker};

/// Issues and verifies compliance attestations.
#[derive(Debug, Clone)]
pub struct AttestationService {
    gateway: Arc<ComplianceGateway>,
    prover: Prover,
}

impl AttestationService {
    /// Service over a gateway and a prover.
    pub fn new(gateway: Arc<ComplianceGateway>, prover: Prover) -> Self {
        Self { gateway, prover }
    }

    /// The compliance gateway.
    pub fn gateway(&self) -> &ComplianceGateway {
        &self.gateway
    }

    /// The prover.
    pub fn prover(&self) -> &Prover {
        &self.prover
    }

    /// Issue an attestation timestamped now.
    pub async fn generate_attestation(
        &self,
        request: &AttestationRequest,
    ) -> Result<Attestation, AttestationError> {
        self.generate_attestation_at(request, Utc::now()).await
    }

    /// Issue an attestation timestamped `now`.
    pub async fn generate_attestation_at(
        &self,
        request: &AttestationRequest,
        now: DateTime<Utc>,
    ) -> Result<Attestation, AttestationError> {
        request.validate()?;
        let mut tracker = PhaseTracker::new();

        let verdict = self.gateway.check_compliance(&request.address).await?;
        tracker.advance(AttestationPhase::RiskChecked)?;

        tracker.advance(AttestationPhase::ProofsRequested)?;
        let (proofs, failure_reason) = match self.request_proofs(request, &verdict).await {
            Ok(proofs) => (proofs, None),
            Err((circuit, e)) => (AttestationProofs::default(), Some(format!("{circuit}: {e}"))),
        };
        let is_compliant = failure_reason.is_none();
        if is_compliant && !verdict.is_compliant {
            tracing::debug!(
                risk_score = verdict.risk_score,
                gateway_threshold = verdict.threshold,
                max_risk_score = request.max_risk_score,
                "gateway verdict stricter than request, proofs decide"
            );
        }
        tracker.advance(if is_compliant {
            AttestationPhase::Compliant
        } else {
            AttestationPhase::NonCompliant
        })?;

        let attestation = Attestation {
            id: AttestationId::generate(now),
            address: request.address.clone(),
            timestamp: now,
            is_compliant,
            phase: tracker.phase(),
            proofs,
            verdict,
            public_inputs: request.public_inputs(),
            failure_reason,
        };

        tracing::info!(
            attestation = %attestation.id,
            is_compliant,
            reason = attestation.failure_reason.as_deref().unwrap_or(""),
            "attestation issued"
        );
        Ok(attestation)
    }

    async fn request_proofs(
        &self,
        request: &AttestationRequest,
        verdict: &RiskVerdict,
    ) -> Result<AttestationProofs, (CircuitType, ProofError)> {
        let age_input = AgeProofInput {
            age: request.age,
            minimum_age: request.minimum_age,
        };
        let risk_input = RiskProofInput {
            risk_score: i64::from(verdict.risk_score),
            max_allowed_risk: request.max_risk_score,
        };
        let sd_input = SelectiveDisclosureInput {
            age: request.age,
            risk_score: i64::from(verdict.risk_score),
            is_sanctioned: verdict.is_sanctioned,
            wallet_balance_usd: request.wallet_balance_usd,
            minimum_age: request.minimum_age,
            max_risk_score: request.max_risk_score,
            min_balance_usd: request.min_balance_usd,
        };

        let age = self
            .prover
            .generate_age_proof(&age_input)
            .await
            .map_err(|e| (CircuitType::AgeVerification, e))?;
        let risk = self
            .prover
            .generate_risk_proof(&risk_input)
            .await
            .map_err(|e| (CircuitType::RiskThreshold, e))?;
        let selective_disclosure = self
            .prover
            .generate_selective_disclosure_proof(&sd_input)
            .await
            .map_err(|e| (CircuitType::SelectiveDisclosure, e))?;

        Ok(AttestationProofs {
            age: Some(age),
            risk: Some(risk),
            selective_disclosure: Some(selective_disclosure),
        })
    }

    /// Verify a single proof.
    pub async fn verify_proof(&self, circuit: CircuitType, proof: &Proof) -> bool {
        self.prover.verify(circuit, proof).await
    }

    /// Verify an attestation.
    ///
    /// Valid iff the attestation is compliant, carries a selective-disclosure
    /// proof whose public inputs match the declared thresholds, and every
    /// proof it carries verifies.
    pub async fn verify_attestation(&self, attestation: &Attestation) -> bool {
        self.check_attestation(attestation, false).await
    }

    /// [`verify_attestation`](Self::verify_attestation), with each proof
    /// checked by [`Prover::verify_strict`]. Under a production policy an
    /// attestation built on placeholder proofs fails.
    pub async fn verify_attestation_strict(&self, attestation: &Attestation) -> bool {
        self.check_attestation(attestation, true).await
    }

    async fn check_proof(&self, circuit: CircuitType, proof: &Proof, strict: bool) -> bool {
        if strict {
            self.prover.verify_strict(circuit, proof).await
        } else {
            self.prover.verify(circuit, proof).await
        }
    }

    async fn check_attestation(&self, attestation: &Attestation, strict: bool) -> bool {
        if !attestation.is_compliant {
            return false;
        }

        let Some(sd) = &attestation.proofs.selective_disclosure else {
            tracing::debug!(attestation = %attestation.id, "no selective-disclosure proof");
            return false;
        };
        let declared = attestation.public_inputs;
        if sd.public_inputs != declared.selective_disclosure() {
            tracing::warn!(attestation = %attestation.id, "public inputs do not match declaration");
            return false;
        }
        if !self.check_proof(CircuitType::SelectiveDisclosure, sd, strict).await {
            return false;
        }

        if let Some(age) = &attestation.proofs.age {
            if age.public_inputs != [declared.minimum_age.to_string()]
                || !self.check_proof(CircuitType::AgeVerification, age, strict).await
            {
                return false;
            }
        }
        if let Some(risk) = &attestation.proofs.risk {
            if risk.public_inputs != [declared.max_risk_score.to_string()]
                || !self.check_proof(CircuitType::RiskThreshold, risk, strict).await
            {
                return false;
            }
        }
        true
    }
}
