//! Attestation request and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veil_compliance::RiskVerdict;
use veil_core::{AttestationId, ValidationError};
use veil_zkp::Proof;

use crate::phase::AttestationPhase;

/// Default minimum age.
pub const DEFAULT_MINIMUM_AGE: i64 = 18;

/// Default maximum acceptable risk score.
pub const DEFAULT_MAX_RISK_SCORE: i64 = 5;

/// A request to attest a wallet holder's compliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRequest {
    /// Wallet address to screen.
    pub address: String,
    /// Holder age (private).
    pub age: i64,
    /// Wallet balance in whole USD (private).
    pub wallet_balance_usd: u64,
    /// Minimum age (public).
    #[serde(default = "default_minimum_age")]
    pub minimum_age: i64,
    /// Largest acceptable risk score (public).
    #[serde(default = "default_max_risk_score")]
    pub max_risk_score: i64,
    /// Minimum balance in whole USD (public).
    #[serde(default)]
    pub min_balance_usd: u64,
}

fn default_minimum_age() -> i64 {
    DEFAULT_MINIMUM_AGE
}

fn default_max_risk_score() -> i64 {
    DEFAULT_MAX_RISK_SCORE
}

impl AttestationRequest {
    /// Request with default thresholds (age 18, risk 5, no balance floor).
    pub fn new(address: impl Into<String>, age: i64, wallet_balance_usd: u64) -> Self {
        Self {
            address: address.into(),
            age,
            wallet_balance_usd,
            minimum_age: DEFAULT_MINIMUM_AGE,
            max_risk_score: DEFAULT_MAX_RISK_SCORE,
            min_balance_usd: 0,
        }
    }

    /// Override the minimum age.
    pub fn with_minimum_age(mut self, minimum_age: i64) -> Self {
        self.minimum_age = minimum_age;
        self
    }

    /// Override the maximum risk score.
    pub fn with_max_risk_score(mut self, max_risk_score: i64) -> Self {
        self.max_risk_score = max_risk_score;
        self
    }

    /// Override the minimum balance.
    pub fn with_min_balance_usd(mut self, min_balance_usd: u64) -> Self {
        self.min_balance_usd = min_balance_usd;
        self
    }

    /// Structural checks that run before any external call.
    ///
    /// Range checks on the circuit inputs are left to the prover so that a
    /// failing predicate still yields a non-compliant attestation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.address.trim().is_empty() {
            return Err(ValidationError::Empty { field: "address" });
        }
        Ok(())
    }

    /// The public inputs this request declares.
    pub fn public_inputs(&self) -> PublicInputs {
        PublicInputs {
            minimum_age: self.minimum_age,
            max_risk_score: self.max_risk_score,
            min_balance_usd: self.min_balance_usd,
        }
    }
}

/// Thresholds disclosed with an attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// Minimum age.
    pub minimum_age: i64,
    /// Largest acceptable risk score.
    pub max_risk_score: i64,
    /// Minimum balance in whole USD.
    pub min_balance_usd: u64,
}

impl PublicInputs {
    /// Public inputs of the selective-disclosure circuit, in circuit order.
    pub fn selective_disclosure(&self) -> Vec<String> {
        vec![
            self.minimum_age.to_string(),
            self.max_risk_score.to_string(),
            self.min_balance_usd.to_string(),
        ]
    }
}

/// Proofs carried by an attestation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationProofs {
    /// Age proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Proof>,
    /// Risk proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<Proof>,
    /// Selective-disclosure proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selective_disclosure: Option<Proof>,
}

impl AttestationProofs {
    /// Whether no proof is present.
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.risk.is_none() && self.selective_disclosure.is_none()
    }
}

/// Result of an attestation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Opaque identifier.
    pub id: AttestationId,
    /// Screened address.
    pub address: String,
    /// Issue time.
    pub timestamp: DateTime<Utc>,
    /// True iff all three proofs were generated.
    pub is_compliant: bool,
    /// Terminal phase reached.
    pub phase: AttestationPhase,
    /// Generated proofs. Empty when a circuit predicate failed.
    pub proofs: AttestationProofs,
    /// Screening verdict.
    pub verdict: RiskVerdict,
    /// Declared thresholds.
    pub public_inputs: PublicInputs,
    /// Why the attestation is non-compliant, if it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let req = AttestationRequest::new("Wallet111", 25, 5_000);
        assert_eq!(req.minimum_age, 18);
        assert_eq!(req.max_risk_score, 5);
        assert_eq!(req.min_balance_usd, 0);
        assert_eq!(req.public_inputs().selective_disclosure(), vec!["18", "5", "0"]);
    }

    #[test]
    fn empty_address_rejected() {
        let req = AttestationRequest::new("   ", 25, 0);
        assert_eq!(req.validate(), Err(ValidationError::Empty { field: "address" }));
    }

    #[test]
    fn out_of_range_age_is_not_a_request_error() {
        assert!(AttestationRequest::new("w", -3, 0).validate().is_ok());
    }

    #[test]
    fn request_json_fills_defaults() {
        let req: AttestationRequest = serde_json::from_str(
            r#"{"address":"w","age":30,"wallet_balance_usd":100}"#,
        )
        .unwrap();
        assert_eq!(req, AttestationRequest::new("w", 30, 100));
    }

    #[test]
    fn non_numeric_age_is_rejected_at_parse() {
        let res: Result<AttestationRequest, _> = serde_json::from_str(
            r#"{"address":"w","age":"thirty","wallet_balance_usd":100}"#,
        );
        assert!(res.is_err());
    }
}
