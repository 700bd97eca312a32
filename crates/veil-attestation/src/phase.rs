//! # Attestation Lifecycle
//!
//! STARTED → RISK_CHECKED → PROOFS_REQUESTED → COMPLIANT | NON_COMPLIANT
//!
//! Terminal states: COMPLIANT, NON_COMPLIANT. No transition skips a phase
//! or moves backward.

use serde::{Deserialize, Serialize};
use veil_core::StateError;

/// Phase of one attestation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttestationPhase {
    /// Request accepted.
    Started,
    /// Risk verdict obtained.
    RiskChecked,
    /// Proofs requested from the prover.
    ProofsRequested,
    /// All proofs generated and the verdict is compliant (terminal).
    Compliant,
    /// Some predicate failed (terminal).
    NonCompliant,
}

impl AttestationPhase {
    /// Whether this phase is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Compliant | Self::NonCompliant)
    }

    /// Whether `next` directly follows `self`.
    pub fn can_advance_to(&self, next: AttestationPhase) -> bool {
        matches!(
            (self, next),
            (Self::Started, Self::RiskChecked)
                | (Self::RiskChecked, Self::ProofsRequested)
                | (Self::ProofsRequested, Self::Compliant)
                | (Self::ProofsRequested, Self::NonCompliant)
        )
    }
}

impl std::fmt::Display for AttestationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Started => "STARTED",
            Self::RiskChecked => "RISK_CHECKED",
            Self::ProofsRequested => "PROOFS_REQUESTED",
            Self::Compliant => "COMPLIANT",
            Self::NonCompliant => "NON_COMPLIANT",
        };
        f.write_str(s)
    }
}

/// Tracks the phase of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTracker {
    phase: AttestationPhase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    /// New tracker in STARTED.
    pub fn new() -> Self {
        Self {
            phase: AttestationPhase::Started,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> AttestationPhase {
        self.phase
    }

    /// Move to `next`, rejecting anything but the direct successor.
    pub fn advance(&mut self, next: AttestationPhase) -> Result<(), StateError> {
        if !self.phase.can_advance_to(next) {
            return Err(StateError::InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
                reason: if self.phase.is_terminal() {
                    "attestation already finished".into()
                } else {
                    "phases must be visited in order".into()
                },
            });
        }
        tracing::trace!(from = %self.phase, to = %next, "attestation phase");
        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut t = PhaseTracker::new();
        t.advance(AttestationPhase::RiskChecked).unwrap();
        t.advance(AttestationPhase::ProofsRequested).unwrap();
        t.advance(AttestationPhase::Compliant).unwrap();
        assert!(t.phase().is_terminal());
    }

    #[test]
    fn cannot_skip_phases() {
        let mut t = PhaseTracker::new();
        let err = t.advance(AttestationPhase::ProofsRequested).unwrap_err();
        assert!(err.to_string().contains("STARTED"));
        assert!(t.advance(AttestationPhase::Compliant).is_err());
        assert_eq!(t.phase(), AttestationPhase::Started);
    }

    #[test]
    fn terminal_is_final() {
        let mut t = PhaseTracker::new();
        t.advance(AttestationPhase::RiskChecked).unwrap();
        t.advance(AttestationPhase::ProofsRequested).unwrap();
        t.advance(AttestationPhase::NonCompliant).unwrap();
        let err = t.advance(AttestationPhase::Compliant).unwrap_err();
        assert!(err.to_string().contains("already finished"));
    }

    #[test]
    fn display_and_serde_agree() {
        let json = serde_json::to_string(&AttestationPhase::ProofsRequested).unwrap();
        assert_eq!(json, format!("\"{}\"", AttestationPhase::ProofsRequested));
    }
}
