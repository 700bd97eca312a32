//! # Proof Acceptance Policy
//!
//! Placeholder proofs are SHA-256 digests of public data. They keep the
//! pipeline usable without a proving backend, but a verifier that accepts
//! them proves nothing about the witness.
//!
//! Plain verification ([`Prover::verify`](crate::Prover::verify)) always
//! gives placeholders the structural check, so every proof the engine issues
//! verifies under every mode. [`ProofPolicy`] governs the strict check
//! ([`Prover::verify_strict`](crate::Prover::verify_strict)), used by
//! callers that must not rely on a placeholder:
//!
//! | Mode | `verify` on placeholder | `verify_strict` on placeholder | Real proofs |
//! |------|-------------------------|--------------------------------|-------------|
//! | `Development` | non-empty | non-empty | backend verifier |
//! | `Production` | non-empty | rejected | backend verifier |
//!
//! The mode comes from, in order:
//! 1. `VEIL_PROOF_POLICY` (`production` / `development`)
//! 2. Release builds default to `Production`
//! 3. Debug builds default to `Development`

use serde::{Deserialize, Serialize};

/// Proof policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Strict verification rejects placeholder proofs.
    Production,
    /// Strict verification accepts placeholder proofs after a structural check.
    Development,
}

/// Runtime proof acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// Policy with the given mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Policy whose strict check rejects placeholder proofs.
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Policy whose strict check accepts placeholder proofs.
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Policy from `VEIL_PROOF_POLICY`, falling back to the build profile.
    pub fn from_env() -> Self {
        Self::from_setting(std::env::var("VEIL_PROOF_POLICY").ok().as_deref())
    }

    /// Policy from an explicit `VEIL_PROOF_POLICY` value, falling back to
    /// the build profile when absent or unrecognised.
    fn from_setting(setting: Option<&str>) -> Self {
        if let Some(val) = setting {
            match val.trim().to_lowercase().as_str() {
                "production" | "prod" => return Self::production(),
                "development" | "dev" => return Self::development(),
                other => {
                    tracing::warn!(value = other, "unknown VEIL_PROOF_POLICY, using build default");
                }
            }
        }

        if cfg!(not(debug_assertions)) {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Current mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// Whether placeholder proofs may pass strict verification.
    pub fn accepts_placeholders(&self) -> bool {
        self.mode == PolicyMode::Development
    }
}

impl Default for ProofPolicy {
    fn default() -> Self {
        Self::from_env()
    }
}
