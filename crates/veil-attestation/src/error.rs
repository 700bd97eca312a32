//! Attestation error types.
//!
//! Only two things abort an attestation request: a malformed request and a
//! failed compliance screening call. A subject that simply fails the
//! compliance predicates gets an attestation with `is_compliant = false`.

use thiserror::Error;
use veil_compliance::ComplianceError;
use veil_core::{StateError, ValidationError};

/// Error from an attestation request.
#[derive(Error, Debug)]
pub enum AttestationError {
    /// The request was malformed. Raised before any external call.
    #[error("invalid attestation request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// Compliance screening failed. No attestation is issued.
    #[error("compliance screening failed: {0}")]
    Screening(#[from] ComplianceError),

    /// Internal lifecycle violation. Indicates a bug.
    #[error(transparent)]
    State(#[from] StateError),
}
