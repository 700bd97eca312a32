//! # Identifier Newtypes
//!
//! Newtype wrappers for engine identifiers. A `WithdrawalId` cannot be
//! passed where an `AttestationId` is expected.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scheduled withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalId(pub Uuid);

impl WithdrawalId {
    /// Generate a new random withdrawal identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WithdrawalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WithdrawalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque attestation identifier: `att_<unix-millis>_<16 hex chars>`.
///
/// Carries no semantic meaning beyond uniqueness. The millisecond prefix
/// plus 64 random bits make collisions impractical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttestationId(String);

impl AttestationId {
    /// Generate an identifier for an attestation issued at `issued_at`.
    pub fn generate(issued_at: DateTime<Utc>) -> Self {
        let mut suffix = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut suffix);
        Self(format!(
            "att_{}_{}",
            issued_at.timestamp_millis(),
            hex::encode(suffix)
        ))
    }

    /// Borrow the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttestationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attestation_ids_are_unique() {
        let now = Utc::now();
        let a = AttestationId::generate(now);
        let b = AttestationId::generate(now);
        assert_ne!(a, b);
    }

    #[test]
    fn attestation_id_format() {
        let now = Utc::now();
        let id = AttestationId::generate(now);
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "att");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 16);
    }

    #[test]
    fn withdrawal_ids_are_unique() {
        assert_ne!(WithdrawalId::new(), WithdrawalId::new());
    }
}
