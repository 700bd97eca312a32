//! # Compliance Circuits
//!
//! Input definitions for the three compliance circuits. Each input type
//! knows how to validate itself, which values it discloses as public
//! inputs, and which values form the private witness.
//!
//! | Circuit | Predicate | Public inputs |
//! |---------|-----------|---------------|
//! | [`CircuitType::AgeVerification`] | `age >= minimum_age` | `[minimum_age]` |
//! | [`CircuitType::RiskThreshold`] | `risk_score <= max_allowed_risk` | `[max_allowed_risk]` |
//! | [`CircuitType::SelectiveDisclosure`] | age ∧ risk ∧ ¬sanctioned ∧ balance | `[minimum_age, max_risk_score, min_balance_usd]` |
//!
//! Validation runs before any backend call and never touches the network.

use serde::{Deserialize, Serialize};
use veil_core::ValidationError;

/// Largest age the age circuit can represent (8-bit field).
pub const MAX_AGE: i64 = 255;

/// Risk score bounds.
pub const MIN_RISK: i64 = 1;
/// Risk score bounds.
pub const MAX_RISK: i64 = 10;

/// The compliance circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitType {
    /// Proves age meets a minimum.
    AgeVerification,
    /// Proves a risk score stays within a maximum.
    RiskThreshold,
    /// Proves the combined compliance predicate.
    SelectiveDisclosure,
}

impl CircuitType {
    /// All circuits, in cache-slot order.
    pub const ALL: [CircuitType; 3] = [
        CircuitType::AgeVerification,
        CircuitType::RiskThreshold,
        CircuitType::SelectiveDisclosure,
    ];

    /// Stable circuit name, used in artifact lookup and proof domain separation.
    pub fn name(self) -> &'static str {
        match self {
            CircuitType::AgeVerification => "age_verification",
            CircuitType::RiskThreshold => "risk_threshold",
            CircuitType::SelectiveDisclosure => "selective_disclosure",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            CircuitType::AgeVerification => 0,
            CircuitType::RiskThreshold => 1,
            CircuitType::SelectiveDisclosure => 2,
        }
    }
}

impl std::fmt::Display for CircuitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Input to one compliance circuit.
pub trait CircuitInput {
    /// The circuit this input drives.
    const CIRCUIT: CircuitType;

    /// Check every precondition of the circuit.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Values disclosed to the verifier, in circuit order.
    fn public_inputs(&self) -> Vec<String>;

    /// Full witness handed to the backend. Contains private values.
    fn witness(&self) -> serde_json::Value;
}

/// Input to the age circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeProofInput {
    /// Subject age (private).
    pub age: i64,
    /// Minimum age (public).
    pub minimum_age: i64,
}

/// Input to the risk circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProofInput {
    /// Subject risk score (private).
    pub risk_score: i64,
    /// Largest acceptable score (public).
    pub max_allowed_risk: i64,
}

/// Input to the selective-disclosure circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectiveDisclosureInput {
    /// Subject age (private).
    pub age: i64,
    /// Subject risk score (private).
    pub risk_score: i64,
    /// Sanction status (private).
    pub is_sanctioned: bool,
    /// Wallet balance in whole USD (private).
    pub wallet_balance_usd: u64,
    /// Minimum age (public).
    pub minimum_age: i64,
    /// Largest acceptable risk score (public).
    pub max_risk_score: i64,
    /// Minimum balance in whole USD (public).
    pub min_balance_usd: u64,
}

fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_age(age: i64, minimum_age: i64) -> Result<(), ValidationError> {
    in_range("age", age, 0, MAX_AGE)?;
    in_range("minimum_age", minimum_age, 0, MAX_AGE)?;
    if age < minimum_age {
        return Err(ValidationError::BelowMinimum {
            field: "age",
            value: age,
            minimum: minimum_age,
        });
    }
    Ok(())
}

fn check_risk(risk_score: i64, max_allowed: i64) -> Result<(), ValidationError> {
    in_range("risk_score", risk_score, MIN_RISK, MAX_RISK)?;
    in_range("max_allowed_risk", max_allowed, MIN_RISK, MAX_RISK)?;
    if risk_score > max_allowed {
        return Err(ValidationError::AboveMaximum {
            field: "risk_score",
            value: risk_score,
            maximum: max_allowed,
        });
    }
    Ok(())
}

fn saturating_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

impl CircuitInput for AgeProofInput {
    const CIRCUIT: CircuitType = CircuitType::AgeVerification;

    fn validate(&self) -> Result<(), ValidationError> {
        check_age(self.age, self.minimum_age)
    }

    fn public_inputs(&self) -> Vec<String> {
        vec![self.minimum_age.to_string()]
    }

    fn witness(&self) -> serde_json::Value {
        serde_json::json!({
            "age": self.age,
            "minimum_age": self.minimum_age,
        })
    }
}

impl CircuitInput for RiskProofInput {
    const CIRCUIT: CircuitType = CircuitType::RiskThreshold;

    fn validate(&self) -> Result<(), ValidationError> {
        check_risk(self.risk_score, self.max_allowed_risk)
    }

    fn public_inputs(&self) -> Vec<String> {
        vec![self.max_allowed_risk.to_string()]
    }

    fn witness(&self) -> serde_json::Value {
        serde_json::json!({
            "risk_score": self.risk_score,
            "max_allowed_risk": self.max_allowed_risk,
        })
    }
}

impl CircuitInput for SelectiveDisclosureInput {
    const CIRCUIT: CircuitType = CircuitType::SelectiveDisclosure;

    fn validate(&self) -> Result<(), ValidationError> {
        check_age(self.age, self.minimum_age)?;
        check_risk(self.risk_score, self.max_risk_score)?;
        if self.is_sanctioned {
            return Err(ValidationError::Sanctioned);
        }
        if self.wallet_balance_usd < self.min_balance_usd {
            return Err(ValidationError::BelowMinimum {
                field: "wallet_balance_usd",
                value: saturating_i64(self.wallet_balance_usd),
                minimum: saturating_i64(self.min_balance_usd),
            });
        }
        Ok(())
    }

    fn public_inputs(&self) -> Vec<String> {
        vec![
            self.minimum_age.to_string(),
            self.max_risk_score.to_string(),
            self.min_balance_usd.to_string(),
        ]
    }

    fn witness(&self) -> serde_json::Value {
        serde_json::json!({
            "age": self.age,
            "risk_score": self.risk_score,
            "is_sanctioned": self.is_sanctioned,
            "wallet_balance_usd": self.wallet_balance_usd,
            "minimum_age": self.minimum_age,
            "max_risk_score": self.max_risk_score,
            "min_balance_usd": self.min_balance_usd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sd() -> SelectiveDisclosureInput {
        SelectiveDisclosureInput {
            age: 30,
            risk_score: 2,
            is_sanctioned: false,
            wallet_balance_usd: 10_000,
            minimum_age: 18,
            max_risk_score: 5,
            min_balance_usd: 1_000,
        }
    }

    #[test]
    fn age_bounds() {
        assert!(AgeProofInput { age: 25, minimum_age: 18 }.validate().is_ok());
        assert!(AgeProofInput { age: 18, minimum_age: 18 }.validate().is_ok());
        assert!(AgeProofInput { age: 255, minimum_age: 0 }.validate().is_ok());

        let err = AgeProofInput { age: 16, minimum_age: 18 }.validate().unwrap_err();
        assert!(err.to_string().contains("below minimum"));

        let err = AgeProofInput { age: -1, minimum_age: 18 }.validate().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "age", .. }));
        assert!(err.to_string().contains("out of range"));

        let err = AgeProofInput { age: 30, minimum_age: 256 }.validate().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "minimum_age", .. }));
    }

    #[test]
    fn risk_bounds() {
        assert!(RiskProofInput { risk_score: 5, max_allowed_risk: 5 }.validate().is_ok());
        assert!(matches!(
            RiskProofInput { risk_score: 6, max_allowed_risk: 5 }.validate(),
            Err(ValidationError::AboveMaximum { .. })
        ));
        assert!(matches!(
            RiskProofInput { risk_score: 0, max_allowed_risk: 5 }.validate(),
            Err(ValidationError::OutOfRange { field: "risk_score", .. })
        ));
        assert!(matches!(
            RiskProofInput { risk_score: 3, max_allowed_risk: 11 }.validate(),
            Err(ValidationError::OutOfRange { field: "max_allowed_risk", .. })
        ));
    }

    #[test]
    fn selective_disclosure_predicate() {
        assert!(sd().validate().is_ok());
        assert_eq!(sd().public_inputs(), vec!["18", "5", "1000"]);

        let sanctioned = SelectiveDisclosureInput { is_sanctioned: true, ..sd() };
        assert_eq!(sanctioned.validate(), Err(ValidationError::Sanctioned));

        let poor = SelectiveDisclosureInput { wallet_balance_usd: 500, ..sd() };
        assert!(matches!(
            poor.validate(),
            Err(ValidationError::BelowMinimum { field: "wallet_balance_usd", .. })
        ));

        let young = SelectiveDisclosureInput { age: 16, ..sd() };
        assert!(young.validate().is_err());

        let risky = SelectiveDisclosureInput { risk_score: 9, ..sd() };
        assert!(risky.validate().is_err());
    }

    #[test]
    fn public_inputs_disclose_only_bounds() {
        assert_eq!(AgeProofInput { age: 25, minimum_age: 18 }.public_inputs(), vec!["18"]);
        assert_eq!(RiskProofInput { risk_score: 2, max_allowed_risk: 5 }.public_inputs(), vec!["5"]);
    }

    #[test]
    fn circuit_names_are_stable() {
        assert_eq!(CircuitType::AgeVerification.to_string(), "age_verification");
        assert_eq!(
            serde_json::to_string(&CircuitType::SelectiveDisclosure).unwrap(),
            "\"selective_disclosure\""
        );
        let slots: Vec<usize> = CircuitType::ALL.iter().map(|c| c.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn age_valid_iff_in_range_and_at_least_minimum(age in -50i64..300, min in -50i64..300) {
            let ok = AgeProofInput { age, minimum_age: min }.validate().is_ok();
            let expected = (0..=255).contains(&age) && (0..=255).contains(&min) && age >= min;
            prop_assert_eq!(ok, expected);
        }

        #[test]
        fn risk_valid_iff_in_range_and_within_maximum(score in -5i64..15, max in -5i64..15) {
            let ok = RiskProofInput { risk_score: score, max_allowed_risk: max }.validate().is_ok();
            let expected = (1..=10).contains(&score) && (1..=10).contains(&max) && score <= max;
            prop_assert_eq!(ok, expected);
        }
    }
}
