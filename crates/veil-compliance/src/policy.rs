//! Sanction detection policy.
//!
//! An address is sanctioned when either rule fires:
//!
//! 1. Some evidence entry sits at distance 0 (the address itself) and its
//!    category contains one of the policy keywords, compared
//!    case-insensitively.
//! 2. The provider reported the maximum risk score and
//!    `max_score_implies_sanctioned` is set.
//!
//! Evidence at distance > 0 never sanctions an address on its own.

use serde::{Deserialize, Serialize};

use crate::risk::{RiskAssessment, MAX_RISK_SCORE};

/// Default category keywords that mark sanction evidence.
pub const DEFAULT_SANCTION_KEYWORDS: [&str; 5] = ["sanction", "ofac", "sdn", "terror", "blocked"];

/// Configurable sanction heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionPolicy {
    /// Lowercased category keywords.
    keywords: Vec<String>,
    /// Treat the maximum risk score as a sanction hit.
    pub max_score_implies_sanctioned: bool,
}

impl Default for SanctionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SANCTION_KEYWORDS, true)
    }
}

impl SanctionPolicy {
    /// Build a policy from keywords (case is ignored).
    pub fn new<I, S>(keywords: I, max_score_implies_sanctioned: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            max_score_implies_sanctioned,
        }
    }

    /// The active keyword set.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether `category` names a sanction list.
    pub fn matches_category(&self, category: &str) -> bool {
        let category = category.to_lowercase();
        self.keywords.iter().any(|k| category.contains(k.as_str()))
    }

    /// Apply both sanction rules to an assessment.
    pub fn is_sanctioned(&self, assessment: &RiskAssessment) -> bool {
        if self.max_score_implies_sanctioned && assessment.risk_score >= MAX_RISK_SCORE {
            return true;
        }
        assessment
            .malicious_addresses_found
            .iter()
            .any(|e| e.distance == 0 && self.matches_category(&e.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::Evidence;

    fn assessment(score: u8, evidence: Vec<(u32, &str)>) -> RiskAssessment {
        RiskAssessment {
            risk_score: score,
            risk_level: Default::default(),
            num_hops: None,
            malicious_addresses_found: evidence
                .into_iter()
                .map(|(distance, category)| Evidence {
                    address: "flagged".into(),
                    distance,
                    name_tag: None,
                    entity: None,
                    category: category.into(),
                })
                .collect(),
            reasoning: String::new(),
        }
    }

    #[test]
    fn direct_sanction_evidence_hits() {
        let p = SanctionPolicy::default();
        assert!(p.is_sanctioned(&assessment(3, vec![(0, "OFAC SDN List")])));
        assert!(p.is_sanctioned(&assessment(3, vec![(0, "Terrorist Financing")])));
    }

    #[test]
    fn indirect_evidence_alone_does_not_sanction() {
        let p = SanctionPolicy::default();
        assert!(!p.is_sanctioned(&assessment(6, vec![(1, "OFAC SDN List"), (3, "sanctions")])));
    }

    #[test]
    fn direct_non_sanction_category_does_not_sanction() {
        let p = SanctionPolicy::default();
        assert!(!p.is_sanctioned(&assessment(7, vec![(0, "mixer"), (0, "phishing")])));
    }

    #[test]
    fn max_score_rule_is_configurable() {
        let clean = assessment(10, vec![]);
        assert!(SanctionPolicy::default().is_sanctioned(&clean));
        let lenient = SanctionPolicy::new(DEFAULT_SANCTION_KEYWORDS, false);
        assert!(!lenient.is_sanctioned(&clean));
    }

    #[test]
    fn custom_keywords_are_normalised() {
        let p = SanctionPolicy::new(["  EU-List ", ""], false);
        assert_eq!(p.keywords(), &["eu-list".to_string()]);
        assert!(p.is_sanctioned(&assessment(2, vec![(0, "eu-list designated")])));
        assert!(!p.is_sanctioned(&assessment(2, vec![(0, "OFAC")])));
    }
}
