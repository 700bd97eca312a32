//! Risk provider wire types and the gateway verdict.

use serde::{Deserialize, Serialize};

/// Lowest risk score a provider may report.
pub const MIN_RISK_SCORE: u8 = 1;

/// Highest risk score a provider may report.
pub const MAX_RISK_SCORE: u8 = 10;

/// Provider risk band.
///
/// Parsed leniently from the provider's label: case, underscores, hyphens
/// and a trailing "risk" are ignored, so `"Very low risk"`, `"very_low"`
/// and `"VERY-LOW"` all read as [`RiskLevel::VeryLow`]. Labels outside the
/// known bands are kept verbatim in [`RiskLevel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    /// Score 1-2.
    VeryLow,
    /// Score 3-4.
    Low,
    /// Score 5-6.
    Medium,
    /// Score 7-8.
    High,
    /// Score 9-10.
    VeryHigh,
    /// Unrecognised provider label.
    Other(String),
}

impl RiskLevel {
    /// Band for a score in 1..=10.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => Self::VeryLow,
            3..=4 => Self::Low,
            5..=6 => Self::Medium,
            7..=8 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
            Self::Other(label) => label,
        }
    }

    /// Whether the provider sent no usable label.
    pub fn is_unlabelled(&self) -> bool {
        matches!(self, Self::Other(label) if label.trim().is_empty())
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for RiskLevel {
    fn from(label: String) -> Self {
        let normalized = label
            .trim()
            .to_ascii_lowercase()
            .replace(['_', '-'], " ");
        let band = normalized.strip_suffix(" risk").unwrap_or(&normalized).trim();
        match band.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "very low" => Self::VeryLow,
            "low" => Self::Low,
            "medium" | "moderate" => Self::Medium,
            "high" => Self::High,
            "very high" | "critical" | "severe" => Self::VeryHigh,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for RiskLevel {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of malicious-link evidence returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// The flagged counterparty address.
    pub address: String,
    /// Graph distance from the screened address (0 = the address itself).
    pub distance: u32,
    /// Provider label for the counterparty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_tag: Option<String>,
    /// Owning entity, if attributed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Provider category, e.g. `"OFAC SDN"` or `"mixer"`.
    #[serde(default)]
    pub category: String,
}

/// Raw risk assessment as returned by the provider.
///
/// Matches `GET /v1/risk/address` on the risk provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Risk score, 1 (clean) ..= 10 (directly malicious).
    pub risk_score: u8,
    /// Provider's risk band.
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Hops to the nearest flagged address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_hops: Option<u32>,
    /// Flagged addresses linked to the subject.
    #[serde(default)]
    pub malicious_addresses_found: Vec<Evidence>,
    /// Provider's explanation of the score.
    #[serde(default)]
    pub reasoning: String,
}

impl RiskAssessment {
    /// Whether the score lies in the provider's documented range.
    pub fn score_in_range(&self) -> bool {
        (MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&self.risk_score)
    }
}

/// Gateway decision for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskVerdict {
    /// Screened address.
    pub address: String,
    /// Provider risk score, 1..=10.
    pub risk_score: u8,
    /// Risk band, from the provider label or derived from the score.
    pub risk_level: RiskLevel,
    /// Sanction decision under the gateway's policy.
    pub is_sanctioned: bool,
    /// `risk_score <= threshold && !is_sanctioned`.
    pub is_compliant: bool,
    /// Threshold in force when the verdict was made.
    pub threshold: u8,
    /// Provider reasoning.
    pub reasoning: String,
    /// Evidence the verdict was based on.
    pub evidence: Vec<Evidence>,
}
