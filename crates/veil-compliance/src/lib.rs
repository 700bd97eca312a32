//! # veil-compliance: Address Screening
//!
//! Decides whether a wallet may take part in a private transfer.
//!
//! - [`RiskProvider`] is the seam to the external risk-scoring service.
//!   [`HttpRiskProvider`] is the authenticated HTTP client for it, with
//!   retry on transport failures.
//! - [`SanctionPolicy`] holds the sanction heuristics (category keywords on
//!   direct evidence, and optionally "maximum score means sanctioned").
//! - [`ComplianceGateway`] combines both into a [`RiskVerdict`] with a
//!   per-instance risk threshold, and screens batches in bounded
//!   concurrency windows.
//!
//! Screening fails closed: a provider error is returned to the caller and
//! never replaced by a default verdict.

pub mod config;
pub mod error;
pub mod gateway;
pub mod policy;
pub mod provider;
pub(crate) mod retry;
pub mod risk;

pub use config::{ComplianceConfig, ConfigError, RiskApiConfig};
pub use error::{ComplianceError, ProviderError};
pub use gateway::ComplianceGateway;
pub use policy::SanctionPolicy;
pub use provider::{HttpRiskProvider, RiskProvider};
pub use risk::{Evidence, RiskAssessment, RiskLevel, RiskVerdict};
