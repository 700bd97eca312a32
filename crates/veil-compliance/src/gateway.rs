//! # Compliance Gateway
//!
//! Turns provider risk assessments into compliance verdicts:
//!
//! ```text
//! is_sanctioned = policy.is_sanctioned(assessment)
//! is_compliant  = risk_score <= threshold && !is_sanctioned
//! ```
//!
//! The threshold and sanction policy are per-instance and can be changed at
//! runtime. They live behind a lock that is only held long enough to take a
//! snapshot, never across a provider call.
//!
//! Provider failures are surfaced. The gateway never fabricates a verdict.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use veil_core::ValidationError;

use crate::config::ComplianceConfig;
use crate::error::{ComplianceError, ProviderError};
use crate::policy::SanctionPolicy;
use crate::provider::RiskProvider;
use crate::risk::{RiskLevel, RiskVerdict, MAX_RISK_SCORE, MIN_RISK_SCORE};

#[derive(Debug, Clone)]
struct Settings {
    threshold: u8,
    policy: SanctionPolicy,
}

/// Screens addresses against a risk provider.
pub struct ComplianceGateway {
    provider: Arc<dyn RiskProvider>,
    settings: RwLock<Settings>,
    batch_window: usize,
}

impl std::fmt::Debug for ComplianceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let settings = self.settings.read();
        f.debug_struct("ComplianceGateway")
            .field("threshold", &settings.threshold)
            .field("policy", &settings.policy)
            .field("batch_window", &self.batch_window)
            .finish_non_exhaustive()
    }
}

impl ComplianceGateway {
    /// Gateway with default threshold (5), batch window (5), and policy.
    pub fn new(provider: Arc<dyn RiskProvider>) -> Self {
        let defaults = ComplianceConfig::default();
        Self {
            provider,
            settings: RwLock::new(Settings {
                threshold: defaults.threshold,
                policy: SanctionPolicy::default(),
            }),
            batch_window: defaults.batch_window,
        }
    }

    /// Gateway with explicit configuration.
    pub fn with_config(
        provider: Arc<dyn RiskProvider>,
        config: ComplianceConfig,
        policy: SanctionPolicy,
    ) -> Result<Self, ComplianceError> {
        validate_threshold(config.threshold)?;
        Ok(Self {
            provider,
            settings: RwLock::new(Settings {
                threshold: config.threshold,
                policy,
            }),
            batch_window: config.batch_window.max(1),
        })
    }

    /// Current risk threshold.
    pub fn threshold(&self) -> u8 {
        self.settings.read().threshold
    }

    /// Change the risk threshold. Must be within 1..=10.
    pub fn set_threshold(&self, threshold: u8) -> Result<(), ComplianceError> {
        validate_threshold(threshold)?;
        self.settings.write().threshold = threshold;
        tracing::info!(threshold, "compliance threshold updated");
        Ok(())
    }

    /// Current sanction policy.
    pub fn policy(&self) -> SanctionPolicy {
        self.settings.read().policy.clone()
    }

    /// Replace the sanction policy.
    pub fn set_policy(&self, policy: SanctionPolicy) {
        self.settings.write().policy = policy;
    }

    /// Concurrent queries per batch window.
    pub fn batch_window(&self) -> usize {
        self.batch_window
    }

    /// Screen one address.
    pub async fn check_compliance(&self, address: &str) -> Result<RiskVerdict, ComplianceError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::Empty { field: "address" }.into());
        }

        let Settings { threshold, policy } = self.settings.read().clone();

        let assessment = match self.provider.assess(address).await {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(error = %e, "risk provider failed, refusing to issue verdict");
                return Err(e.into());
            }
        };

        if !assessment.score_in_range() {
            return Err(ProviderError::Malformed(format!(
                "risk_score {} outside {MIN_RISK_SCORE}..={MAX_RISK_SCORE}",
                assessment.risk_score
            ))
            .into());
        }

        let is_sanctioned = policy.is_sanctioned(&assessment);
        let is_compliant = assessment.risk_score <= threshold && !is_sanctioned;

        tracing::info!(
            risk_score = assessment.risk_score,
            threshold,
            is_sanctioned,
            is_compliant,
            "compliance verdict"
        );

        let risk_level = if assessment.risk_level.is_unlabelled() {
            RiskLevel::from_score(assessment.risk_score)
        } else {
            assessment.risk_level
        };

        Ok(RiskVerdict {
            address: address.to_string(),
            risk_score: assessment.risk_score,
            risk_level,
            is_sanctioned,
            is_compliant,
            threshold,
            reasoning: assessment.reasoning,
            evidence: assessment.malicious_addresses_found,
        })
    }

    /// Screen many addresses, `batch_window` at a time.
    ///
    /// Results come back in input order, each paired with its address
    /// (trimmed, as in the verdict). One address failing does not affect the
    /// others.
    pub async fn check_batch<S>(
        &self,
        addresses: &[S],
    ) -> Vec<(String, Result<RiskVerdict, ComplianceError>)>
    where
        S: AsRef<str>,
    {
        let mut results = Vec::with_capacity(addresses.len());
        for window in addresses.chunks(self.batch_window) {
            let verdicts = join_all(window.iter().map(|a| self.check_compliance(a.as_ref()))).await;
            results.extend(
                window
                    .iter()
                    .map(|a| a.as_ref().trim().to_string())
                    .zip(verdicts),
            );
        }
        tracing::debug!(addresses = results.len(), "batch screening complete");
        results
    }
}

fn validate_threshold(threshold: u8) -> Result<(), ComplianceError> {
    if (MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&threshold) {
        Ok(())
    } else {
        Err(ComplianceError::InvalidThreshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{Evidence, RiskAssessment};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Provider serving canned assessments, tracking peak concurrency.
    #[derive(Default)]
    struct StubProvider {
        table: HashMap<String, RiskAssessment>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StubProvider {
        fn with(mut self, address: &str, score: u8, evidence: Vec<(u32, &str)>) -> Self {
            self.table.insert(
                address.to_string(),
                RiskAssessment {
                    risk_score: score,
                    risk_level: RiskLevel::default(),
                    num_hops: None,
                    malicious_addresses_found: evidence
                        .into_iter()
                        .map(|(distance, category)| Evidence {
                            address: "bad".into(),
                            distance,
                            name_tag: None,
                            entity: None,
                            category: category.into(),
                        })
                        .collect(),
                    reasoning: "stub".into(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl RiskProvider for StubProvider {
        async fn assess(&self, address: &str) -> Result<RiskAssessment, ProviderError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.table
                .get(address)
                .cloned()
                .ok_or_else(|| ProviderError::Unavailable(format!("no data for {address}")))
        }
    }

    fn gateway(stub: StubProvider) -> ComplianceGateway {
        ComplianceGateway::new(Arc::new(stub))
    }

    #[tokio::test]
    async fn low_risk_clean_address_is_compliant() {
        let gw = gateway(StubProvider::default().with("clean", 3, vec![]));
        let v = gw.check_compliance("clean").await.unwrap();
        assert!(v.is_compliant);
        assert!(!v.is_sanctioned);
        assert_eq!(v.threshold, 5);
    }

    #[tokio::test]
    async fn missing_label_is_derived_from_score() {
        let gw = gateway(StubProvider::default().with("hot", 8, vec![]));
        let v = gw.check_compliance("hot").await.unwrap();
        assert_eq!(v.risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn score_at_threshold_is_compliant_above_is_not() {
        let gw = gateway(StubProvider::default().with("five", 5, vec![]).with("six", 6, vec![]));
        assert!(gw.check_compliance("five").await.unwrap().is_compliant);
        assert!(!gw.check_compliance("six").await.unwrap().is_compliant);
    }

    #[tokio::test]
    async fn max_score_is_never_compliant() {
        let gw = gateway(StubProvider::default().with("hot", 10, vec![]));
        gw.set_threshold(10).unwrap();
        let v = gw.check_compliance("hot").await.unwrap();
        assert!(v.is_sanctioned);
        assert!(!v.is_compliant);
    }

    #[tokio::test]
    async fn distant_evidence_does_not_sanction() {
        let gw = gateway(StubProvider::default().with("near", 4, vec![(2, "OFAC SDN")]));
        let v = gw.check_compliance("near").await.unwrap();
        assert!(!v.is_sanctioned);
        assert!(v.is_compliant);
        assert_eq!(v.evidence.len(), 1);
    }

    #[tokio::test]
    async fn direct_sanction_evidence_overrides_low_score() {
        let gw = gateway(StubProvider::default().with("sdn", 2, vec![(0, "Sanctioned entity")]));
        let v = gw.check_compliance("sdn").await.unwrap();
        assert!(v.is_sanctioned);
        assert!(!v.is_compliant);
    }

    #[tokio::test]
    async fn provider_failure_fails_closed() {
        let gw = gateway(StubProvider::default());
        let err = gw.check_compliance("unknown").await.unwrap_err();
        assert!(matches!(err, ComplianceError::Provider(_)));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let gw = gateway(StubProvider::default().with("zero", 0, vec![]));
        let err = gw.check_compliance("zero").await.unwrap_err();
        assert!(matches!(err, ComplianceError::Provider(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn empty_address_is_rejected_before_provider_call() {
        let stub = Arc::new(StubProvider::default());
        let gw = ComplianceGateway::new(stub.clone());
        let err = gw.check_compliance("  ").await.unwrap_err();
        assert!(matches!(err, ComplianceError::Validation(_)));
        assert_eq!(stub.peak.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn threshold_bounds_are_enforced() {
        let gw = gateway(StubProvider::default());
        assert!(matches!(gw.set_threshold(0), Err(ComplianceError::InvalidThreshold(0))));
        assert!(matches!(gw.set_threshold(11), Err(ComplianceError::InvalidThreshold(11))));
        gw.set_threshold(1).unwrap();
        assert_eq!(gw.threshold(), 1);
        assert!(ComplianceGateway::with_config(
            Arc::new(StubProvider::default()),
            ComplianceConfig { threshold: 0, batch_window: 5 },
            SanctionPolicy::default(),
        )
        .is_err());
    }

    #[tokio::test]
    async fn lenient_policy_allows_max_score_when_threshold_allows() {
        let gw = gateway(StubProvider::default().with("hot", 10, vec![]));
        gw.set_threshold(10).unwrap();
        gw.set_policy(SanctionPolicy::new(["ofac"], false));
        assert!(gw.check_compliance("hot").await.unwrap().is_compliant);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_isolates_failures() {
        let stub = StubProvider::default()
            .with("a", 1, vec![])
            .with("b", 9, vec![])
            .with("d", 2, vec![(0, "OFAC")]);
        let gw = gateway(stub);

        let results = gw.check_batch(&["a", "b", "c", "d"]).await;
        let addrs: Vec<&str> = results.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(addrs, vec!["a", "b", "c", "d"]);

        assert!(results[0].1.as_ref().unwrap().is_compliant);
        assert!(!results[1].1.as_ref().unwrap().is_compliant);
        assert!(results[2].1.is_err());
        assert!(results[3].1.as_ref().unwrap().is_sanctioned);
        for (addr, res) in &results {
            if let Ok(v) = res {
                assert_eq!(&v.address, addr);
            }
        }
    }

    #[tokio::test]
    async fn batch_concurrency_is_bounded_by_window() {
        let mut stub = StubProvider::default();
        for i in 0..12 {
            stub = stub.with(&format!("addr{i}"), 3, vec![]);
        }
        let stub = Arc::new(stub);
        let gw = ComplianceGateway::with_config(
            stub.clone(),
            ComplianceConfig { threshold: 5, batch_window: 3 },
            SanctionPolicy::default(),
        )
        .unwrap();

        let addrs: Vec<String> = (0..12).map(|i| format!("addr{i}")).collect();
        let results = gw.check_batch(&addrs).await;
        assert_eq!(results.len(), 12);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert!(stub.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn batch_keys_match_verdict_addresses() {
        let gw = gateway(StubProvider::default().with("a", 2, vec![]));
        let results = gw.check_batch(&[" a", "a\t", "  "]).await;

        assert_eq!(results[0].0, "a");
        assert_eq!(results[1].0, "a");
        for (addr, res) in &results[..2] {
            assert_eq!(&res.as_ref().unwrap().address, addr);
        }
        assert_eq!(results[2].0, "");
        assert!(matches!(results[2].1, Err(ComplianceError::Validation(_))));
    }

    #[tokio::test]
    async fn verdict_matches_regardless_of_batch_position() {
        let stub = StubProvider::default()
            .with("x", 4, vec![])
            .with("y", 7, vec![])
            .with("z", 5, vec![(1, "sanctions")]);
        let gw = gateway(stub);
        let single = gw.check_compliance("z").await.unwrap();
        let batch = gw.check_batch(&["y", "x", "z"]).await;
        assert_eq!(batch[2].1.as_ref().unwrap(), &single);
    }
}
