//! Risk-scoring provider seam and its HTTP implementation.
//!
//! ## Wire Contract
//!
//! | Method | Path | Query | Response |
//! |--------|------|-------|----------|
//! | GET | `/v1/risk/address` | `address`, `network` | [`RiskAssessment`] |
//!
//! Authentication is a bearer token. Connection failures and timeouts are
//! retried with backoff; any non-2xx status or undecodable body is a [`ProviderError`]
//! and is not retried. A score outside 1..=10 is treated as malformed.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::RiskApiConfig;
use crate::error::ProviderError;
use crate::retry::{retry_send, RetryPolicy};
use crate::risk::RiskAssessment;

/// Path of the address risk endpoint.
const RISK_PATH: &str = "v1/risk/address";

/// Source of risk assessments for addresses.
#[async_trait]
pub trait RiskProvider: Send + Sync {
    /// Fetch the risk assessment for `address`.
    async fn assess(&self, address: &str) -> Result<RiskAssessment, ProviderError>;
}

/// Risk provider reached over authenticated HTTP.
#[derive(Debug, Clone)]
pub struct HttpRiskProvider {
    http: reqwest::Client,
    base_url: Url,
    network: String,
    retry: RetryPolicy,
}

impl HttpRiskProvider {
    /// Build a client from configuration.
    pub fn new(config: RiskApiConfig) -> Result<Self, ProviderError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| ProviderError::Unavailable("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            network: config.network,
            retry: RetryPolicy::default(),
        })
    }

    /// Build a client from `VEIL_RISK_*` environment variables.
    pub fn from_env() -> Result<Self, crate::error::ComplianceError> {
        Ok(Self::new(RiskApiConfig::from_env()?)?)
    }

    /// Chain identifier sent with each query.
    pub fn network(&self) -> &str {
        &self.network
    }

    fn endpoint_url(&self) -> Result<Url, ProviderError> {
        self.base_url
            .join(RISK_PATH)
            .map_err(|e| ProviderError::Unavailable(format!("bad base URL: {e}")))
    }
}

#[async_trait]
impl RiskProvider for HttpRiskProvider {
    async fn assess(&self, address: &str) -> Result<RiskAssessment, ProviderError> {
        let endpoint = format!("GET /{RISK_PATH}");
        let url = self.endpoint_url()?;

        let resp = retry_send(self.retry, || {
            self.http
                .get(url.clone())
                .query(&[("address", address), ("network", self.network.as_str())])
                .send()
        })
        .await
        .map_err(|e| ProviderError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(ProviderError::Api {
                endpoint,
                status,
                body,
            });
        }

        let assessment: RiskAssessment =
            resp.json()
                .await
                .map_err(|e| ProviderError::Deserialization {
                    endpoint,
                    source: e,
                })?;

        if !assessment.score_in_range() {
            return Err(ProviderError::Malformed(format!(
                "risk_score {} outside 1..=10",
                assessment.risk_score
            )));
        }

        tracing::debug!(
            risk_score = assessment.risk_score,
            evidence = assessment.malicious_addresses_found.len(),
            "risk assessment received"
        );
        Ok(assessment)
    }
}
