//! Compliance configuration.
//!
//! Two independent pieces: [`RiskApiConfig`] for reaching the risk-scoring
//! provider and [`ComplianceConfig`] for the gateway's own decision
//! parameters. Both load from environment variables with defaults.

use url::Url;

/// Default risk threshold: scores above this are non-compliant.
pub const DEFAULT_THRESHOLD: u8 = 5;

/// Default number of concurrent provider queries in a batch window.
pub const DEFAULT_BATCH_WINDOW: usize = 5;

/// Connection settings for the risk-scoring provider.
///
/// Custom `Debug` implementation redacts the `api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct RiskApiConfig {
    /// Provider base URL.
    /// Default: <https://api.range.org>
    pub base_url: Url,
    /// Bearer token for API authentication.
    pub api_key: String,
    /// Chain identifier sent with every query.
    pub network: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RiskApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("network", &self.network)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RiskApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `VEIL_RISK_API_URL` (default: `https://api.range.org`)
    /// - `VEIL_RISK_API_KEY` (required)
    /// - `VEIL_RISK_NETWORK` (default: `solana`)
    /// - `VEIL_RISK_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            std::env::var("VEIL_RISK_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            base_url: env_url("VEIL_RISK_API_URL", "https://api.range.org")?,
            api_key,
            network: std::env::var("VEIL_RISK_NETWORK").unwrap_or_else(|_| "solana".into()),
            timeout_secs: std::env::var("VEIL_RISK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?,
            api_key: api_key.to_string(),
            network: "solana".into(),
            timeout_secs: 5,
        })
    }
}

/// Gateway decision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceConfig {
    /// Highest risk score still considered compliant, 1..=10.
    pub threshold: u8,
    /// Concurrent provider queries per batch window.
    pub batch_window: usize,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            batch_window: DEFAULT_BATCH_WINDOW,
        }
    }
}

impl ComplianceConfig {
    /// Load from `VEIL_RISK_THRESHOLD` and `VEIL_BATCH_WINDOW`.
    ///
    /// Unparseable or out-of-range values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let threshold = lookup("VEIL_RISK_THRESHOLD")
            .and_then(|s| s.trim().parse::<u8>().ok())
            .filter(|t| (1..=10).contains(t))
            .unwrap_or(defaults.threshold);
        let batch_window = lookup("VEIL_BATCH_WINDOW")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|w| *w > 0)
            .unwrap_or(defaults.batch_window);
        Self {
            threshold,
            batch_window,
        }
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("VEIL_RISK_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
