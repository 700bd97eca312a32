//! Compliance error types.

use veil_core::ValidationError;

/// Failure talking to the risk-scoring provider.
///
/// The gateway never turns one of these into a verdict. A provider failure
/// is always surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport error after retries were exhausted.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Provider returned a non-2xx status.
    #[error("risk provider {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body could not be decoded.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Response decoded but violates the provider contract.
    #[error("malformed risk response: {0}")]
    Malformed(String),
    /// Provider could not serve the request for a non-HTTP reason.
    #[error("risk provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors from compliance screening.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    /// The risk provider failed. Screening fails closed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Risk threshold outside 1..=10.
    #[error("invalid risk threshold {0}: must be within 1..=10")]
    InvalidThreshold(u8),

    /// Input rejected before any provider call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
