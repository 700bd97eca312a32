//! Errors raised by the fragmentation pipeline.

use thiserror::Error;
use veil_core::{Amount, StateError};

/// Error from splitting, scheduling, or releasing fragments.
#[derive(Error, Debug)]
pub enum MixerError {
    /// Fragment count bounds are empty or out of range.
    #[error("invalid fragment count bounds {min}..={max} (allowed 1..={limit})")]
    InvalidFragmentCount {
        /// Requested lower bound.
        min: usize,
        /// Requested upper bound.
        max: usize,
        /// Largest count the splitter accepts.
        limit: usize,
    },

    /// Split output does not sum to the requested total. Indicates a bug.
    #[error("conservation violated: expected {expected}, fragments sum to {actual}")]
    ConservationViolation {
        /// The requested total.
        expected: Amount,
        /// The sum actually produced.
        actual: Amount,
    },

    /// A fragment came out zero. Indicates a bug.
    #[error("fragment {index} is not strictly positive")]
    NonPositiveFragment {
        /// Position of the offending fragment.
        index: usize,
    },

    /// Cannot split a zero total.
    #[error("cannot fragment a zero amount")]
    ZeroTotal,

    /// The derivation index space under this seed is exhausted.
    #[error("address index overflow: start {start} + {count} fragments exceeds u32")]
    IndexExhausted {
        /// First requested index.
        start: u32,
        /// Number of fragments requested.
        count: usize,
    },

    /// A release time falls outside the representable date range.
    #[error("release time out of range: {0}")]
    TimeOverflow(&'static str),

    /// A withdrawal lifecycle transition was rejected.
    #[error(transparent)]
    State(#[from] StateError),

    /// The transfer network rejected or failed a release.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Failure reported by the external transfer network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The network could not be reached or timed out.
    #[error("transfer network unavailable: {0}")]
    Unavailable(String),

    /// The network refused the operation.
    #[error("transfer rejected: {0}")]
    Rejected(String),

    /// Sender balance does not cover the transfer.
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        /// Amount the operation required.
        needed: Amount,
        /// Amount available to the sender.
        available: Amount,
    },
}
