//! # Error Types
//!
//! Shared error types used across the Veil workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! - Validation errors name the offending field and the violated bound.
//!   They are raised before any external call is made and are never retried.
//! - State errors include the current state, attempted transition, and
//!   rejection reason.

use thiserror::Error;

/// Malformed or out-of-range input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A numeric field lies outside its permitted range.
    #[error("{field} out of range: must be within {min}..={max}, got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// A value is below a caller-supplied minimum.
    #[error("{field} {value} is below minimum {minimum}")]
    BelowMinimum {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// The minimum it had to reach.
        minimum: i64,
    },

    /// A value exceeds a caller-supplied maximum.
    #[error("{field} {value} exceeds maximum {maximum}")]
    AboveMaximum {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// The maximum it had to stay within.
        maximum: i64,
    },

    /// The subject is sanctioned and cannot satisfy a disclosure predicate.
    #[error("subject is sanctioned")]
    Sanctioned,

    /// A decimal amount string could not be parsed.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// The rejected input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A required field was empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the empty field.
        field: &'static str,
    },
}

/// Error in lifecycle state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Attempted an invalid state transition.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
        /// Reason the transition was rejected.
        reason: String,
    },
}
