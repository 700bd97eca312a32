//! # veil-core: Foundational Types for the Veil Engine
//!
//! Leaf crate of the Veil workspace. Defines the primitives every other
//! crate agrees on:
//!
//! 1. **`Amount`**: a fixed-point newtype counting units of 10^-4. Payment
//!    amounts never travel as floats between components, so sum conservation
//!    is checked in exact integer arithmetic.
//!
//! 2. **Identifier newtypes**: `WithdrawalId`, `AttestationId`. No bare
//!    strings for identifiers.
//!
//! 3. **Error taxonomy**: `ValidationError` for malformed input and
//!    `StateError` for rejected lifecycle transitions. Crate-specific errors
//!    wrap these.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veil-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod error;
pub mod identity;

pub use amount::{Amount, AMOUNT_DECIMALS, UNITS_PER_WHOLE};
pub use error::{StateError, ValidationError};
pub use identity::{AttestationId, WithdrawalId};
