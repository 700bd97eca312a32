//! Proof container and its portable representation.

use serde::{Deserialize, Serialize};

/// A proof with its disclosed public inputs.
///
/// The portable form is three parts: proof bytes in order, public inputs as
/// an ordered string list, and a flag telling real proofs from placeholders.
/// Conversion in either direction is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Proof payload.
    pub bytes: Vec<u8>,
    /// Public inputs in circuit order.
    pub public_inputs: Vec<String>,
    /// `true` if produced by a real proving backend.
    pub is_real: bool,
}

impl Proof {
    /// Reassemble a proof from its portable parts.
    pub fn from_parts(bytes: Vec<u8>, public_inputs: Vec<String>, is_real: bool) -> Self {
        Self {
            bytes,
            public_inputs,
            is_real,
        }
    }

    /// Split into portable parts.
    pub fn into_parts(self) -> (Vec<u8>, Vec<String>, bool) {
        (self.bytes, self.public_inputs, self.is_real)
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex rendering of the payload, for logs and display.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}
