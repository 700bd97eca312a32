//! # Fixed-Point Amounts
//!
//! `Amount` counts units of 10^-4 in a `u64`. Four decimals is the engine's
//! configured precision: fragments carry hundredths-of-a-cent noise, and the
//! conservation invariant `sum(fragments) == total` is checked on the integer
//! unit count, never on floats.
//!
//! ## Serde
//!
//! Amounts serialize as decimal strings (`"12.3456"`) so that no float ever
//! appears in a serialized payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Number of decimal places carried by [`Amount`].
pub const AMOUNT_DECIMALS: u32 = 4;

/// Units per whole token (`10^AMOUNT_DECIMALS`).
pub const UNITS_PER_WHOLE: u64 = 10_000;

/// A non-negative token amount with 4 decimal places of precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a raw unit count (1 unit = 0.0001).
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Raw unit count.
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Lossy conversion to `f64`, used only inside weighting math.
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / UNITS_PER_WHOLE as f64
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Sum a sequence of amounts, returning `None` on overflow.
    pub fn checked_sum<'a, I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = &'a Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(*a))
    }

    /// Parse a decimal string such as `"12"`, `"0.5"` or `"1000.0001"`.
    ///
    /// Rejects signs, exponents, empty components, and more than
    /// [`AMOUNT_DECIMALS`] fractional digits.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        if s.is_empty() {
            return Err(invalid("empty"));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("whole part must be ASCII digits"));
        }
        if s.contains('.') && frac.is_empty() {
            return Err(invalid("fractional part must not be empty"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("fractional part must be ASCII digits"));
        }
        if frac.len() > AMOUNT_DECIMALS as usize {
            return Err(invalid("more than 4 fractional digits"));
        }

        let whole_units = whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(UNITS_PER_WHOLE))
            .ok_or_else(|| invalid("overflow"))?;

        let mut frac_units: u64 = 0;
        for (i, b) in frac.bytes().enumerate() {
            let digit = u64::from(b - b'0');
            frac_units += digit * 10u64.pow(AMOUNT_DECIMALS - 1 - i as u32);
        }

        whole_units
            .checked_add(frac_units)
            .map(Amount)
            .ok_or_else(|| invalid("overflow"))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:04}",
            self.0 / UNITS_PER_WHOLE,
            self.0 % UNITS_PER_WHOLE
        )
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
