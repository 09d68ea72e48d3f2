//! Unsigned integer money amounts
//!
//! All prices, escrowed balances, and fee components are unsigned
//! integers in the smallest unit of their quote token. Arithmetic is
//! checked: overflow surfaces as `None`, never as a wrapped value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative amount of some quote token, in smallest units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a raw value
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Check whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on overflow
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction; `None` on underflow
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Truncating percentage: `value * percent / 100`, floor.
    ///
    /// `None` only if the intermediate multiplication overflows u128.
    pub fn percent(self, percent: u8) -> Option<Amount> {
        self.0
            .checked_mul(u128::from(percent))
            .map(|scaled| Amount(scaled / 100))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}
