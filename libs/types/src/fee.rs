//! Fee schedule and settlement split
//!
//! Every completing sale pays a platform fee and an original-creator
//! royalty out of the trade price; the remainder goes to the seller's
//! designated recipient. Both fee components use truncating integer
//! division, so the three parts always sum back to the price exactly.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// Process-wide fee percentages, read at settlement time.
///
/// A schedule is valid when the two percentages sum to at most 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Percentage of the price paid to the platform fee address
    pub platform_percent: u8,
    /// Percentage of the price paid to the item's original creator
    pub creator_percent: u8,
}

impl FeeSchedule {
    /// Create a new fee schedule
    pub fn new(platform_percent: u8, creator_percent: u8) -> Self {
        Self {
            platform_percent,
            creator_percent,
        }
    }

    /// Check the range invariant: the percentages sum to at most 100
    pub fn is_valid(&self) -> bool {
        u16::from(self.platform_percent) + u16::from(self.creator_percent) <= 100
    }

    /// Compute the three-way split of a trade price.
    ///
    /// ```text
    /// platform_fee = floor(price * platform_percent / 100)
    /// creator_fee  = floor(price * creator_percent  / 100)
    /// proceeds     = price - platform_fee - creator_fee
    /// ```
    ///
    /// Returns `None` when the schedule is out of range or the
    /// intermediate multiplication overflows.
    pub fn split(&self, price: Amount) -> Option<FeeSplit> {
        if !self.is_valid() {
            return None;
        }
        let platform_fee = price.percent(self.platform_percent)?;
        let creator_fee = price.percent(self.creator_percent)?;
        let proceeds = price.checked_sub(platform_fee)?.checked_sub(creator_fee)?;
        Some(FeeSplit {
            platform_fee,
            creator_fee,
            proceeds,
        })
    }
}

/// The three components a settled price is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub platform_fee: Amount,
    pub creator_fee: Amount,
    pub proceeds: Amount,
}

impl FeeSplit {
    /// Sum of the three components; equals the settled price
    pub fn total(&self) -> Option<Amount> {
        self.platform_fee
            .checked_add(self.creator_fee)?
            .checked_add(self.proceeds)
    }
}
