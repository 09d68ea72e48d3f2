//! Settlement engine — fee split computation and disbursement
//!
//! On every completing sale the trade price, already sitting in escrow,
//! is divided three ways with truncating integer arithmetic and paid
//! out in exactly three releases: platform fee, creator royalty, and
//! the remainder to the seller's designated recipient. Disbursement is
//! all-or-nothing: the schedule and the custodian balance are checked
//! before the first release.

use crate::errors::{LedgerError, MarketError};
use crate::escrow::EscrowLedger;
use crate::ledger::CurrencyLedger;
use serde::{Deserialize, Serialize};
use types::amount::Amount;
use types::fee::{FeeSchedule, FeeSplit};
use types::ids::{Address, ItemId, QuoteToken, RecordId};

/// Audit record of one completed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub settlement_id: RecordId,
    pub item: ItemId,
    pub quote_token: QuoteToken,
    pub price: Amount,
    pub split: FeeSplit,
    pub platform: Address,
    pub creator: Address,
    pub recipient: Address,
}

/// Computes and executes the three-way fee split.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    fee_address: Address,
    schedule: FeeSchedule,
}

impl SettlementEngine {
    /// Create an engine paying platform fees to `fee_address`
    pub fn new(fee_address: Address, schedule: FeeSchedule) -> Self {
        Self {
            fee_address,
            schedule,
        }
    }

    /// The platform fee address
    pub fn fee_address(&self) -> &Address {
        &self.fee_address
    }

    /// The current fee schedule
    pub fn schedule(&self) -> FeeSchedule {
        self.schedule
    }

    /// Replace the fee schedule; rejects out-of-range percentages.
    pub fn set_schedule(&mut self, schedule: FeeSchedule) -> Result<(), MarketError> {
        if !schedule.is_valid() {
            return Err(MarketError::FeeConfigurationInvalid {
                platform_percent: schedule.platform_percent,
                creator_percent: schedule.creator_percent,
            });
        }
        self.schedule = schedule;
        Ok(())
    }

    /// Defensive range re-check, performed again at settlement time
    /// even though `set_schedule` prevents invalid configurations.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.schedule.is_valid() {
            Ok(())
        } else {
            Err(MarketError::FeeConfigurationInvalid {
                platform_percent: self.schedule.platform_percent,
                creator_percent: self.schedule.creator_percent,
            })
        }
    }

    /// Compute the split for a price under the current schedule.
    pub fn split(&self, price: Amount) -> Result<FeeSplit, MarketError> {
        self.validate()?;
        self.schedule
            .split(price)
            .ok_or(MarketError::Ledger(LedgerError::Overflow))
    }

    /// Disburse an escrowed trade price.
    ///
    /// The full `price` must already be held by the escrow custodian.
    /// Performs exactly three releases: platform fee to the fee
    /// address, creator royalty to `creator`, proceeds to `recipient`.
    #[allow(clippy::too_many_arguments)]
    pub fn settle(
        &self,
        escrow: &mut EscrowLedger,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        quote_token: &QuoteToken,
        price: Amount,
        creator: &Address,
        recipient: &Address,
    ) -> Result<Settlement, MarketError> {
        let split = self.split(price)?;

        // All-or-nothing: the custodian must be able to cover every
        // release before the first one is issued.
        let held = ledger.balance_of(quote_token, escrow.custodian());
        if held < price {
            return Err(MarketError::Ledger(LedgerError::InsufficientFunds {
                token: quote_token.to_string(),
                required: price.to_string(),
                available: held.to_string(),
            }));
        }

        escrow.release_funds(
            ledger,
            &self.fee_address,
            split.platform_fee,
            quote_token,
            "platform fee",
        )?;
        escrow.release_funds(
            ledger,
            creator,
            split.creator_fee,
            quote_token,
            "creator royalty",
        )?;
        escrow.release_funds(ledger, recipient, split.proceeds, quote_token, "sale proceeds")?;

        Ok(Settlement {
            settlement_id: RecordId::new(),
            item,
            quote_token: quote_token.clone(),
            price,
            split,
            platform: self.fee_address.clone(),
            creator: creator.clone(),
            recipient: recipient.clone(),
        })
    }
}
