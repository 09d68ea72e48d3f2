//! Marketplace error taxonomy
//!
//! Two layers, composed the same way custody errors wrap ledger errors:
//! `LedgerError` covers the external registry/ledger boundary (declined
//! pulls, unknown items, arithmetic), `MarketError` covers order-book
//! state and authorization. Every operation is all-or-nothing: an error
//! means no state was mutated and no asset moved.

use thiserror::Error;
use types::ids::ItemId;

/// Errors raised at the item-registry / currency-ledger boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds in {token}: required {required}, available {available}")]
    InsufficientFunds {
        token: String,
        required: String,
        available: String,
    },

    #[error("Insufficient allowance in {token}: required {required}, approved {approved}")]
    InsufficientAllowance {
        token: String,
        required: String,
        approved: String,
    },

    #[error("Unknown item: {item}")]
    UnknownItem { item: ItemId },

    #[error("Transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Errors raised by marketplace operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Quote token not supported: {token}")]
    InvalidCurrency { token: String },

    #[error("Item already listed: {item}")]
    DuplicateAsk { item: ItemId },

    #[error("Item not listed: {item}")]
    NoSuchAsk { item: ItemId },

    #[error("Only the seller may perform this operation on item {item}")]
    NotSeller { item: ItemId },

    #[error("Bidder {bidder} already has an active bid on item {item}")]
    DuplicateBid { item: ItemId, bidder: String },

    #[error("No active bid from {bidder} on item {item}")]
    NoSuchBid { item: ItemId, bidder: String },

    #[error("Caller {caller} does not own item {item}")]
    NotItemOwner { item: ItemId, caller: String },

    #[error("Invalid fee configuration: platform {platform_percent}% + creator {creator_percent}% exceeds 100%")]
    FeeConfigurationInvalid {
        platform_percent: u8,
        creator_percent: u8,
    },

    #[error("Unauthorized: caller is not the operator")]
    Unauthorized,

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::InsufficientFunds {
            token: "BUSD".to_string(),
            required: "100".to_string(),
            available: "40".to_string(),
        };
        assert!(err.to_string().contains("BUSD"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_market_error_display() {
        let err = MarketError::DuplicateAsk {
            item: ItemId::new(3),
        };
        assert_eq!(err.to_string(), "Item already listed: 3");
    }

    #[test]
    fn test_market_error_from_ledger() {
        let ledger_err = LedgerError::Overflow;
        let market_err: MarketError = ledger_err.clone().into();
        assert_eq!(market_err, MarketError::Ledger(ledger_err));
    }

    #[test]
    fn test_transparent_display_passthrough() {
        let err: MarketError = LedgerError::TransferFailed {
            reason: "registry declined".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Transfer failed: registry declined");
    }
}
