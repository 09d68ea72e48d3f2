//! Marketplace events
//!
//! Events are immutable records appended by engine operations after
//! their state mutations and asset movements have completed. The facade
//! keeps them in an append-only log that callers can inspect or drain.

use serde::{Deserialize, Serialize};
use types::amount::Amount;
use types::ids::{Address, ItemId, QuoteToken};

/// A quote token was added to the whitelist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTokenAdded {
    pub token: QuoteToken,
}

/// A quote token was removed from the whitelist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTokenRemoved {
    pub token: QuoteToken,
}

/// An item was listed for sale and taken into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listed {
    pub item: ItemId,
    pub seller: Address,
    pub price: Amount,
    pub quote_token: QuoteToken,
    pub recipient: Address,
}

/// The seller changed the asking price of a listed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub item: ItemId,
    pub seller: Address,
    pub price: Amount,
}

/// A listing was cancelled and the item returned to its seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delisted {
    pub item: ItemId,
    pub seller: Address,
}

/// A completing sale: fixed-price purchase or accepted bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traded {
    pub item: ItemId,
    pub seller: Address,
    pub buyer: Address,
    pub recipient: Address,
    pub price: Amount,
    pub quote_token: QuoteToken,
}

/// A bid was placed and its price escrowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPlaced {
    pub item: ItemId,
    pub bidder: Address,
    pub price: Amount,
    pub quote_token: QuoteToken,
}

/// A bidder changed the price of a standing bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPriceUpdated {
    pub item: ItemId,
    pub bidder: Address,
    pub previous_price: Amount,
    pub price: Amount,
}

/// A bid was cancelled and its escrowed funds refunded in full
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidCancelled {
    pub item: ItemId,
    pub bidder: Address,
    pub refunded: Amount,
}

/// Enum wrapper for all marketplace events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    QuoteTokenAdded(QuoteTokenAdded),
    QuoteTokenRemoved(QuoteTokenRemoved),
    Listed(Listed),
    PriceUpdated(PriceUpdated),
    Delisted(Delisted),
    Traded(Traded),
    BidPlaced(BidPlaced),
    BidPriceUpdated(BidPriceUpdated),
    BidCancelled(BidCancelled),
}
