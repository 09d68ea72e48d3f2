//! Bid book — at most one standing offer per (item, bidder) pair
//!
//! A bid is backed by escrowed funds equal to its current price at all
//! times; the facade moves exactly the delta on a price change and the
//! full amount on cancel or settlement. One bid winning a sale leaves
//! every other bid on the item untouched.

use crate::errors::MarketError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::amount::Amount;
use types::ids::{Address, ItemId, QuoteToken};

/// A standing offer to buy a specific item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub item: ItemId,
    pub bidder: Address,
    pub price: Amount,
    pub quote_token: QuoteToken,
}

/// The set of active bids.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    /// Bids per item in placement order
    by_item: HashMap<ItemId, Vec<Bid>>,
    /// Items each bidder has placed bids on, in placement order
    bidder_order: HashMap<Address, Vec<ItemId>>,
}

impl BidBook {
    /// Create an empty bid book
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new bid. Fails with `DuplicateBid` if this bidder
    /// already has an active bid on the item.
    pub fn place(
        &mut self,
        item: ItemId,
        bidder: Address,
        price: Amount,
        quote_token: QuoteToken,
    ) -> Result<&Bid, MarketError> {
        if self.get(item, &bidder).is_some() {
            return Err(MarketError::DuplicateBid {
                item,
                bidder: bidder.to_string(),
            });
        }

        self.bidder_order
            .entry(bidder.clone())
            .or_default()
            .push(item);
        let bids = self.by_item.entry(item).or_default();
        bids.push(Bid {
            item,
            bidder,
            price,
            quote_token,
        });
        Ok(bids.last().expect("bid just pushed"))
    }

    /// Change a bid's price, returning the previous price so the
    /// caller can move the escrow delta.
    pub fn update_price(
        &mut self,
        item: ItemId,
        bidder: &Address,
        new_price: Amount,
    ) -> Result<Amount, MarketError> {
        let bid = self
            .by_item
            .get_mut(&item)
            .and_then(|bids| bids.iter_mut().find(|b| b.bidder == *bidder))
            .ok_or_else(|| MarketError::NoSuchBid {
                item,
                bidder: bidder.to_string(),
            })?;
        let previous = bid.price;
        bid.price = new_price;
        Ok(previous)
    }

    /// Remove a bid on the bidder's behalf, returning it so the full
    /// escrowed amount can be refunded.
    pub fn cancel(&mut self, item: ItemId, bidder: &Address) -> Result<Bid, MarketError> {
        self.remove(item, bidder)
    }

    /// Remove the named bidder's bid as the winning bid of a sale.
    ///
    /// Seller authorization is checked by the facade against the ask.
    /// All other bids on the item stay live with their escrow.
    pub fn take_winning(&mut self, item: ItemId, bidder: &Address) -> Result<Bid, MarketError> {
        self.remove(item, bidder)
    }

    fn remove(&mut self, item: ItemId, bidder: &Address) -> Result<Bid, MarketError> {
        let bids = self
            .by_item
            .get_mut(&item)
            .ok_or_else(|| MarketError::NoSuchBid {
                item,
                bidder: bidder.to_string(),
            })?;
        let position =
            bids.iter()
                .position(|b| b.bidder == *bidder)
                .ok_or_else(|| MarketError::NoSuchBid {
                    item,
                    bidder: bidder.to_string(),
                })?;
        let bid = bids.remove(position);
        if bids.is_empty() {
            self.by_item.remove(&item);
        }
        if let Some(items) = self.bidder_order.get_mut(bidder) {
            items.retain(|i| *i != item);
            if items.is_empty() {
                self.bidder_order.remove(bidder);
            }
        }
        Ok(bid)
    }

    /// Get a specific bid, if any
    pub fn get(&self, item: ItemId, bidder: &Address) -> Option<&Bid> {
        self.by_item
            .get(&item)?
            .iter()
            .find(|b| b.bidder == *bidder)
    }

    /// Bids on an item in placement order
    pub fn bids_for_item(&self, item: ItemId) -> &[Bid] {
        self.by_item.get(&item).map_or(&[], Vec::as_slice)
    }

    /// A bidder's bids across items in placement order
    pub fn bids_for_bidder(&self, bidder: &Address) -> Vec<&Bid> {
        self.bidder_order
            .get(bidder)
            .into_iter()
            .flatten()
            .filter_map(|item| self.get(*item, bidder))
            .collect()
    }

    /// Total number of active bids
    pub fn len(&self) -> usize {
        self.by_item.values().map(Vec::len).sum()
    }

    /// Whether there are no active bids
    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty()
    }
}
