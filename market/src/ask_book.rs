//! Ask book — one active listing per item
//!
//! An ask is a standing public offer to sell at a fixed price in a
//! chosen quote token. The item sits in marketplace custody for the
//! lifetime of its ask. Listing order is insertion order; no ordering
//! by price or time is implied beyond that.

use crate::errors::MarketError;
use crate::quote_tokens::QuoteTokenRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::amount::Amount;
use types::ids::{Address, ItemId, QuoteToken};

/// A standing listing for a single item.
///
/// `recipient` receives the sale proceeds and may differ from the
/// seller, enabling gifted sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ask {
    pub item: ItemId,
    pub seller: Address,
    pub price: Amount,
    pub quote_token: QuoteToken,
    pub recipient: Address,
}

/// The set of active asks, at most one per item.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    asks: HashMap<ItemId, Ask>,
    /// Listing order (insertion order of currently active asks)
    order: Vec<ItemId>,
}

impl AskBook {
    /// Create an empty ask book
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new ask.
    ///
    /// Fails with `InvalidCurrency` if the quote token is not
    /// whitelisted, and with `DuplicateAsk` if the item already has an
    /// active ask.
    pub fn create(
        &mut self,
        registry: &QuoteTokenRegistry,
        item: ItemId,
        seller: Address,
        price: Amount,
        quote_token: QuoteToken,
        recipient: Address,
    ) -> Result<&Ask, MarketError> {
        if !registry.contains(&quote_token) {
            return Err(MarketError::InvalidCurrency {
                token: quote_token.to_string(),
            });
        }
        if self.asks.contains_key(&item) {
            return Err(MarketError::DuplicateAsk { item });
        }

        self.order.push(item);
        let ask = self.asks.entry(item).or_insert(Ask {
            item,
            seller,
            price,
            quote_token,
            recipient,
        });
        Ok(ask)
    }

    /// Change the asking price. Seller-only; price is the only mutable field.
    pub fn update_price(
        &mut self,
        item: ItemId,
        caller: &Address,
        new_price: Amount,
    ) -> Result<&Ask, MarketError> {
        let ask = self
            .asks
            .get_mut(&item)
            .ok_or(MarketError::NoSuchAsk { item })?;
        if ask.seller != *caller {
            return Err(MarketError::NotSeller { item });
        }
        ask.price = new_price;
        Ok(ask)
    }

    /// Remove a listing on the seller's behalf, returning the ask so
    /// the facade can release the item back to the seller.
    pub fn cancel(&mut self, item: ItemId, caller: &Address) -> Result<Ask, MarketError> {
        let ask = self.asks.get(&item).ok_or(MarketError::NoSuchAsk { item })?;
        if ask.seller != *caller {
            return Err(MarketError::NotSeller { item });
        }
        Ok(self.remove(item))
    }

    /// Remove a listing for a completing sale, returning the ask.
    ///
    /// No seller check: an ask price is a standing public offer, so any
    /// buyer may fulfill it. Seller-gated paths (bid acceptance) check
    /// authorization before calling this.
    pub fn take(&mut self, item: ItemId) -> Result<Ask, MarketError> {
        if !self.asks.contains_key(&item) {
            return Err(MarketError::NoSuchAsk { item });
        }
        Ok(self.remove(item))
    }

    fn remove(&mut self, item: ItemId) -> Ask {
        self.order.retain(|i| *i != item);
        self.asks.remove(&item).expect("ask presence checked")
    }

    /// Get the active ask for an item, if any
    pub fn get(&self, item: ItemId) -> Option<&Ask> {
        self.asks.get(&item)
    }

    /// All active asks in listing order
    pub fn list(&self) -> Vec<&Ask> {
        self.order
            .iter()
            .filter_map(|item| self.asks.get(item))
            .collect()
    }

    /// Number of active asks
    pub fn len(&self) -> usize {
        self.asks.len()
    }

    /// Whether there are no active asks
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty()
    }
}
