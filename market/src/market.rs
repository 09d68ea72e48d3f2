//! Marketplace facade — the public operation surface
//!
//! Composes the books, whitelist, escrow, and settlement engine behind
//! caller-explicit operations. Every operation validates authorization
//! and inputs first, then mutates book state, and only then moves
//! assets; removals always precede the releases they authorize, so a
//! reentrant observer can never act on stale book state. Fund- and
//! item-moving operations additionally run under a reentrancy guard.

use crate::ask_book::{Ask, AskBook};
use crate::bid_book::{Bid, BidBook};
use crate::errors::{LedgerError, MarketError};
use crate::escrow::{EscrowLedger, EscrowRecord};
use crate::events::{
    BidCancelled, BidPlaced, BidPriceUpdated, Delisted, Listed, MarketEvent, PriceUpdated,
    QuoteTokenAdded, QuoteTokenRemoved, Traded,
};
use crate::ledger::{CurrencyLedger, ItemRegistry};
use crate::quote_tokens::QuoteTokenRegistry;
use crate::security::{OperatorGate, ReentrancyGuard};
use crate::settlement::SettlementEngine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::amount::Amount;
use types::fee::FeeSchedule;
use types::ids::{Address, ItemId, QuoteToken};

/// Engine configuration, passed explicitly to the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Administrative identity for whitelist and fee mutation
    pub operator: Address,
    /// Address under which the marketplace holds escrowed assets
    pub custodian: Address,
    /// Recipient of the platform fee on every sale
    pub fee_address: Address,
    /// Initial fee percentages
    pub fee_schedule: FeeSchedule,
    /// Initially whitelisted payment currencies
    pub quote_tokens: Vec<QuoteToken>,
}

/// The marketplace engine.
///
/// Owns all durable process state: the ask map, bid map, whitelist,
/// fee configuration, and the escrow/event audit logs. Item and
/// currency state lives in the external collaborators passed into each
/// operation.
#[derive(Debug)]
pub struct Market {
    gate: OperatorGate,
    asks: AskBook,
    bids: BidBook,
    quote_tokens: QuoteTokenRegistry,
    escrow: EscrowLedger,
    settlement: SettlementEngine,
    reentrancy: ReentrancyGuard,
    events: Vec<MarketEvent>,
}

impl Market {
    /// Create a marketplace from its configuration.
    ///
    /// The fee schedule is taken as-is; it is range-checked again on
    /// every settlement, so a misconfigured engine rejects sales
    /// rather than over-charging them.
    pub fn new(config: MarketConfig) -> Self {
        Self {
            gate: OperatorGate::new(config.operator),
            asks: AskBook::new(),
            bids: BidBook::new(),
            quote_tokens: QuoteTokenRegistry::with_tokens(config.quote_tokens),
            escrow: EscrowLedger::new(config.custodian),
            settlement: SettlementEngine::new(config.fee_address, config.fee_schedule),
            reentrancy: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    fn enter(&mut self) -> Result<(), MarketError> {
        if self.reentrancy.acquire() {
            Ok(())
        } else {
            Err(MarketError::Reentrancy)
        }
    }

    // ───────────────────────── Listings ─────────────────────────

    /// List an item for sale at a fixed price.
    ///
    /// The caller must currently own the item in the registry and must
    /// have authorized the custodian to move it. Proceeds of a sale go
    /// to `recipient`, which may differ from the seller.
    pub fn list(
        &mut self,
        items: &mut dyn ItemRegistry,
        item: ItemId,
        caller: &Address,
        price: Amount,
        quote_token: QuoteToken,
        recipient: Address,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.list_inner(items, item, caller, price, quote_token, recipient);
        self.reentrancy.release();
        result
    }

    fn list_inner(
        &mut self,
        items: &mut dyn ItemRegistry,
        item: ItemId,
        caller: &Address,
        price: Amount,
        quote_token: QuoteToken,
        recipient: Address,
    ) -> Result<(), MarketError> {
        let owner = items.owner_of(&item)?;
        if owner != *caller {
            return Err(MarketError::NotItemOwner {
                item,
                caller: caller.to_string(),
            });
        }

        self.asks.create(
            &self.quote_tokens,
            item,
            caller.clone(),
            price,
            quote_token.clone(),
            recipient.clone(),
        )?;

        // The ask exists before the item moves; the guard keeps the
        // window unobservable. On a declined transfer the ask is
        // rolled back, leaving no partial effect.
        if let Err(err) = self.escrow.hold_item(items, item, caller, "listing") {
            self.asks.take(item)?;
            return Err(err.into());
        }

        debug!(item = %item, seller = %caller, price = %price, "item listed");
        self.events.push(MarketEvent::Listed(Listed {
            item,
            seller: caller.clone(),
            price,
            quote_token,
            recipient,
        }));
        Ok(())
    }

    /// Change the asking price of a listed item. Seller-only.
    pub fn update_price(
        &mut self,
        item: ItemId,
        caller: &Address,
        new_price: Amount,
    ) -> Result<(), MarketError> {
        self.asks.update_price(item, caller, new_price)?;
        debug!(item = %item, price = %new_price, "ask price updated");
        self.events.push(MarketEvent::PriceUpdated(PriceUpdated {
            item,
            seller: caller.clone(),
            price: new_price,
        }));
        Ok(())
    }

    /// Cancel a listing and return the item to its seller. Seller-only.
    ///
    /// Bids on the item are unaffected; they stay escrowed and
    /// claimable by their owners.
    pub fn cancel(
        &mut self,
        items: &mut dyn ItemRegistry,
        item: ItemId,
        caller: &Address,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.cancel_inner(items, item, caller);
        self.reentrancy.release();
        result
    }

    fn cancel_inner(
        &mut self,
        items: &mut dyn ItemRegistry,
        item: ItemId,
        caller: &Address,
    ) -> Result<(), MarketError> {
        let ask = self.asks.cancel(item, caller)?;
        self.escrow
            .release_item(items, item, &ask.seller, "listing cancelled")?;

        debug!(item = %item, seller = %ask.seller, "listing cancelled");
        self.events.push(MarketEvent::Delisted(Delisted {
            item,
            seller: ask.seller,
        }));
        Ok(())
    }

    /// Buy a listed item at its asking price. Open to any caller.
    ///
    /// Pulls the full price from the caller, settles the fee split
    /// with proceeds to the ask's recipient and royalty to the item's
    /// creator of record, and releases the item to the caller.
    pub fn buy_at_ask(
        &mut self,
        items: &mut dyn ItemRegistry,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.buy_at_ask_inner(items, ledger, item, caller);
        self.reentrancy.release();
        result
    }

    fn buy_at_ask_inner(
        &mut self,
        items: &mut dyn ItemRegistry,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
    ) -> Result<(), MarketError> {
        let ask = self
            .asks
            .get(item)
            .cloned()
            .ok_or(MarketError::NoSuchAsk { item })?;
        // Reject a schedule or split the engine cannot disburse before
        // any funds move or book state changes.
        self.settlement.split(ask.price)?;
        let creator = items.creator_of(&item)?;

        self.escrow.hold_funds(
            ledger,
            caller,
            ask.price,
            &ask.quote_token,
            "purchase at ask",
        )?;
        let ask = self.asks.take(item)?;

        self.settlement.settle(
            &mut self.escrow,
            ledger,
            item,
            &ask.quote_token,
            ask.price,
            &creator,
            &ask.recipient,
        )?;
        self.escrow
            .release_item(items, item, caller, "sold at ask")?;

        info!(
            item = %item,
            seller = %ask.seller,
            buyer = %caller,
            price = %ask.price,
            token = %ask.quote_token,
            "sold at asking price"
        );
        self.events.push(MarketEvent::Traded(Traded {
            item,
            seller: ask.seller,
            buyer: caller.clone(),
            recipient: ask.recipient,
            price: ask.price,
            quote_token: ask.quote_token,
        }));
        Ok(())
    }

    // ───────────────────────── Bids ─────────────────────────

    /// Place a standing bid on an item, escrowing its full price.
    ///
    /// The item need not be listed. Self-bidding is deliberately not
    /// prevented.
    pub fn place_bid(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
        price: Amount,
        quote_token: QuoteToken,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.place_bid_inner(ledger, item, caller, price, quote_token);
        self.reentrancy.release();
        result
    }

    fn place_bid_inner(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
        price: Amount,
        quote_token: QuoteToken,
    ) -> Result<(), MarketError> {
        if self.bids.get(item, caller).is_some() {
            return Err(MarketError::DuplicateBid {
                item,
                bidder: caller.to_string(),
            });
        }

        self.escrow
            .hold_funds(ledger, caller, price, &quote_token, "bid placed")?;
        self.bids
            .place(item, caller.clone(), price, quote_token.clone())?;

        debug!(item = %item, bidder = %caller, price = %price, "bid placed");
        self.events.push(MarketEvent::BidPlaced(BidPlaced {
            item,
            bidder: caller.clone(),
            price,
            quote_token,
        }));
        Ok(())
    }

    /// Change a standing bid's price. Bidder-only.
    ///
    /// A raise pulls exactly the difference into escrow; a reduction
    /// refunds exactly the difference, after the book mutation.
    pub fn update_bid(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
        new_price: Amount,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.update_bid_inner(ledger, item, caller, new_price);
        self.reentrancy.release();
        result
    }

    fn update_bid_inner(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
        new_price: Amount,
    ) -> Result<(), MarketError> {
        let bid = self
            .bids
            .get(item, caller)
            .cloned()
            .ok_or_else(|| MarketError::NoSuchBid {
                item,
                bidder: caller.to_string(),
            })?;

        if new_price > bid.price {
            let delta = new_price
                .checked_sub(bid.price)
                .ok_or(MarketError::Ledger(LedgerError::Overflow))?;
            self.escrow
                .hold_funds(ledger, caller, delta, &bid.quote_token, "bid raised")?;
            self.bids.update_price(item, caller, new_price)?;
        } else if new_price < bid.price {
            let delta = bid
                .price
                .checked_sub(new_price)
                .ok_or(MarketError::Ledger(LedgerError::Overflow))?;
            self.bids.update_price(item, caller, new_price)?;
            self.escrow
                .release_funds(ledger, caller, delta, &bid.quote_token, "bid lowered")?;
        }

        debug!(item = %item, bidder = %caller, price = %new_price, "bid price updated");
        self.events.push(MarketEvent::BidPriceUpdated(BidPriceUpdated {
            item,
            bidder: caller.clone(),
            previous_price: bid.price,
            price: new_price,
        }));
        Ok(())
    }

    /// Cancel a standing bid and refund its full escrowed amount.
    /// Bidder-only.
    pub fn cancel_bid(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.cancel_bid_inner(ledger, item, caller);
        self.reentrancy.release();
        result
    }

    fn cancel_bid_inner(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
    ) -> Result<(), MarketError> {
        let bid = self.bids.cancel(item, caller)?;
        self.escrow
            .release_funds(ledger, caller, bid.price, &bid.quote_token, "bid cancelled")?;

        debug!(item = %item, bidder = %caller, refunded = %bid.price, "bid cancelled");
        self.events.push(MarketEvent::BidCancelled(BidCancelled {
            item,
            bidder: caller.clone(),
            refunded: bid.price,
        }));
        Ok(())
    }

    /// Sell a listed item to the named bidder at their bid price.
    /// Seller-only.
    ///
    /// Settlement consumes the bid's escrowed funds; no additional
    /// pull happens. Every other bid on the item stays live.
    pub fn accept_bid(
        &mut self,
        items: &mut dyn ItemRegistry,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
        bidder: &Address,
    ) -> Result<(), MarketError> {
        self.enter()?;
        let result = self.accept_bid_inner(items, ledger, item, caller, bidder);
        self.reentrancy.release();
        result
    }

    fn accept_bid_inner(
        &mut self,
        items: &mut dyn ItemRegistry,
        ledger: &mut dyn CurrencyLedger,
        item: ItemId,
        caller: &Address,
        bidder: &Address,
    ) -> Result<(), MarketError> {
        let ask = self.asks.get(item).ok_or(MarketError::NoSuchAsk { item })?;
        if ask.seller != *caller {
            return Err(MarketError::NotSeller { item });
        }
        let bid_price = self
            .bids
            .get(item, bidder)
            .map(|b| b.price)
            .ok_or_else(|| MarketError::NoSuchBid {
                item,
                bidder: bidder.to_string(),
            })?;
        // Reject a schedule or split the engine cannot disburse before
        // the books are touched.
        self.settlement.split(bid_price)?;
        let creator = items.creator_of(&item)?;

        // Both book entries are gone before any funds or the item move.
        let ask = self.asks.take(item)?;
        let bid = self.bids.take_winning(item, bidder)?;

        self.settlement.settle(
            &mut self.escrow,
            ledger,
            item,
            &bid.quote_token,
            bid.price,
            &creator,
            &ask.recipient,
        )?;
        self.escrow
            .release_item(items, item, bidder, "sold to bidder")?;

        info!(
            item = %item,
            seller = %ask.seller,
            buyer = %bidder,
            price = %bid.price,
            token = %bid.quote_token,
            "sold to accepted bidder"
        );
        self.events.push(MarketEvent::Traded(Traded {
            item,
            seller: ask.seller,
            buyer: bidder.clone(),
            recipient: ask.recipient,
            price: bid.price,
            quote_token: bid.quote_token,
        }));
        Ok(())
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Whitelist a quote token. Operator-only, idempotent.
    pub fn add_quote_token(
        &mut self,
        caller: &Address,
        token: QuoteToken,
    ) -> Result<(), MarketError> {
        self.gate.ensure(caller)?;
        if self.quote_tokens.add(token.clone()) {
            self.events
                .push(MarketEvent::QuoteTokenAdded(QuoteTokenAdded { token }));
        }
        Ok(())
    }

    /// Remove a quote token from the whitelist. Operator-only,
    /// idempotent. Existing asks created against the token stay valid.
    pub fn remove_quote_token(
        &mut self,
        caller: &Address,
        token: &QuoteToken,
    ) -> Result<(), MarketError> {
        self.gate.ensure(caller)?;
        if self.quote_tokens.remove(token) {
            self.events
                .push(MarketEvent::QuoteTokenRemoved(QuoteTokenRemoved {
                    token: token.clone(),
                }));
        }
        Ok(())
    }

    /// Replace the fee schedule. Operator-only, range-checked.
    pub fn set_fee_schedule(
        &mut self,
        caller: &Address,
        schedule: FeeSchedule,
    ) -> Result<(), MarketError> {
        self.gate.ensure(caller)?;
        self.settlement.set_schedule(schedule)
    }

    /// Hand the operator role to a new address. Operator-only.
    pub fn transfer_operator(
        &mut self,
        caller: &Address,
        new_operator: Address,
    ) -> Result<(), MarketError> {
        self.gate.transfer(caller, new_operator)
    }

    // ───────────────────────── Queries ─────────────────────────

    /// The active ask for an item, if any
    pub fn ask(&self, item: ItemId) -> Option<&Ask> {
        self.asks.get(item)
    }

    /// All active asks in listing order
    pub fn asks(&self) -> Vec<&Ask> {
        self.asks.list()
    }

    /// Bids on an item in placement order
    pub fn bids_for_item(&self, item: ItemId) -> &[Bid] {
        self.bids.bids_for_item(item)
    }

    /// A bidder's bids across items in placement order
    pub fn bids_for_bidder(&self, bidder: &Address) -> Vec<&Bid> {
        self.bids.bids_for_bidder(bidder)
    }

    /// Whitelisted quote tokens in insertion order
    pub fn quote_tokens(&self) -> &[QuoteToken] {
        self.quote_tokens.list()
    }

    /// Whether a quote token is currently whitelisted
    pub fn is_supported_quote_token(&self, token: &QuoteToken) -> bool {
        self.quote_tokens.contains(token)
    }

    /// The current fee schedule
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.settlement.schedule()
    }

    /// The platform fee address
    pub fn fee_address(&self) -> &Address {
        self.settlement.fee_address()
    }

    /// The custodial address escrowed assets are held under
    pub fn custodian(&self) -> &Address {
        self.escrow.custodian()
    }

    /// The current operator
    pub fn operator(&self) -> &Address {
        self.gate.operator()
    }

    /// All emitted events, oldest first
    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    /// Drain all events (consume and clear)
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    /// All escrow custody movements, oldest first
    pub fn escrow_records(&self) -> &[EscrowRecord] {
        self.escrow.records()
    }
}
