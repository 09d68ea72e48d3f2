//! Marketplace Order-Book & Settlement Engine
//!
//! This crate implements the custody and trading core of a non-custodial
//! collectibles marketplace: per-item asks, per-(item, bidder) offers,
//! escrow bookkeeping, and the three-way fee split executed on every
//! completing sale. The collectible-ownership registry and the
//! fungible-asset ledgers used as payment currencies are external
//! collaborators, reached only through the traits in `ledger`.
//!
//! # Modules
//! - `errors`: Error taxonomy for book, escrow, and settlement operations
//! - `events`: Append-only event records emitted by engine operations
//! - `security`: Reentrancy guard and operator gate
//! - `ledger`: Collaborator interfaces plus in-memory reference ledgers
//! - `quote_tokens`: Operator-controlled payment-currency whitelist
//! - `ask_book`: One active listing per item
//! - `bid_book`: At most one standing offer per (item, bidder) pair
//! - `escrow`: Custody movements with an audit trail
//! - `settlement`: Fee split computation and disbursement
//! - `market`: Public operation surface composing the above

pub mod ask_book;
pub mod bid_book;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod ledger;
pub mod market;
pub mod quote_tokens;
pub mod security;
pub mod settlement;

pub use market::{Market, MarketConfig};

/// Engine version — bump on observable behavior changes
pub const ENGINE_VERSION: &str = "0.1.0";
