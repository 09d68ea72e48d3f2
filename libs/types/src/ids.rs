//! Identifier types for marketplace entities
//!
//! Items and parties are identified by opaque newtypes rather than raw
//! integers/strings, so a seller address can never be confused with a
//! payment-currency identifier at a call site. Audit records use UUID v7
//! for time-sortable ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a collectible item.
///
/// The item registry assigns these at mint time; the marketplace only
/// ever references existing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Create an ItemId from its registry value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw registry value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Address of a party (seller, bidder, buyer, fee recipient, operator).
///
/// Addresses are opaque strings; the marketplace compares them for
/// equality and never interprets their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create a new Address
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get the address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a payment currency accepted by the marketplace.
///
/// One fungible-asset ledger exists per quote token; the operator
/// whitelist controls which tokens asks may be created against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteToken(String);

impl QuoteToken {
    /// Create a new QuoteToken identifier
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the token symbol string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuoteToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier for an audit record (escrow movement, settlement).
///
/// Uses UUID v7 so records sort chronologically by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new RecordId with the current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_value() {
        let item = ItemId::new(7);
        assert_eq!(item.value(), 7);
        assert_eq!(item.to_string(), "7");
    }

    #[test]
    fn test_item_id_serialization() {
        let item = ItemId::new(42);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, "42");

        let deserialized: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }

    #[test]
    fn test_address_equality() {
        let a = Address::new("alice");
        let b = Address::from("alice");
        assert_eq!(a, b);
        assert_ne!(a, Address::new("bob"));
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::new("0xfeed");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xfeed\"");

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_quote_token_creation() {
        let token = QuoteToken::new("BUSD");
        assert_eq!(token.as_str(), "BUSD");
        assert_eq!(token.to_string(), "BUSD");
    }

    #[test]
    fn test_record_id_uniqueness() {
        let id1 = RecordId::new();
        let id2 = RecordId::new();
        assert_ne!(id1, id2, "RecordIds should be unique");
    }

    #[test]
    fn test_record_id_serialization() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
