//! External collaborator interfaces and reference implementations
//!
//! The marketplace never owns item or currency state; it reads and
//! moves assets through these two traits. `InMemoryItems` and
//! `InMemoryLedger` are faithful in-process stands-in used by the test
//! suite and by embedders that do not need a real external ledger. The
//! engine itself never mints or burns — those entry points exist only
//! on the reference implementations.

use crate::errors::LedgerError;
use std::collections::HashMap;
use types::amount::Amount;
use types::ids::{Address, ItemId, QuoteToken};

/// Collectible-ownership registry.
///
/// One registry instance covers all items. The marketplace reads
/// ownership and the creator of record, and moves custody; it never
/// mints or burns.
pub trait ItemRegistry {
    /// Current owner of an item
    fn owner_of(&self, item: &ItemId) -> Result<Address, LedgerError>;

    /// Original creator (royalty recipient) of an item
    fn creator_of(&self, item: &ItemId) -> Result<Address, LedgerError>;

    /// Move an item from `from` to `to`; fails if `from` is not the owner
    fn transfer(&mut self, item: &ItemId, from: &Address, to: &Address)
        -> Result<(), LedgerError>;
}

/// Fungible-asset ledger, one balance sheet per quote token.
///
/// Standard balance/transfer/allowance semantics: a spender may move
/// another party's funds only up to the amount that party approved.
pub trait CurrencyLedger {
    /// Balance of `who` in `token`
    fn balance_of(&self, token: &QuoteToken, who: &Address) -> Amount;

    /// Remaining amount `spender` may pull from `owner` in `token`
    fn allowance(&self, token: &QuoteToken, owner: &Address, spender: &Address) -> Amount;

    /// Set the amount `spender` may pull from `owner` in `token`
    fn approve(&mut self, token: &QuoteToken, owner: &Address, spender: &Address, amount: Amount);

    /// Pull `amount` of `token` from `from` to `to` on behalf of `spender`.
    ///
    /// Consumes allowance; fails with `InsufficientAllowance` or
    /// `InsufficientFunds` if the pull cannot be covered.
    fn transfer_from(
        &mut self,
        token: &QuoteToken,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Move `amount` of `token` out of the caller's own balance
    fn transfer(
        &mut self,
        token: &QuoteToken,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// In-memory item registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryItems {
    owners: HashMap<ItemId, Address>,
    creators: HashMap<ItemId, Address>,
}

impl InMemoryItems {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an item to `owner`, recording them as creator of record.
    ///
    /// Test/reference surface only; the engine never calls this.
    pub fn mint(&mut self, item: ItemId, owner: Address) {
        self.creators.insert(item, owner.clone());
        self.owners.insert(item, owner);
    }

    /// Number of minted items
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no items have been minted
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl ItemRegistry for InMemoryItems {
    fn owner_of(&self, item: &ItemId) -> Result<Address, LedgerError> {
        self.owners
            .get(item)
            .cloned()
            .ok_or(LedgerError::UnknownItem { item: *item })
    }

    fn creator_of(&self, item: &ItemId) -> Result<Address, LedgerError> {
        self.creators
            .get(item)
            .cloned()
            .ok_or(LedgerError::UnknownItem { item: *item })
    }

    fn transfer(
        &mut self,
        item: &ItemId,
        from: &Address,
        to: &Address,
    ) -> Result<(), LedgerError> {
        let owner = self
            .owners
            .get_mut(item)
            .ok_or(LedgerError::UnknownItem { item: *item })?;
        if owner != from {
            return Err(LedgerError::TransferFailed {
                reason: format!("{from} does not own item {item}"),
            });
        }
        *owner = to.clone();
        Ok(())
    }
}

/// In-memory multi-currency ledger with allowance bookkeeping.
///
/// Balances are stored per (token, holder); allowances per
/// (token, owner, spender). All arithmetic is checked.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<QuoteToken, HashMap<Address, Amount>>,
    allowances: HashMap<(QuoteToken, Address, Address), Amount>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly issued funds to `who`.
    ///
    /// Test/reference surface only; the engine never calls this.
    pub fn mint(
        &mut self,
        token: &QuoteToken,
        who: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.credit(token, who, amount)
    }

    fn credit(
        &mut self,
        token: &QuoteToken,
        who: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let balance = self
            .balances
            .entry(token.clone())
            .or_default()
            .entry(who.clone())
            .or_insert(Amount::ZERO);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    fn debit(
        &mut self,
        token: &QuoteToken,
        who: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(token, who);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                token: token.to_string(),
                required: amount.to_string(),
                available: available.to_string(),
            })?;
        self.balances
            .entry(token.clone())
            .or_default()
            .insert(who.clone(), remaining);
        Ok(())
    }
}

impl CurrencyLedger for InMemoryLedger {
    fn balance_of(&self, token: &QuoteToken, who: &Address) -> Amount {
        self.balances
            .get(token)
            .and_then(|holders| holders.get(who))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn allowance(&self, token: &QuoteToken, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(token.clone(), owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn approve(&mut self, token: &QuoteToken, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances
            .insert((token.clone(), owner.clone(), spender.clone()), amount);
    }

    fn transfer_from(
        &mut self,
        token: &QuoteToken,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        // Pulling one's own funds needs no allowance
        let remaining = if spender != from {
            let approved = self.allowance(token, from, spender);
            let remaining =
                approved
                    .checked_sub(amount)
                    .ok_or_else(|| LedgerError::InsufficientAllowance {
                        token: token.to_string(),
                        required: amount.to_string(),
                        approved: approved.to_string(),
                    })?;
            Some(remaining)
        } else {
            None
        };
        self.transfer(token, from, to, amount)?;
        // Consume the allowance only once the transfer went through; a
        // declined pull must leave it intact.
        if let Some(remaining) = remaining {
            self.approve(token, from, spender, remaining);
        }
        Ok(())
    }

    fn transfer(
        &mut self,
        token: &QuoteToken,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busd() -> QuoteToken {
        QuoteToken::new("BUSD")
    }

    // --- Item registry tests ---

    #[test]
    fn test_items_mint_and_lookup() {
        let mut items = InMemoryItems::new();
        items.mint(ItemId::new(1), Address::new("minter"));

        assert_eq!(
            items.owner_of(&ItemId::new(1)).unwrap(),
            Address::new("minter")
        );
        assert_eq!(
            items.creator_of(&ItemId::new(1)).unwrap(),
            Address::new("minter")
        );
    }

    #[test]
    fn test_items_unknown() {
        let items = InMemoryItems::new();
        assert_eq!(
            items.owner_of(&ItemId::new(9)),
            Err(LedgerError::UnknownItem {
                item: ItemId::new(9)
            })
        );
    }

    #[test]
    fn test_items_transfer_keeps_creator() {
        let mut items = InMemoryItems::new();
        items.mint(ItemId::new(1), Address::new("minter"));
        items
            .transfer(&ItemId::new(1), &Address::new("minter"), &Address::new("alice"))
            .unwrap();

        assert_eq!(
            items.owner_of(&ItemId::new(1)).unwrap(),
            Address::new("alice")
        );
        // Creator of record never changes hands
        assert_eq!(
            items.creator_of(&ItemId::new(1)).unwrap(),
            Address::new("minter")
        );
    }

    #[test]
    fn test_items_transfer_wrong_owner() {
        let mut items = InMemoryItems::new();
        items.mint(ItemId::new(1), Address::new("minter"));
        let result = items.transfer(&ItemId::new(1), &Address::new("eve"), &Address::new("eve"));
        assert!(matches!(result, Err(LedgerError::TransferFailed { .. })));
    }

    // --- Currency ledger tests ---

    #[test]
    fn test_ledger_mint_and_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger
            .mint(&busd(), &Address::new("alice"), Amount::new(100))
            .unwrap();
        assert_eq!(ledger.balance_of(&busd(), &Address::new("alice")), Amount::new(100));
        assert_eq!(ledger.balance_of(&busd(), &Address::new("bob")), Amount::ZERO);
    }

    #[test]
    fn test_ledger_transfer() {
        let mut ledger = InMemoryLedger::new();
        ledger
            .mint(&busd(), &Address::new("alice"), Amount::new(100))
            .unwrap();
        ledger
            .transfer(&busd(), &Address::new("alice"), &Address::new("bob"), Amount::new(40))
            .unwrap();

        assert_eq!(ledger.balance_of(&busd(), &Address::new("alice")), Amount::new(60));
        assert_eq!(ledger.balance_of(&busd(), &Address::new("bob")), Amount::new(40));
    }

    #[test]
    fn test_ledger_transfer_insufficient_funds() {
        let mut ledger = InMemoryLedger::new();
        ledger
            .mint(&busd(), &Address::new("alice"), Amount::new(10))
            .unwrap();
        let result = ledger.transfer(
            &busd(),
            &Address::new("alice"),
            &Address::new("bob"),
            Amount::new(11),
        );
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        // Nothing moved
        assert_eq!(ledger.balance_of(&busd(), &Address::new("alice")), Amount::new(10));
    }

    #[test]
    fn test_ledger_transfer_from_consumes_allowance() {
        let mut ledger = InMemoryLedger::new();
        let alice = Address::new("alice");
        let market = Address::new("market");
        ledger.mint(&busd(), &alice, Amount::new(100)).unwrap();
        ledger.approve(&busd(), &alice, &market, Amount::new(60));

        ledger
            .transfer_from(&busd(), &market, &alice, &market, Amount::new(40))
            .unwrap();
        assert_eq!(ledger.allowance(&busd(), &alice, &market), Amount::new(20));
        assert_eq!(ledger.balance_of(&busd(), &market), Amount::new(40));
    }

    #[test]
    fn test_ledger_transfer_from_insufficient_allowance() {
        let mut ledger = InMemoryLedger::new();
        let alice = Address::new("alice");
        let market = Address::new("market");
        ledger.mint(&busd(), &alice, Amount::new(100)).unwrap();
        ledger.approve(&busd(), &alice, &market, Amount::new(10));

        let result = ledger.transfer_from(&busd(), &market, &alice, &market, Amount::new(40));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientAllowance { .. })
        ));
        assert_eq!(ledger.balance_of(&busd(), &alice), Amount::new(100));
    }

    #[test]
    fn test_ledger_failed_pull_keeps_allowance() {
        let mut ledger = InMemoryLedger::new();
        let alice = Address::new("alice");
        let market = Address::new("market");
        ledger.mint(&busd(), &alice, Amount::new(50)).unwrap();
        ledger.approve(&busd(), &alice, &market, Amount::new(100));

        let result = ledger.transfer_from(&busd(), &market, &alice, &market, Amount::new(100));
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        // The declined pull consumed nothing
        assert_eq!(ledger.allowance(&busd(), &alice, &market), Amount::new(100));
        assert_eq!(ledger.balance_of(&busd(), &alice), Amount::new(50));
    }

    #[test]
    fn test_ledger_self_pull_skips_allowance() {
        let mut ledger = InMemoryLedger::new();
        let market = Address::new("market");
        ledger.mint(&busd(), &market, Amount::new(50)).unwrap();

        ledger
            .transfer_from(&busd(), &market, &market, &Address::new("bob"), Amount::new(50))
            .unwrap();
        assert_eq!(ledger.balance_of(&busd(), &Address::new("bob")), Amount::new(50));
    }

    #[test]
    fn test_ledger_currencies_isolated() {
        let mut ledger = InMemoryLedger::new();
        let usdt = QuoteToken::new("USDT");
        ledger
            .mint(&busd(), &Address::new("alice"), Amount::new(100))
            .unwrap();

        assert_eq!(ledger.balance_of(&usdt, &Address::new("alice")), Amount::ZERO);
    }
}
