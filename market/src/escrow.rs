//! Escrow ledger — custody movements with an audit trail
//!
//! The marketplace holds items and funds under its own custodial
//! address while an ask or bid is live. Actual balances stay in the
//! external collaborators; this ledger executes the movements and
//! records each one append-only, tagged with the operation that
//! triggered it.

use crate::errors::LedgerError;
use crate::ledger::{CurrencyLedger, ItemRegistry};
use serde::{Deserialize, Serialize};
use types::amount::Amount;
use types::ids::{Address, ItemId, QuoteToken, RecordId};

/// Whether custody was taken or relinquished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowDirection {
    Hold,
    Release,
}

/// What the movement covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowAsset {
    Item { item: ItemId },
    Funds { token: QuoteToken, amount: Amount },
}

/// One custody movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    pub record_id: RecordId,
    pub direction: EscrowDirection,
    pub asset: EscrowAsset,
    /// Counterparty: the holder funds/items came from on a hold, the
    /// payee/recipient on a release
    pub party: Address,
    /// Operation that triggered the movement
    pub reason: String,
}

/// Custody bookkeeping for the marketplace's escrowed assets.
#[derive(Debug)]
pub struct EscrowLedger {
    custodian: Address,
    records: Vec<EscrowRecord>,
}

impl EscrowLedger {
    /// Create an escrow ledger operating as `custodian`
    pub fn new(custodian: Address) -> Self {
        Self {
            custodian,
            records: Vec::new(),
        }
    }

    /// The marketplace's custodial address
    pub fn custodian(&self) -> &Address {
        &self.custodian
    }

    /// Move an item from `from` into marketplace custody.
    pub fn hold_item(
        &mut self,
        items: &mut dyn ItemRegistry,
        item: ItemId,
        from: &Address,
        reason: &str,
    ) -> Result<(), LedgerError> {
        items.transfer(&item, from, &self.custodian)?;
        self.record(
            EscrowDirection::Hold,
            EscrowAsset::Item { item },
            from.clone(),
            reason,
        );
        Ok(())
    }

    /// Move an item out of marketplace custody to `to`.
    pub fn release_item(
        &mut self,
        items: &mut dyn ItemRegistry,
        item: ItemId,
        to: &Address,
        reason: &str,
    ) -> Result<(), LedgerError> {
        items.transfer(&item, &self.custodian, to)?;
        self.record(
            EscrowDirection::Release,
            EscrowAsset::Item { item },
            to.clone(),
            reason,
        );
        Ok(())
    }

    /// Pull `amount` from the payer's ledger balance into custody.
    ///
    /// The payer must have approved the custodial address for at least
    /// `amount`; a declined pull surfaces as `InsufficientFunds` or
    /// `InsufficientAllowance`.
    pub fn hold_funds(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        payer: &Address,
        amount: Amount,
        token: &QuoteToken,
        reason: &str,
    ) -> Result<(), LedgerError> {
        ledger.transfer_from(token, &self.custodian, payer, &self.custodian, amount)?;
        self.record(
            EscrowDirection::Hold,
            EscrowAsset::Funds {
                token: token.clone(),
                amount,
            },
            payer.clone(),
            reason,
        );
        Ok(())
    }

    /// Pay out `amount` from custody to `payee`.
    pub fn release_funds(
        &mut self,
        ledger: &mut dyn CurrencyLedger,
        payee: &Address,
        amount: Amount,
        token: &QuoteToken,
        reason: &str,
    ) -> Result<(), LedgerError> {
        ledger.transfer(token, &self.custodian, payee, amount)?;
        self.record(
            EscrowDirection::Release,
            EscrowAsset::Funds {
                token: token.clone(),
                amount,
            },
            payee.clone(),
            reason,
        );
        Ok(())
    }

    fn record(
        &mut self,
        direction: EscrowDirection,
        asset: EscrowAsset,
        party: Address,
        reason: &str,
    ) {
        self.records.push(EscrowRecord {
            record_id: RecordId::new(),
            direction,
            asset,
            party,
            reason: reason.to_string(),
        });
    }

    /// All custody movements, oldest first
    pub fn records(&self) -> &[EscrowRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{InMemoryItems, InMemoryLedger};

    fn busd() -> QuoteToken {
        QuoteToken::new("BUSD")
    }

    fn setup() -> (EscrowLedger, InMemoryItems, InMemoryLedger) {
        let escrow = EscrowLedger::new(Address::new("market"));
        let mut items = InMemoryItems::new();
        items.mint(ItemId::new(1), Address::new("minter"));

        let mut ledger = InMemoryLedger::new();
        ledger
            .mint(&busd(), &Address::new("bob"), Amount::new(1_000))
            .unwrap();
        (escrow, items, ledger)
    }

    #[test]
    fn test_hold_and_release_item() {
        let (mut escrow, mut items, _) = setup();

        escrow
            .hold_item(&mut items, ItemId::new(1), &Address::new("minter"), "listing")
            .unwrap();
        assert_eq!(
            items.owner_of(&ItemId::new(1)).unwrap(),
            Address::new("market")
        );

        escrow
            .release_item(&mut items, ItemId::new(1), &Address::new("minter"), "cancel")
            .unwrap();
        assert_eq!(
            items.owner_of(&ItemId::new(1)).unwrap(),
            Address::new("minter")
        );
        assert_eq!(escrow.records().len(), 2);
    }

    #[test]
    fn test_hold_item_not_owned() {
        let (mut escrow, mut items, _) = setup();
        let result = escrow.hold_item(&mut items, ItemId::new(1), &Address::new("eve"), "listing");
        assert!(matches!(result, Err(LedgerError::TransferFailed { .. })));
        assert!(escrow.records().is_empty(), "failed movement is not recorded");
    }

    #[test]
    fn test_hold_funds_requires_allowance() {
        let (mut escrow, _, mut ledger) = setup();
        let result = escrow.hold_funds(
            &mut ledger,
            &Address::new("bob"),
            Amount::new(500),
            &busd(),
            "bid placed",
        );
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientAllowance { .. })
        ));
    }

    #[test]
    fn test_hold_and_release_funds() {
        let (mut escrow, _, mut ledger) = setup();
        ledger.approve(
            &busd(),
            &Address::new("bob"),
            &Address::new("market"),
            Amount::new(500),
        );

        escrow
            .hold_funds(
                &mut ledger,
                &Address::new("bob"),
                Amount::new(500),
                &busd(),
                "bid placed",
            )
            .unwrap();
        assert_eq!(
            ledger.balance_of(&busd(), &Address::new("market")),
            Amount::new(500)
        );
        assert_eq!(
            ledger.balance_of(&busd(), &Address::new("bob")),
            Amount::new(500)
        );

        escrow
            .release_funds(
                &mut ledger,
                &Address::new("bob"),
                Amount::new(500),
                &busd(),
                "bid cancelled",
            )
            .unwrap();
        assert_eq!(
            ledger.balance_of(&busd(), &Address::new("bob")),
            Amount::new(1_000)
        );
    }

    #[test]
    fn test_records_tag_reason_and_party() {
        let (mut escrow, mut items, _) = setup();
        escrow
            .hold_item(&mut items, ItemId::new(1), &Address::new("minter"), "listing")
            .unwrap();

        let record = &escrow.records()[0];
        assert_eq!(record.direction, EscrowDirection::Hold);
        assert_eq!(record.party, Address::new("minter"));
        assert_eq!(record.reason, "listing");
        assert!(matches!(record.asset, EscrowAsset::Item { .. }));
    }
}
