//! Security primitives shared by engine operations
//!
//! The reentrancy guard serializes fund- and item-moving operations:
//! an asset-transfer callback that re-enters the engine before the
//! outer operation completes is rejected outright. The operator gate is
//! the explicit capability check for administrative operations —
//! authorization is always a comparison against stored state, never an
//! ambient execution-context identity.

use crate::errors::MarketError;
use types::ids::Address;

/// Guard preventing nested calls into asset-moving operations.
///
/// An operation acquires the guard before its first external call and
/// releases it on completion (success or failure). A nested acquisition
/// attempt fails, which the facade maps to `MarketError::Reentrancy`.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    /// Create a new, unentered guard
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Try to enter. Returns `false` on a nested attempt.
    pub fn acquire(&mut self) -> bool {
        if self.entered {
            return false;
        }
        self.entered = true;
        true
    }

    /// Leave the guarded section.
    pub fn release(&mut self) {
        self.entered = false;
    }

    /// Whether an operation is currently in progress.
    pub fn is_entered(&self) -> bool {
        self.entered
    }
}

/// Single-identity gate for administrative operations.
///
/// Guards whitelist mutation and fee configuration. The operator can
/// hand the role to another address.
#[derive(Debug, Clone)]
pub struct OperatorGate {
    operator: Address,
}

impl OperatorGate {
    /// Create a gate with the initial operator
    pub fn new(operator: Address) -> Self {
        Self { operator }
    }

    /// Check whether a caller holds the operator role
    pub fn is_operator(&self, caller: &Address) -> bool {
        *caller == self.operator
    }

    /// Require the operator role, failing with `Unauthorized` otherwise
    pub fn ensure(&self, caller: &Address) -> Result<(), MarketError> {
        if self.is_operator(caller) {
            Ok(())
        } else {
            Err(MarketError::Unauthorized)
        }
    }

    /// Hand the operator role to a new address. Operator-only.
    pub fn transfer(&mut self, caller: &Address, new_operator: Address) -> Result<(), MarketError> {
        self.ensure(caller)?;
        self.operator = new_operator;
        Ok(())
    }

    /// Get the current operator
    pub fn operator(&self) -> &Address {
        &self.operator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ReentrancyGuard tests ---

    #[test]
    fn test_guard_acquire_release() {
        let mut guard = ReentrancyGuard::new();
        assert!(!guard.is_entered());
        assert!(guard.acquire());
        assert!(guard.is_entered());
        guard.release();
        assert!(!guard.is_entered());
    }

    #[test]
    fn test_guard_nested_acquire_fails() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.acquire());
        assert!(!guard.acquire(), "nested acquire must fail");
    }

    #[test]
    fn test_guard_reacquire_after_release() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.acquire());
        guard.release();
        assert!(guard.acquire());
    }

    // --- OperatorGate tests ---

    #[test]
    fn test_gate_recognizes_operator() {
        let gate = OperatorGate::new(Address::new("deployer"));
        assert!(gate.is_operator(&Address::new("deployer")));
        assert!(!gate.is_operator(&Address::new("eve")));
    }

    #[test]
    fn test_gate_ensure() {
        let gate = OperatorGate::new(Address::new("deployer"));
        assert!(gate.ensure(&Address::new("deployer")).is_ok());
        assert_eq!(
            gate.ensure(&Address::new("eve")),
            Err(MarketError::Unauthorized)
        );
    }

    #[test]
    fn test_gate_transfer() {
        let mut gate = OperatorGate::new(Address::new("deployer"));
        gate.transfer(&Address::new("deployer"), Address::new("ops"))
            .unwrap();
        assert!(gate.is_operator(&Address::new("ops")));
        assert!(!gate.is_operator(&Address::new("deployer")));
    }

    #[test]
    fn test_gate_transfer_unauthorized() {
        let mut gate = OperatorGate::new(Address::new("deployer"));
        let result = gate.transfer(&Address::new("eve"), Address::new("eve"));
        assert_eq!(result, Err(MarketError::Unauthorized));
        assert_eq!(gate.operator(), &Address::new("deployer"));
    }
}
