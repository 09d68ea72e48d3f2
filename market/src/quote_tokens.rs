//! Payment-currency whitelist
//!
//! An ask may only be created against a currently whitelisted quote
//! token. Membership checks happen at listing time and are never
//! re-validated retroactively, so removing a token leaves existing
//! asks intact. The facade gates mutation to the operator.

use types::ids::QuoteToken;

/// Insertion-ordered set of accepted quote tokens.
#[derive(Debug, Clone, Default)]
pub struct QuoteTokenRegistry {
    tokens: Vec<QuoteToken>,
}

impl QuoteTokenRegistry {
    /// Create an empty whitelist
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a whitelist pre-seeded with the given tokens
    pub fn with_tokens(tokens: impl IntoIterator<Item = QuoteToken>) -> Self {
        let mut registry = Self::new();
        for token in tokens {
            registry.add(token);
        }
        registry
    }

    /// Idempotent insert. Returns `true` if the token was newly added.
    pub fn add(&mut self, token: QuoteToken) -> bool {
        if self.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Idempotent delete. Returns `true` if the token was present.
    pub fn remove(&mut self, token: &QuoteToken) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Whether a token is currently whitelisted
    pub fn contains(&self, token: &QuoteToken) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Whitelisted tokens in insertion order
    pub fn list(&self) -> &[QuoteToken] {
        &self.tokens
    }

    /// Number of whitelisted tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the whitelist is empty
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_contains() {
        let mut registry = QuoteTokenRegistry::new();
        assert!(registry.add(QuoteToken::new("BUSD")));
        assert!(registry.contains(&QuoteToken::new("BUSD")));
        assert!(!registry.contains(&QuoteToken::new("DOP")));
    }

    #[test]
    fn test_add_idempotent() {
        let mut registry = QuoteTokenRegistry::new();
        assert!(registry.add(QuoteToken::new("BUSD")));
        assert!(!registry.add(QuoteToken::new("BUSD")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_idempotent() {
        let mut registry = QuoteTokenRegistry::with_tokens([QuoteToken::new("BUSD")]);
        assert!(registry.remove(&QuoteToken::new("BUSD")));
        assert!(!registry.remove(&QuoteToken::new("BUSD")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut registry = QuoteTokenRegistry::with_tokens([
            QuoteToken::new("BUSD"),
            QuoteToken::new("USDT"),
            QuoteToken::new("DAI"),
        ]);
        registry.remove(&QuoteToken::new("USDT"));
        registry.add(QuoteToken::new("DOP"));

        let listed: Vec<&str> = registry.list().iter().map(|t| t.as_str()).collect();
        assert_eq!(listed, vec!["BUSD", "DAI", "DOP"]);
    }
}
