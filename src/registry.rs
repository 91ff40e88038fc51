//! Token registry: the whitelist roster, target weights, prices, and
//! per-token asset-contract bindings.
//!
//! The roster is append-only and bounded; weights are fixed at registration
//! and prices are overwritten unconditionally by the owner (no staleness or
//! oracle checks — price-feed integrity is out of scope).

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::types::{Address, Amount, TokenId};

/// Default roster bound.
pub const MAX_TOKENS: usize = 10;

/// One whitelisted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    /// Administrator-set target allocation, in basis points.
    pub target_weight_bps: u64,
    /// Last posted market price; 0 until the owner posts one.
    pub price: Amount,
    /// External asset contract bound to this token.
    pub asset: Address,
}

#[derive(Debug)]
pub struct Registry {
    roster: Vec<TokenId>,
    entries: FxHashMap<TokenId, TokenEntry>,
    max_tokens: usize,
    /// The fund's own address; bindings to it are rejected.
    fund_address: Address,
}

impl Registry {
    pub fn new(max_tokens: usize, fund_address: Address) -> Self {
        Self {
            roster: Vec::new(),
            entries: FxHashMap::default(),
            max_tokens,
            fund_address,
        }
    }

    /// Register a token. Checks run in order: roster capacity, duplicate
    /// identifier, weight validity, self-reference.
    pub fn add(&mut self, token: TokenId, target_weight_bps: u64, asset: Address) -> Result<()> {
        if self.roster.len() >= self.max_tokens {
            return Err(Error::TooManyTokens {
                max: self.max_tokens,
            });
        }
        if self.entries.contains_key(&token) {
            return Err(Error::DuplicateToken(token));
        }
        if target_weight_bps == 0 {
            return Err(Error::InvalidWeight);
        }
        if asset == self.fund_address {
            return Err(Error::SelfReference);
        }

        self.roster.push(token);
        self.entries.insert(
            token,
            TokenEntry {
                target_weight_bps,
                price: 0,
                asset,
            },
        );
        Ok(())
    }

    /// Post a new market price for a registered token.
    pub fn set_price(&mut self, token: TokenId, price: Amount) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&token)
            .ok_or(Error::UnsupportedToken(token))?;
        if price == 0 {
            return Err(Error::InvalidPrice);
        }
        entry.price = price;
        Ok(())
    }

    pub fn is_supported(&self, token: TokenId) -> bool {
        self.entries.contains_key(&token)
    }

    /// Target weight in bps; 0 for unknown tokens.
    pub fn target_weight(&self, token: TokenId) -> u64 {
        self.entries
            .get(&token)
            .map(|e| e.target_weight_bps)
            .unwrap_or(0)
    }

    /// Last posted price; 0 for unknown or unpriced tokens.
    pub fn price(&self, token: TokenId) -> Amount {
        self.entries.get(&token).map(|e| e.price).unwrap_or(0)
    }

    pub fn entry(&self, token: TokenId) -> Option<&TokenEntry> {
        self.entries.get(&token)
    }

    /// Registered identifiers in registration order.
    pub fn roster(&self) -> &[TokenId] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund() -> Address {
        Address(0xF0)
    }
    fn asset(i: u64) -> Address {
        Address(0x100 + i)
    }

    fn registry() -> Registry {
        Registry::new(MAX_TOKENS, fund())
    }

    #[test]
    fn add_and_read_back() {
        let mut reg = registry();
        let gold = TokenId::new("GOLD");
        reg.add(gold, 2500, asset(1)).unwrap();

        assert!(reg.is_supported(gold));
        assert_eq!(reg.target_weight(gold), 2500);
        assert_eq!(reg.price(gold), 0); // unset until posted
        assert_eq!(reg.entry(gold).unwrap().asset, asset(1));
        assert_eq!(reg.roster(), &[gold]);
    }

    #[test]
    fn unknown_token_reads_zero() {
        let reg = registry();
        let gold = TokenId::new("GOLD");
        assert!(!reg.is_supported(gold));
        assert_eq!(reg.target_weight(gold), 0);
        assert_eq!(reg.price(gold), 0);
    }

    #[test]
    fn roster_preserves_registration_order() {
        let mut reg = registry();
        for (i, sym) in ["C", "A", "B"].iter().enumerate() {
            reg.add(TokenId::new(sym), 100, asset(i as u64)).unwrap();
        }
        let order: Vec<&str> = reg.roster().iter().map(|t| t.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn roster_is_bounded() {
        let mut reg = registry();
        for i in 0..MAX_TOKENS {
            reg.add(TokenId::new(&format!("T{i}")), 100, asset(i as u64))
                .unwrap();
        }
        let err = reg.add(TokenId::new("T10"), 100, asset(99)).unwrap_err();
        assert!(matches!(err, Error::TooManyTokens { max: MAX_TOKENS }));
        assert_eq!(reg.len(), MAX_TOKENS);
    }

    #[test]
    fn duplicate_rejected() {
        let mut reg = registry();
        let gold = TokenId::new("GOLD");
        reg.add(gold, 2500, asset(1)).unwrap();
        assert!(matches!(
            reg.add(gold, 1000, asset(2)),
            Err(Error::DuplicateToken(_))
        ));
        // Original binding untouched.
        assert_eq!(reg.target_weight(gold), 2500);
    }

    #[test]
    fn zero_weight_rejected() {
        let mut reg = registry();
        assert!(matches!(
            reg.add(TokenId::new("GOLD"), 0, asset(1)),
            Err(Error::InvalidWeight)
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn self_reference_rejected() {
        let mut reg = registry();
        assert!(matches!(
            reg.add(TokenId::new("GOLD"), 2500, fund()),
            Err(Error::SelfReference)
        ));
    }

    #[test]
    fn capacity_checked_before_duplicate() {
        // Both violated: the roster bound wins, per the interface contract.
        let mut reg = Registry::new(1, fund());
        let gold = TokenId::new("GOLD");
        reg.add(gold, 100, asset(1)).unwrap();
        assert!(matches!(
            reg.add(gold, 100, asset(1)),
            Err(Error::TooManyTokens { .. })
        ));
    }

    #[test]
    fn price_updates_overwrite() {
        let mut reg = registry();
        let gold = TokenId::new("GOLD");
        reg.add(gold, 2500, asset(1)).unwrap();

        reg.set_price(gold, 1800).unwrap();
        assert_eq!(reg.price(gold), 1800);
        reg.set_price(gold, 1750).unwrap();
        assert_eq!(reg.price(gold), 1750);
    }

    #[test]
    fn price_rejections() {
        let mut reg = registry();
        let gold = TokenId::new("GOLD");
        assert!(matches!(
            reg.set_price(gold, 1800),
            Err(Error::UnsupportedToken(_))
        ));

        reg.add(gold, 2500, asset(1)).unwrap();
        assert!(matches!(reg.set_price(gold, 0), Err(Error::InvalidPrice)));
        assert_eq!(reg.price(gold), 0);
    }
}
