//! Balance ledger: per-account claims, fund-wide per-token holdings, and the
//! aggregate supply.
//!
//! Invariant after every committed operation: the sum of all account balances
//! equals `total_supply`. Deposits and withdrawals move balance, holdings and
//! supply together; the fund sequences the external asset call between
//! `check_*` and the commit so a failed transfer never leaves partial state.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::types::{Address, Amount, TokenId};

#[derive(Debug, Default)]
pub struct Ledger {
    balances: FxHashMap<Address, Amount>,
    holdings: FxHashMap<TokenId, Amount>,
    total_supply: Amount,
    fees_retained: Amount,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account claim; 0 for unknown accounts.
    pub fn balance(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Fund-wide position in one token; 0 for unknown tokens.
    pub fn holdings(&self, token: TokenId) -> Amount {
        self.holdings.get(&token).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Cumulative fees kept in the pool by past withdrawals.
    pub fn fees_retained(&self) -> Amount {
        self.fees_retained
    }

    /// Verify the conservation invariant. Test hook; O(accounts).
    pub fn conserved(&self) -> bool {
        let sum: u128 = self.balances.values().map(|&b| b as u128).sum();
        sum == self.total_supply as u128
    }

    /// Would crediting `amount` overflow any counter?
    pub fn check_credit(&self, account: Address, token: TokenId, amount: Amount) -> Result<()> {
        if self.balance(account).checked_add(amount).is_none()
            || self.holdings(token).checked_add(amount).is_none()
            || self.total_supply.checked_add(amount).is_none()
        {
            return Err(Error::Overflow);
        }
        Ok(())
    }

    /// Commit a deposit. Run [`Ledger::check_credit`] first; the additions
    /// here must not overflow.
    pub fn credit(&mut self, account: Address, token: TokenId, amount: Amount) {
        *self.balances.entry(account).or_insert(0) += amount;
        *self.holdings.entry(token).or_insert(0) += amount;
        self.total_supply += amount;
    }

    /// Do the account claim and the token's holdings cover a withdrawal of
    /// `gross` units paying out `net`?
    pub fn check_debit(
        &self,
        account: Address,
        token: TokenId,
        gross: Amount,
        net: Amount,
    ) -> Result<()> {
        let available = self.balance(account);
        if available < gross {
            return Err(Error::InsufficientBalance {
                requested: gross,
                available,
            });
        }
        let held = self.holdings(token);
        if held < net {
            return Err(Error::InsufficientBalance {
                requested: net,
                available: held,
            });
        }
        Ok(())
    }

    /// Commit a withdrawal: claim and supply drop by the gross amount,
    /// holdings by the net outflow. The fee difference stays in the pool and
    /// is tallied in `fees_retained`. Run [`Ledger::check_debit`] first.
    pub fn debit(&mut self, account: Address, token: TokenId, gross: Amount, net: Amount) {
        debug_assert!(net <= gross);
        if let Some(balance) = self.balances.get_mut(&account) {
            *balance -= gross;
        }
        if let Some(held) = self.holdings.get_mut(&token) {
            *held -= net;
        }
        self.total_supply -= gross;
        self.fees_retained += gross - net;
    }
}
