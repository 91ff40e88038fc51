//! External fungible-asset contract boundary.
//!
//! The fund never holds real tokens itself; deposits and withdrawals delegate
//! the actual asset movement to whichever contract is bound to the token.
//! Everything behind [`AssetGateway`] is an external collaborator — inject
//! [`crate::mock::MockGateway`] in tests.

use rustc_hash::FxHashMap;

use crate::types::{Address, Amount};

/// Errors surfaced by external asset contracts.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no asset contract bound at {0}")]
    UnknownAsset(Address),

    #[error("insufficient funds at {owner}: have {available}, need {requested}")]
    InsufficientFunds {
        owner: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// The standard fungible-asset interface the fund calls but does not implement.
pub trait AssetContract {
    fn transfer(
        &mut self,
        amount: Amount,
        from: Address,
        to: Address,
        memo: &str,
    ) -> Result<(), AssetError>;
    fn balance_of(&self, owner: Address) -> Amount;
    fn total_supply(&self) -> Amount;
    fn decimals(&self) -> u8;
    fn name(&self) -> String;
    fn symbol(&self) -> String;
}

/// Dispatches a transfer to whichever contract is bound at an address.
pub trait AssetGateway {
    fn transfer(
        &mut self,
        asset: Address,
        amount: Amount,
        from: Address,
        to: Address,
        memo: &str,
    ) -> Result<(), AssetError>;
}

/// Address-keyed directory of asset contracts.
#[derive(Default)]
pub struct AssetDirectory {
    contracts: FxHashMap<Address, Box<dyn AssetContract>>,
}

impl AssetDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a contract at an address, replacing any previous binding.
    pub fn bind(&mut self, address: Address, contract: Box<dyn AssetContract>) {
        self.contracts.insert(address, contract);
    }

    pub fn contract(&self, address: Address) -> Option<&dyn AssetContract> {
        self.contracts.get(&address).map(|c| c.as_ref())
    }
}

impl AssetGateway for AssetDirectory {
    fn transfer(
        &mut self,
        asset: Address,
        amount: Amount,
        from: Address,
        to: Address,
        memo: &str,
    ) -> Result<(), AssetError> {
        self.contracts
            .get_mut(&asset)
            .ok_or(AssetError::UnknownAsset(asset))?
            .transfer(amount, from, to, memo)
    }
}
