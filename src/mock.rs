//! Mock asset contracts for testing — configurable accept/reject behavior
//! and a recorded transfer log.
//!
//! Use this in tests (and the `fundctl` scenario runner) to drive deposits and
//! withdrawals without a real asset backend.
//!
//! ```
//! use nanofund::mock::{MockAsset, MockGateway, TransferMode};
//! use nanofund::Address;
//!
//! let gateway = MockGateway::builder()
//!     .with_asset(
//!         Address(0x10),
//!         MockAsset::builder()
//!             .name("Tokenized Gold", "GOLD")
//!             .with_balance(Address(7), 1_000_000)
//!             .mode(TransferMode::Enforce)
//!             .build(),
//!     )
//!     .build();
//! ```

use rustc_hash::FxHashMap;

use crate::asset::{AssetContract, AssetError, AssetGateway};
use crate::types::{Address, Amount};

/// How a mock asset handles transfer calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    /// Every transfer succeeds; balances are adjusted but never enforced.
    Accept,
    /// Transfers succeed only if the sender's balance covers the amount.
    Enforce,
    /// Every transfer is rejected.
    Reject,
}

/// A transfer that went through the gateway, recorded for test assertions.
#[derive(Clone, Debug)]
pub struct RecordedTransfer {
    pub asset: Address,
    pub amount: Amount,
    pub from: Address,
    pub to: Address,
    pub memo: String,
}

/// Builder for [`MockAsset`].
pub struct MockAssetBuilder {
    name: String,
    symbol: String,
    decimals: u8,
    mode: TransferMode,
    balances: FxHashMap<Address, Amount>,
}

impl MockAssetBuilder {
    pub fn name(mut self, name: &str, symbol: &str) -> Self {
        self.name = name.to_string();
        self.symbol = symbol.to_string();
        self
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_balance(mut self, owner: Address, amount: Amount) -> Self {
        self.balances.insert(owner, amount);
        self
    }

    pub fn build(self) -> MockAsset {
        MockAsset {
            name: self.name,
            symbol: self.symbol,
            decimals: self.decimals,
            mode: self.mode,
            balances: self.balances,
        }
    }
}

/// In-memory fungible asset with configurable transfer behavior.
pub struct MockAsset {
    name: String,
    symbol: String,
    decimals: u8,
    mode: TransferMode,
    balances: FxHashMap<Address, Amount>,
}

impl MockAsset {
    pub fn builder() -> MockAssetBuilder {
        MockAssetBuilder {
            name: "Mock Asset".into(),
            symbol: "MOCK".into(),
            decimals: 8,
            mode: TransferMode::Accept,
            balances: FxHashMap::default(),
        }
    }

    /// Accept-mode asset with no seeded balances.
    pub fn accepting() -> Self {
        Self::builder().build()
    }
}

impl AssetContract for MockAsset {
    fn transfer(
        &mut self,
        amount: Amount,
        from: Address,
        to: Address,
        _memo: &str,
    ) -> Result<(), AssetError> {
        match self.mode {
            TransferMode::Reject => {
                return Err(AssetError::Rejected(format!("{}: transfers disabled", self.symbol)));
            }
            TransferMode::Enforce => {
                let available = self.balance_of(from);
                if available < amount {
                    return Err(AssetError::InsufficientFunds {
                        owner: from,
                        available,
                        requested: amount,
                    });
                }
            }
            TransferMode::Accept => {}
        }

        // Accept mode lets the sender go to zero rather than fail.
        let from_balance = self.balances.entry(from).or_insert(0);
        *from_balance = from_balance.saturating_sub(amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    fn balance_of(&self, owner: Address) -> Amount {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Amount {
        self.balances.values().sum()
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn symbol(&self) -> String {
        self.symbol.clone()
    }
}

/// Builder for [`MockGateway`].
#[derive(Default)]
pub struct MockGatewayBuilder {
    assets: Vec<(Address, MockAsset)>,
}

impl MockGatewayBuilder {
    pub fn with_asset(mut self, address: Address, asset: MockAsset) -> Self {
        self.assets.push((address, asset));
        self
    }

    /// Shorthand for an accept-mode asset bound at `address`.
    pub fn with_accepting(self, address: Address) -> Self {
        self.with_asset(address, MockAsset::accepting())
    }

    pub fn build(self) -> MockGateway {
        MockGateway {
            assets: self.assets.into_iter().collect(),
            transfers: Vec::new(),
        }
    }
}

/// Gateway over mock assets that records every successful transfer.
pub struct MockGateway {
    assets: FxHashMap<Address, MockAsset>,
    transfers: Vec<RecordedTransfer>,
}

impl MockGateway {
    pub fn builder() -> MockGatewayBuilder {
        MockGatewayBuilder::default()
    }

    /// Transfers that succeeded, in call order.
    pub fn transfers(&self) -> &[RecordedTransfer] {
        &self.transfers
    }

    pub fn asset(&self, address: Address) -> Option<&MockAsset> {
        self.assets.get(&address)
    }
}

impl AssetGateway for MockGateway {
    fn transfer(
        &mut self,
        asset: Address,
        amount: Amount,
        from: Address,
        to: Address,
        memo: &str,
    ) -> Result<(), AssetError> {
        self.assets
            .get_mut(&asset)
            .ok_or(AssetError::UnknownAsset(asset))?
            .transfer(amount, from, to, memo)?;

        self.transfers.push(RecordedTransfer {
            asset,
            amount,
            from,
            to,
            memo: memo.to_string(),
        });
        Ok(())
    }
}
