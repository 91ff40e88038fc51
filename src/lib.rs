//! # nanofund
//!
//! A pooled-asset index fund engine: users deposit whitelisted tokens, hold
//! proportional claims in one ledger, pay a time-prorated management fee on
//! withdrawal, and the owner triggers rebalancing once live allocation
//! weights drift past a threshold.
//!
//! ## Features
//!
//! - **Balance ledger**: per-account claims, fund-wide per-token holdings,
//!   and aggregate supply that move together or not at all
//! - **Token registry**: bounded append-only whitelist with target weights,
//!   posted prices, and per-token asset-contract bindings
//! - **Prorated fees**: `floor(amount * 30 bps * blocks / (10000 * blocks-per-year))`,
//!   clocked from the last portfolio-wide rebalance
//! - **Drift gating**: rebalancing is authorized only when aggregate
//!   deviation strictly exceeds 500 bps
//! - **Trait seams**: external asset movement ([`AssetGateway`]) and trade
//!   execution ([`RebalanceExecutor`]) stay injectable; mocks ship in
//!   [`mock`]
//!
//! ## Quick Start
//!
//! ```
//! use nanofund::mock::MockGateway;
//! use nanofund::{Address, Fund, FundParams, NoopExecutor, TokenId};
//!
//! let owner = Address(1);
//! let alice = Address(7);
//! let gold = TokenId::new("GOLD");
//! let gold_asset = Address(0x10);
//!
//! let assets = MockGateway::builder().with_accepting(gold_asset).build();
//! let mut fund = Fund::new(
//!     FundParams::new(owner, Address(0xF0)),
//!     assets,
//!     Box::new(NoopExecutor),
//! );
//!
//! fund.add_token(owner, gold, 2500, gold_asset).unwrap();
//! fund.deposit(alice, gold, gold_asset, 1_000).unwrap();
//! assert_eq!(fund.balance(alice), 1_000);
//! assert_eq!(fund.total_supply(), 1_000);
//!
//! // No blocks have elapsed since the last rebalance, so no fee accrues.
//! let net = fund.withdraw(alice, gold, gold_asset, 500).unwrap();
//! assert_eq!(net, 500);
//! assert_eq!(fund.total_supply(), 500);
//! ```
//!
//! ## Drift and rebalancing
//!
//! Live weight per token is `floor(holdings * price / total_supply)` over the
//! fund-wide position; the roster's summed absolute deviation from target
//! gates the trigger:
//!
//! ```
//! use nanofund::mock::MockGateway;
//! use nanofund::{Address, Error, Fund, FundParams, NoopExecutor, TokenId};
//!
//! let owner = Address(1);
//! let gold = TokenId::new("GOLD");
//! let asset = Address(0x10);
//!
//! let gateway = MockGateway::builder().with_accepting(asset).build();
//! let mut fund = Fund::new(FundParams::new(owner, Address(0xF0)), gateway, Box::new(NoopExecutor));
//!
//! fund.add_token(owner, gold, 2500, asset).unwrap();
//! fund.update_price(owner, gold, 2500).unwrap();
//! fund.deposit(Address(7), gold, asset, 1_000).unwrap();
//!
//! // live = 1000 * 2500 / 1000 = 2500 bps: exactly on target.
//! assert!(matches!(
//!     fund.rebalance(owner),
//!     Err(Error::ThresholdNotMet { deviation_bps: 0, .. })
//! ));
//! ```
//!
//! ## Concurrency
//!
//! There is none inside the crate: every mutating operation takes `&mut self`
//! and commits or aborts as one unit. A service exposing a fund to concurrent
//! callers serializes them behind a single `Mutex<Fund<_>>`.

pub mod asset;
pub mod audit;
pub mod config;
pub mod deviation;
mod error;
pub mod executor;
mod fee;
mod fund;
mod ledger;
pub mod mock;
mod registry;
pub mod scenario;
mod types;

// Re-export public API
pub use asset::{AssetContract, AssetDirectory, AssetError, AssetGateway};
pub use deviation::{deviation_report, DeviationReport, TokenDeviation};
pub use error::{Error, Result};
pub use executor::{ExecutionError, NoopExecutor, RebalanceExecutor};
pub use fee::{management_fee, ANNUAL_FEE_BPS, BLOCKS_PER_YEAR, BPS_DENOMINATOR};
pub use fund::{Fund, FundParams, REBALANCE_THRESHOLD_BPS};
pub use ledger::Ledger;
pub use registry::{Registry, TokenEntry, MAX_TOKENS};
pub use types::{Address, Amount, Tick, TokenId};
