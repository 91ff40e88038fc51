//! The fund: a pause-gated authorization state machine wrapping the ledger,
//! the token registry, and the pure fee/deviation calculators.
//!
//! Every mutating operation validates all preconditions first, performs its
//! single external call (asset transfer or rebalance execution), and only
//! then commits state, so a failed collaborator call leaves the fund
//! untouched. All mutators take `&mut self`; a service embedding a `Fund`
//! serializes concurrent requests behind one mutex.

use log::{info, warn};

use crate::asset::AssetGateway;
use crate::deviation::{self, DeviationReport};
use crate::error::{Error, Result};
use crate::executor::RebalanceExecutor;
use crate::fee::{self, management_fee};
use crate::ledger::Ledger;
use crate::registry::{Registry, MAX_TOKENS};
use crate::types::{Address, Amount, Tick, TokenId};

/// Drift must strictly exceed this before a rebalance is authorized.
pub const REBALANCE_THRESHOLD_BPS: u64 = 500;

/// Construction parameters, usually derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct FundParams {
    /// The only address allowed to administer the fund.
    pub owner: Address,
    /// The fund's own address: the counterparty of every asset transfer, and
    /// a forbidden asset binding.
    pub address: Address,
    pub annual_fee_bps: u64,
    pub blocks_per_year: u64,
    pub rebalance_threshold_bps: u64,
    pub max_tokens: usize,
}

impl FundParams {
    /// Parameters with the standard fee, threshold and roster constants.
    pub fn new(owner: Address, address: Address) -> Self {
        Self {
            owner,
            address,
            annual_fee_bps: fee::ANNUAL_FEE_BPS,
            blocks_per_year: fee::BLOCKS_PER_YEAR,
            rebalance_threshold_bps: REBALANCE_THRESHOLD_BPS,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Pooled-asset index fund instance. Owns all mutable state; external asset
/// movement and rebalance execution stay behind their trait seams.
pub struct Fund<G: AssetGateway> {
    params: FundParams,
    paused: bool,
    tick: Tick,
    last_rebalance_tick: Tick,
    ledger: Ledger,
    registry: Registry,
    assets: G,
    executor: Box<dyn RebalanceExecutor>,
}

impl<G: AssetGateway> Fund<G> {
    pub fn new(params: FundParams, assets: G, executor: Box<dyn RebalanceExecutor>) -> Self {
        let registry = Registry::new(params.max_tokens, params.address);
        Self {
            params,
            paused: false,
            tick: 0,
            last_rebalance_tick: 0,
            ledger: Ledger::new(),
            registry,
            assets,
            executor,
        }
    }

    // === Administration ===

    /// Whitelist a token with a fixed target weight and asset binding.
    /// Owner-only; allowed while paused.
    pub fn add_token(
        &mut self,
        caller: Address,
        token: TokenId,
        target_weight_bps: u64,
        asset: Address,
    ) -> Result<()> {
        self.require_owner(caller)?;
        self.registry.add(token, target_weight_bps, asset)?;
        info!("token {token} registered: weight {target_weight_bps} bps, asset {asset}");
        Ok(())
    }

    /// Post a market price. Owner-only; allowed while paused; no staleness
    /// or oracle validation.
    pub fn update_price(&mut self, caller: Address, token: TokenId, price: Amount) -> Result<()> {
        self.require_owner(caller)?;
        self.registry.set_price(token, price)?;
        info!("price posted for {token}: {price}");
        Ok(())
    }

    /// Halt all balance-mutating operations. Idempotent.
    pub fn pause(&mut self, caller: Address) -> Result<()> {
        self.require_owner(caller)?;
        if !self.paused {
            warn!("fund paused at tick {}", self.tick);
        }
        self.paused = true;
        Ok(())
    }

    /// Return to active operation. Idempotent.
    pub fn resume(&mut self, caller: Address) -> Result<()> {
        self.require_owner(caller)?;
        if self.paused {
            info!("fund resumed at tick {}", self.tick);
        }
        self.paused = false;
        Ok(())
    }

    // === Balance-mutating operations ===

    /// Deposit `amount` units of `token` into the pool. The external asset
    /// contract moves the tokens first; the ledger credits only after that
    /// transfer succeeds.
    pub fn deposit(
        &mut self,
        caller: Address,
        token: TokenId,
        asset: Address,
        amount: Amount,
    ) -> Result<()> {
        self.require_active()?;
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let bound = self.require_binding(token, asset)?;
        self.ledger.check_credit(caller, token, amount)?;

        self.assets
            .transfer(bound, amount, caller, self.params.address, "deposit")?;
        self.ledger.credit(caller, token, amount);

        info!("deposit: {caller} +{amount} {token} (supply {})", self.ledger.total_supply());
        Ok(())
    }

    /// Withdraw `amount` units gross. The time-prorated management fee is
    /// retained in the pool; the net remainder is transferred out. Returns
    /// the net amount transferred.
    pub fn withdraw(
        &mut self,
        caller: Address,
        token: TokenId,
        asset: Address,
        amount: Amount,
    ) -> Result<Amount> {
        self.require_active()?;
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let bound = self.require_binding(token, asset)?;

        let elapsed = self.tick - self.last_rebalance_tick;
        let fee = management_fee(
            amount,
            elapsed,
            self.params.annual_fee_bps,
            self.params.blocks_per_year,
        );
        let net = amount - fee;
        self.ledger.check_debit(caller, token, amount, net)?;

        // A fully-consumed withdrawal has nothing to move externally.
        if net > 0 {
            self.assets
                .transfer(bound, net, self.params.address, caller, "withdraw")?;
        }
        self.ledger.debit(caller, token, amount, net);

        info!(
            "withdraw: {caller} -{amount} {token} (fee {fee}, net {net}, supply {})",
            self.ledger.total_supply()
        );
        Ok(net)
    }

    /// Trigger a rebalance. Owner-only, active-only; authorized only when
    /// aggregate drift strictly exceeds the threshold. The rebalance tick
    /// commits only after the executor succeeds.
    pub fn rebalance(&mut self, caller: Address) -> Result<DeviationReport> {
        self.require_owner(caller)?;
        self.require_active()?;

        let report = deviation::deviation_report(&self.registry, &self.ledger);
        if report.total_bps <= self.params.rebalance_threshold_bps {
            return Err(Error::ThresholdNotMet {
                deviation_bps: report.total_bps,
                threshold_bps: self.params.rebalance_threshold_bps,
            });
        }

        self.executor.execute(&report)?;
        self.last_rebalance_tick = self.tick;
        info!(
            "rebalanced at tick {}: drift was {} bps",
            self.tick, report.total_bps
        );
        Ok(report)
    }

    /// Advance the block clock. Monotonic by construction.
    pub fn advance_ticks(&mut self, ticks: u64) {
        self.tick = self.tick.saturating_add(ticks);
    }

    // === Reads ===

    pub fn balance(&self, account: Address) -> Amount {
        self.ledger.balance(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Fund-wide position in one token.
    pub fn holdings(&self, token: TokenId) -> Amount {
        self.ledger.holdings(token)
    }

    pub fn fees_retained(&self) -> Amount {
        self.ledger.fees_retained()
    }

    pub fn is_supported(&self, token: TokenId) -> bool {
        self.registry.is_supported(token)
    }

    /// Target weight in bps; 0 for unknown tokens.
    pub fn token_weight(&self, token: TokenId) -> u64 {
        self.registry.target_weight(token)
    }

    /// Last posted price; 0 until the owner posts one.
    pub fn price(&self, token: TokenId) -> Amount {
        self.registry.price(token)
    }

    /// Registered identifiers in registration order.
    pub fn supported_tokens(&self) -> &[TokenId] {
        self.registry.roster()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn last_rebalance_tick(&self) -> Tick {
        self.last_rebalance_tick
    }

    /// Current drift across the roster.
    pub fn deviation_report(&self) -> DeviationReport {
        deviation::deviation_report(&self.registry, &self.ledger)
    }

    pub fn params(&self) -> &FundParams {
        &self.params
    }

    /// The asset gateway, for inspection in tests.
    pub fn assets(&self) -> &G {
        &self.assets
    }

    /// Conservation invariant check. Test hook.
    pub fn conserved(&self) -> bool {
        self.ledger.conserved()
    }

    // === Precondition helpers ===

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.params.owner {
            return Err(Error::NotAuthorized(caller));
        }
        Ok(())
    }

    fn require_active(&self) -> Result<()> {
        if self.paused {
            return Err(Error::Paused);
        }
        Ok(())
    }

    /// Token must be registered and the caller-supplied asset must match the
    /// registered binding. Returns the bound address.
    fn require_binding(&self, token: TokenId, supplied: Address) -> Result<Address> {
        let entry = self
            .registry
            .entry(token)
            .ok_or(Error::UnsupportedToken(token))?;
        if entry.asset != supplied {
            return Err(Error::AssetMismatch {
                token,
                supplied,
                registered: entry.asset,
            });
        }
        Ok(entry.asset)
    }
}
