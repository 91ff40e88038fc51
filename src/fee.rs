//! Time-prorated management fee.
//!
//! The fee clock is shared: it measures blocks since the last portfolio-wide
//! rebalance, not a per-account cost basis, so every withdrawal in the same
//! window pays the same rate.

use crate::types::Amount;

/// Annual management fee: 30 bps = 0.30% per year.
pub const ANNUAL_FEE_BPS: u64 = 30;

/// Chain-specific block cadence.
pub const BLOCKS_PER_YEAR: u64 = 52_560;

/// 10000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// `floor(amount * annual_fee_bps * blocks_elapsed / (10000 * blocks_per_year))`,
/// capped at `amount` so the net payout can never go negative.
///
/// Floor division means the fee is 0 for small amounts or short windows.
pub fn management_fee(
    amount: Amount,
    blocks_elapsed: u64,
    annual_fee_bps: u64,
    blocks_per_year: u64,
) -> Amount {
    if blocks_per_year == 0 {
        // Degenerate config, rejected by Config::validate; treat as no fee.
        return 0;
    }
    let denom = BPS_DENOMINATOR as u128 * blocks_per_year as u128;
    let fee = match (amount as u128 * annual_fee_bps as u128).checked_mul(blocks_elapsed as u128) {
        Some(numer) => (numer / denom).min(amount as u128),
        // Numerator beyond u128: the cap dominates.
        None => amount as u128,
    };
    fee as Amount
}
