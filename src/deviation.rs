//! Aggregate weight deviation between target and live allocations.
//!
//! Live weight per token is derived from the fund-wide position in that token
//! (the `holdings` column of the ledger), never from one caller's balance:
//! `live = floor(holdings * price / total_supply)`. Deviation per token is the
//! absolute difference from the target weight; the roster total gates
//! rebalancing upstream.

use serde::Serialize;

use crate::ledger::Ledger;
use crate::registry::Registry;
use crate::types::TokenId;

/// Per-token drift breakdown plus the roster total.
#[derive(Debug, Clone, Serialize)]
pub struct DeviationReport {
    pub entries: Vec<TokenDeviation>,
    pub total_bps: u64,
}

/// One token's target vs live weight.
#[derive(Debug, Clone, Serialize)]
pub struct TokenDeviation {
    pub token: TokenId,
    pub target_bps: u64,
    pub live_bps: u64,
    pub deviation_bps: u64,
}

/// Compute the drift report across the whole roster, in registration order.
///
/// With zero supply every live weight is 0, so the total equals the sum of
/// target weights.
pub fn deviation_report(registry: &Registry, ledger: &Ledger) -> DeviationReport {
    let supply = ledger.total_supply();
    let mut entries = Vec::with_capacity(registry.len());
    let mut total_bps: u64 = 0;

    for &token in registry.roster() {
        let Some(entry) = registry.entry(token) else {
            continue; // roster and entries move together; unreachable in practice
        };

        let live_bps = if supply == 0 {
            0
        } else {
            let held = ledger.holdings(token) as u128;
            (held * entry.price as u128 / supply as u128).min(u64::MAX as u128) as u64
        };

        let deviation_bps = entry.target_weight_bps.abs_diff(live_bps);
        total_bps = total_bps.saturating_add(deviation_bps);

        entries.push(TokenDeviation {
            token,
            target_bps: entry.target_weight_bps,
            live_bps,
            deviation_bps,
        });
    }

    DeviationReport { entries, total_bps }
}

impl std::fmt::Display for DeviationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ALLOCATION DRIFT:")?;
        writeln!(
            f,
            "  {:8} {:>10} {:>10} {:>10}",
            "Token", "Target", "Live", "Drift"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:8} {:>7} bps {:>7} bps {:>7} bps",
                e.token.as_str(),
                e.target_bps,
                e.live_bps,
                e.deviation_bps,
            )?;
        }
        writeln!(f, "\n  Total drift: {} bps", self.total_bps)?;
        Ok(())
    }
}
