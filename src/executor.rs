//! Rebalance execution seam.
//!
//! The fund only decides *whether* rebalancing is authorized and how much
//! drift exists; actually moving the portfolio back to target is delegated
//! here. Ship [`NoopExecutor`] until a real trading integration exists.

use crate::deviation::DeviationReport;

/// Failure reported by a rebalance-execution backend.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ExecutionError(pub String);

pub trait RebalanceExecutor {
    /// Bring live weights back toward target. Invoked only after the drift
    /// threshold check has passed; the rebalance tick commits only if this
    /// returns `Ok`.
    fn execute(&mut self, report: &DeviationReport) -> Result<(), ExecutionError>;
}

/// Accepts every trigger and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExecutor;

impl RebalanceExecutor for NoopExecutor {
    fn execute(&mut self, _report: &DeviationReport) -> Result<(), ExecutionError> {
        Ok(())
    }
}
