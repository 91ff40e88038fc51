//! JSONL audit trail logging.
//!
//! Every fund session appends events to an audit.jsonl file, one JSON object
//! per line, flushed per record so a crash loses at most the event in flight.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::deviation::DeviationReport;
use crate::error::Result;
use crate::types::{Address, Amount, TokenId};

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

/// Convenience: log a session start.
pub fn log_session_started(audit: &mut AuditLog, scenario: &str, owner: Address) -> Result<()> {
    audit.log(
        "session_started",
        serde_json::json!({
            "scenario": scenario,
            "owner": owner,
        }),
    )
}

/// Convenience: log a token registration.
pub fn log_token_added(
    audit: &mut AuditLog,
    token: TokenId,
    weight_bps: u64,
    asset: Address,
) -> Result<()> {
    audit.log(
        "token_added",
        serde_json::json!({
            "token": token,
            "weight_bps": weight_bps,
            "asset": asset,
        }),
    )
}

/// Convenience: log a posted price.
pub fn log_price_updated(audit: &mut AuditLog, token: TokenId, price: Amount) -> Result<()> {
    audit.log(
        "price_updated",
        serde_json::json!({ "token": token, "price": price }),
    )
}

/// Convenience: log a committed deposit.
pub fn log_deposit(
    audit: &mut AuditLog,
    caller: Address,
    token: TokenId,
    amount: Amount,
    total_supply: Amount,
) -> Result<()> {
    audit.log(
        "deposit",
        serde_json::json!({
            "caller": caller,
            "token": token,
            "amount": amount,
            "total_supply": total_supply,
        }),
    )
}

/// Convenience: log a committed withdrawal with its fee split.
pub fn log_withdraw(
    audit: &mut AuditLog,
    caller: Address,
    token: TokenId,
    gross: Amount,
    net: Amount,
    total_supply: Amount,
) -> Result<()> {
    audit.log(
        "withdraw",
        serde_json::json!({
            "caller": caller,
            "token": token,
            "gross": gross,
            "fee": gross - net,
            "net": net,
            "total_supply": total_supply,
        }),
    )
}

/// Convenience: log a committed rebalance with its drift breakdown.
pub fn log_rebalance(audit: &mut AuditLog, tick: u64, report: &DeviationReport) -> Result<()> {
    audit.log(
        "rebalance",
        serde_json::json!({
            "tick": tick,
            "total_drift_bps": report.total_bps,
            "entries": report.entries,
        }),
    )
}

/// Convenience: log a pause-state change.
pub fn log_pause_state(audit: &mut AuditLog, paused: bool) -> Result<()> {
    audit.log("pause_state", serde_json::json!({ "paused": paused }))
}

/// Convenience: log a rejected operation.
pub fn log_rejected(audit: &mut AuditLog, op: &str, reason: &str) -> Result<()> {
    audit.log(
        "rejected",
        serde_json::json!({ "operation": op, "reason": reason }),
    )
}
