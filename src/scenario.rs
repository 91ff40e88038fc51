//! Scenario files: scripted operation sequences for the `fundctl` runner.
//!
//! A scenario is a JSON document naming a list of steps to drive against a
//! fresh fund backed by mock assets. Owner-only steps run as the configured
//! owner; user steps name their caller explicitly.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{Address, Amount, TokenId};

/// A scripted fund session.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub steps: Vec<Step>,
}

/// One scripted operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddToken {
        token: String,
        weight_bps: u64,
        asset: Address,
    },
    UpdatePrice {
        token: String,
        price: Amount,
    },
    Deposit {
        caller: Address,
        token: String,
        asset: Address,
        amount: Amount,
    },
    Withdraw {
        caller: Address,
        token: String,
        asset: Address,
        amount: Amount,
    },
    Rebalance,
    Pause,
    Resume,
    Advance {
        ticks: u64,
    },
    AssertBalance {
        account: Address,
        expected: Amount,
    },
    AssertSupply {
        expected: Amount,
    },
}

impl Step {
    /// The token named by this step, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Step::AddToken { token, .. }
            | Step::UpdatePrice { token, .. }
            | Step::Deposit { token, .. }
            | Step::Withdraw { token, .. } => Some(token),
            _ => None,
        }
    }

    /// The external asset contract this step touches, if any.
    pub fn asset(&self) -> Option<Address> {
        match self {
            Step::AddToken { asset, .. }
            | Step::Deposit { asset, .. }
            | Step::Withdraw { asset, .. } => Some(*asset),
            _ => None,
        }
    }
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ScenarioRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let scenario: Scenario = serde_json::from_str(&contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Validate the scripted steps.
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Scenario("scenario name is empty".into()));
        }
        if self.steps.is_empty() {
            return Err(Error::Scenario("steps list is empty".into()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Some(token) = step.token() {
                if TokenId::try_new(token).is_none() {
                    return Err(Error::Scenario(format!(
                        "step {i}: token id {token:?} must be 1..=8 bytes"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Every asset contract address referenced by the script.
    pub fn assets(&self) -> Vec<Address> {
        let mut assets: Vec<Address> = Vec::new();
        for step in &self.steps {
            if let Some(asset) = step.asset() {
                if !assets.contains(&asset) {
                    assets.push(asset);
                }
            }
        }
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> &'static str {
        r#"{
            "name": "gold and silver",
            "timestamp": "2026-08-01T12:00:00Z",
            "steps": [
                { "op": "add_token", "token": "GOLD", "weight_bps": 2500, "asset": 16 },
                { "op": "add_token", "token": "SILVER", "weight_bps": 1500, "asset": 17 },
                { "op": "update_price", "token": "GOLD", "price": 1800 },
                { "op": "deposit", "caller": 7, "token": "GOLD", "asset": 16, "amount": 1000 },
                { "op": "advance", "ticks": 52560 },
                { "op": "withdraw", "caller": 7, "token": "GOLD", "asset": 16, "amount": 500 },
                { "op": "assert_supply", "expected": 500 },
                { "op": "rebalance" }
            ]
        }"#
    }

    #[test]
    fn parse_valid_scenario() {
        let scenario = Scenario::from_json(valid_json()).unwrap();
        assert_eq!(scenario.name, "gold and silver");
        assert_eq!(scenario.steps.len(), 8);
        assert!(matches!(
            scenario.steps[0],
            Step::AddToken { weight_bps: 2500, asset: Address(16), .. }
        ));
        assert!(matches!(scenario.steps[7], Step::Rebalance));
    }

    #[test]
    fn assets_are_deduplicated() {
        let scenario = Scenario::from_json(valid_json()).unwrap();
        assert_eq!(scenario.assets(), vec![Address(16), Address(17)]);
    }

    #[test]
    fn reject_empty_steps() {
        let json = r#"{"name":"x","steps":[]}"#;
        assert!(Scenario::from_json(json).is_err());
    }

    #[test]
    fn reject_empty_name() {
        let json = r#"{"name":"","steps":[{"op":"rebalance"}]}"#;
        assert!(Scenario::from_json(json).is_err());
    }

    #[test]
    fn reject_oversized_token_id() {
        let json = r#"{
            "name": "bad token",
            "steps": [
                { "op": "add_token", "token": "TOOLONGNAME", "weight_bps": 100, "asset": 16 }
            ]
        }"#;
        let err = Scenario::from_json(json).unwrap_err();
        assert!(err.to_string().contains("TOOLONGNAME"));
    }

    #[test]
    fn reject_unknown_op() {
        let json = r#"{"name":"x","steps":[{"op":"teleport"}]}"#;
        assert!(Scenario::from_json(json).is_err());
    }

    #[test]
    fn timestamp_is_optional() {
        let json = r#"{"name":"x","steps":[{"op":"pause"}]}"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert!(scenario.timestamp.is_none());
    }
}
