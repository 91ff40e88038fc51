//! TOML configuration loading and validation.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fee;
use crate::fund::{FundParams, REBALANCE_THRESHOLD_BPS};
use crate::registry::MAX_TOKENS;
use crate::types::Address;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fund: FundSection,
    #[serde(default)]
    pub fees: FeeSection,
    #[serde(default)]
    pub rebalance: RebalanceSection,
    #[serde(default)]
    pub registry: RegistrySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FundSection {
    pub owner: Address,
    pub address: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeSection {
    #[serde(default = "default_annual_fee_bps")]
    pub annual_fee_bps: u64,
    #[serde(default = "default_blocks_per_year")]
    pub blocks_per_year: u64,
}

fn default_annual_fee_bps() -> u64 {
    fee::ANNUAL_FEE_BPS
}
fn default_blocks_per_year() -> u64 {
    fee::BLOCKS_PER_YEAR
}

impl Default for FeeSection {
    fn default() -> Self {
        Self {
            annual_fee_bps: default_annual_fee_bps(),
            blocks_per_year: default_blocks_per_year(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceSection {
    #[serde(default = "default_threshold_bps")]
    pub threshold_bps: u64,
}

fn default_threshold_bps() -> u64 {
    REBALANCE_THRESHOLD_BPS
}

impl Default for RebalanceSection {
    fn default() -> Self {
        Self {
            threshold_bps: default_threshold_bps(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySection {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_max_tokens() -> usize {
    MAX_TOKENS
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

impl Default for Config {
    /// Owner at address 1, fund at address 100, standard constants.
    fn default() -> Self {
        Self {
            fund: FundSection {
                owner: Address(1),
                address: Address(100),
            },
            fees: FeeSection::default(),
            rebalance: RebalanceSection::default(),
            registry: RegistrySection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        if self.fund.owner == self.fund.address {
            return Err(Error::Config(
                "fund owner and fund address must differ".into(),
            ));
        }
        if self.fees.annual_fee_bps > 10_000 {
            return Err(Error::Config("annual_fee_bps must be <= 10000".into()));
        }
        if self.fees.blocks_per_year == 0 {
            return Err(Error::Config("blocks_per_year must be > 0".into()));
        }
        if self.registry.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be >= 1".into()));
        }
        Ok(())
    }

    /// Fund construction parameters from this config.
    pub fn params(&self) -> FundParams {
        FundParams {
            owner: self.fund.owner,
            address: self.fund.address,
            annual_fee_bps: self.fees.annual_fee_bps,
            blocks_per_year: self.fees.blocks_per_year,
            rebalance_threshold_bps: self.rebalance.threshold_bps,
            max_tokens: self.registry.max_tokens,
        }
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> std::path::PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[fund]
owner = 1
address = 100

[fees]
annual_fee_bps = 30
blocks_per_year = 52560

[rebalance]
threshold_bps = 500

[registry]
max_tokens = 10

[logging]
dir = "./logs"
audit_file = "audit.jsonl"
"#
    }

    #[test]
    fn parse_example_config() {
        let config: Config = toml::from_str(example_toml()).unwrap();
        assert_eq!(config.fund.owner, Address(1));
        assert_eq!(config.fund.address, Address(100));
        assert_eq!(config.fees.annual_fee_bps, 30);
        assert_eq!(config.fees.blocks_per_year, 52_560);
        assert_eq!(config.rebalance.threshold_bps, 500);
        assert_eq!(config.registry.max_tokens, 10);
    }

    #[test]
    fn sections_default_when_omitted() {
        let config: Config = toml::from_str("[fund]\nowner = 1\naddress = 100\n").unwrap();
        assert_eq!(config.fees.annual_fee_bps, 30);
        assert_eq!(config.fees.blocks_per_year, 52_560);
        assert_eq!(config.rebalance.threshold_bps, 500);
        assert_eq!(config.registry.max_tokens, 10);
        assert_eq!(config.logging.audit_file, "audit.jsonl");
        config.validate().unwrap();
    }

    #[test]
    fn validate_catches_owner_address_clash() {
        let mut config: Config = toml::from_str(example_toml()).unwrap();
        config.fund.address = config.fund.owner;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_fee_over_100_percent() {
        let mut config: Config = toml::from_str(example_toml()).unwrap();
        config.fees.annual_fee_bps = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_zero_blocks_per_year() {
        let mut config: Config = toml::from_str(example_toml()).unwrap();
        config.fees.blocks_per_year = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_zero_max_tokens() {
        let mut config: Config = toml::from_str(example_toml()).unwrap();
        config.registry.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn params_conversion() {
        let config: Config = toml::from_str(example_toml()).unwrap();
        let params = config.params();
        assert_eq!(params.owner, Address(1));
        assert_eq!(params.rebalance_threshold_bps, 500);
        assert_eq!(params.max_tokens, 10);
    }

    #[test]
    fn audit_path() {
        let config: Config = toml::from_str(example_toml()).unwrap();
        assert_eq!(
            config.audit_path(),
            std::path::PathBuf::from("./logs/audit.jsonl")
        );
    }

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }
}
