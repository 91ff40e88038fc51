//! Error types for the fund engine.

use std::path::PathBuf;

use crate::asset::AssetError;
use crate::executor::ExecutionError;
use crate::types::{Address, Amount, TokenId};

/// All errors returned by fund operations and the surrounding tooling.
///
/// Every operation fails fast on the first violated precondition with a
/// specific variant and no partial state mutation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("caller {0} is not the fund owner")]
    NotAuthorized(Address),

    #[error("fund is paused")]
    Paused,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("target weight must be greater than zero")]
    InvalidWeight,

    #[error("price must be greater than zero")]
    InvalidPrice,

    #[error("token {0} is already registered")]
    DuplicateToken(TokenId),

    #[error("token roster is full ({max} tokens)")]
    TooManyTokens { max: usize },

    #[error("token {0} is not registered")]
    UnsupportedToken(TokenId),

    #[error("asset contract must not be the fund itself")]
    SelfReference,

    #[error("asset {supplied} does not match the binding {registered} for token {token}")]
    AssetMismatch {
        token: TokenId,
        supplied: Address,
        registered: Address,
    },

    #[error("insufficient balance: have {available}, need {requested}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("deviation {deviation_bps} bps does not exceed threshold {threshold_bps} bps")]
    ThresholdNotMet {
        deviation_bps: u64,
        threshold_bps: u64,
    },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("asset transfer failed: {0}")]
    TransferFailed(#[from] AssetError),

    #[error("rebalance execution failed: {0}")]
    ExecutionFailed(#[from] ExecutionError),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("failed to read scenario file {path}: {source}")]
    ScenarioRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scenario JSON: {0}")]
    ScenarioParse(#[from] serde_json::Error),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
