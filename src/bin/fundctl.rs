//! CLI entry point: drive scripted fund scenarios against mock assets.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use nanofund::audit::{self, AuditLog};
use nanofund::config::Config;
use nanofund::mock::MockGateway;
use nanofund::scenario::{Scenario, Step};
use nanofund::{Address, Error, Fund, NoopExecutor, Result, TokenId};

#[derive(Parser)]
#[command(name = "fundctl")]
#[command(about = "Index fund engine: run scripted scenarios against mock assets")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scenario file against a fresh fund
    Run {
        /// Path to scenario.json
        scenario: PathBuf,

        /// Skip the JSONL audit trail
        #[arg(long)]
        no_audit: bool,
    },

    /// Validate the config file
    Check,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Run { scenario, no_audit } => run(&config, &scenario, no_audit),
        Command::Check => {
            println!(
                "Config OK: owner {}, fund {}, fee {} bps/yr, threshold {} bps, max {} tokens",
                config.fund.owner,
                config.fund.address,
                config.fees.annual_fee_bps,
                config.rebalance.threshold_bps,
                config.registry.max_tokens,
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Load the config file, falling back to defaults when the default path is
/// absent (scenarios are self-contained; the config only tunes constants).
fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else if path == Path::new("config.toml") {
        log::warn!("{} not found, using default config", path.display());
        Ok(Config::default())
    } else {
        Err(Error::Config(format!("{} not found", path.display())))
    }
}

fn run(config: &Config, path: &Path, no_audit: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;

    // Every referenced asset contract becomes an accept-mode mock.
    let mut builder = MockGateway::builder();
    for asset in scenario.assets() {
        builder = builder.with_accepting(asset);
    }
    let mut fund = Fund::new(config.params(), builder.build(), Box::new(NoopExecutor));
    let owner = config.fund.owner;

    let mut audit_log = if no_audit {
        None
    } else {
        Some(AuditLog::open(&config.audit_path())?)
    };
    if let Some(a) = audit_log.as_mut() {
        audit::log_session_started(a, &scenario.name, owner)?;
    }

    println!("Scenario: {} ({} steps)", scenario.name, scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        print!("[{}/{}] ", i + 1, scenario.steps.len());
        apply_step(&mut fund, owner, step, &mut audit_log)?;
    }

    println!(
        "\nDone: supply {}, fees retained {}, tick {}",
        fund.total_supply(),
        fund.fees_retained(),
        fund.tick(),
    );
    print!("\n{}", fund.deviation_report());

    if !no_audit {
        println!("Audit logged to {}", config.audit_path().display());
    }
    Ok(())
}

fn token_id(s: &str) -> Result<TokenId> {
    TokenId::try_new(s).ok_or_else(|| Error::Scenario(format!("invalid token id {s:?}")))
}

fn apply_step(
    fund: &mut Fund<MockGateway>,
    owner: Address,
    step: &Step,
    audit_log: &mut Option<AuditLog>,
) -> Result<()> {
    match step {
        Step::AddToken {
            token,
            weight_bps,
            asset,
        } => {
            let token = token_id(token)?;
            reject_to_audit(audit_log, "add_token", fund.add_token(owner, token, *weight_bps, *asset))?;
            println!("add_token {token}: weight {weight_bps} bps, asset {asset}");
            if let Some(a) = audit_log.as_mut() {
                audit::log_token_added(a, token, *weight_bps, *asset)?;
            }
        }
        Step::UpdatePrice { token, price } => {
            let token = token_id(token)?;
            reject_to_audit(audit_log, "update_price", fund.update_price(owner, token, *price))?;
            println!("update_price {token} = {price}");
            if let Some(a) = audit_log.as_mut() {
                audit::log_price_updated(a, token, *price)?;
            }
        }
        Step::Deposit {
            caller,
            token,
            asset,
            amount,
        } => {
            let token = token_id(token)?;
            reject_to_audit(
                audit_log,
                "deposit",
                fund.deposit(*caller, token, *asset, *amount),
            )?;
            println!("deposit {caller}: +{amount} {token} (supply {})", fund.total_supply());
            if let Some(a) = audit_log.as_mut() {
                audit::log_deposit(a, *caller, token, *amount, fund.total_supply())?;
            }
        }
        Step::Withdraw {
            caller,
            token,
            asset,
            amount,
        } => {
            let token = token_id(token)?;
            let net = reject_to_audit(
                audit_log,
                "withdraw",
                fund.withdraw(*caller, token, *asset, *amount),
            )?;
            println!(
                "withdraw {caller}: -{amount} {token} (fee {}, net {net}, supply {})",
                amount - net,
                fund.total_supply(),
            );
            if let Some(a) = audit_log.as_mut() {
                audit::log_withdraw(a, *caller, token, *amount, net, fund.total_supply())?;
            }
        }
        Step::Rebalance => {
            let report = reject_to_audit(audit_log, "rebalance", fund.rebalance(owner))?;
            println!("rebalance: drift was {} bps, tick {}", report.total_bps, fund.tick());
            if let Some(a) = audit_log.as_mut() {
                audit::log_rebalance(a, fund.tick(), &report)?;
            }
        }
        Step::Pause => {
            reject_to_audit(audit_log, "pause", fund.pause(owner))?;
            println!("pause");
            if let Some(a) = audit_log.as_mut() {
                audit::log_pause_state(a, true)?;
            }
        }
        Step::Resume => {
            reject_to_audit(audit_log, "resume", fund.resume(owner))?;
            println!("resume");
            if let Some(a) = audit_log.as_mut() {
                audit::log_pause_state(a, false)?;
            }
        }
        Step::Advance { ticks } => {
            fund.advance_ticks(*ticks);
            println!("advance {ticks} ticks (now {})", fund.tick());
        }
        Step::AssertBalance { account, expected } => {
            let actual = fund.balance(*account);
            if actual != *expected {
                return Err(Error::Scenario(format!(
                    "assert_balance failed for {account}: expected {expected}, got {actual}"
                )));
            }
            println!("assert_balance {account} == {expected}");
        }
        Step::AssertSupply { expected } => {
            let actual = fund.total_supply();
            if actual != *expected {
                return Err(Error::Scenario(format!(
                    "assert_supply failed: expected {expected}, got {actual}"
                )));
            }
            println!("assert_supply == {expected}");
        }
    }
    Ok(())
}

/// Record a rejected operation in the audit trail before propagating it.
fn reject_to_audit<T>(
    audit_log: &mut Option<AuditLog>,
    op: &str,
    result: Result<T>,
) -> Result<T> {
    match result {
        Ok(v) => Ok(v),
        Err(e) => {
            if let Some(a) = audit_log.as_mut() {
                audit::log_rejected(a, op, &e.to_string())?;
            }
            Err(e)
        }
    }
}
