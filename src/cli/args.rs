use crate::core::{FeePolicy, DEFAULT_FEE_RATE};
use crate::runner::EngineConfig;
use crate::types::{AccountId, BankError};
use clap::{ArgAction, Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Run banking operations against an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "core-banker")]
#[command(about = "Run banking operations against an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Operation script; the built-in demo runs when omitted
    #[arg(value_name = "SCRIPT", help = "Path to the operation script CSV")]
    pub input_file: Option<PathBuf>,

    /// Transaction log file
    #[arg(
        long = "journal",
        value_name = "PATH",
        help = "Append settled transactions to this log file"
    )]
    pub journal: Option<PathBuf>,

    /// How log records are matched to accounts on replay
    #[arg(
        long = "replay-by",
        value_name = "MATCH",
        requires = "journal",
        help = "Restore account histories from the journal, matching by 'account' id or 'owner' name"
    )]
    pub replay_by: Option<ReplayMatch>,

    /// Account credited with transfer fees
    #[arg(
        long = "fee-sink",
        value_name = "ACCOUNT",
        help = "Charge the transfer fee and credit it to this account"
    )]
    pub fee_sink: Option<String>,

    /// Transfer fee rate
    #[arg(
        long = "fee-rate",
        value_name = "RATE",
        requires = "fee_sink",
        help = "Fraction of each transfer withheld as a fee (default: 0.02)"
    )]
    pub fee_rate: Option<Decimal>,

    /// Accounts whose history is printed after the run
    #[arg(long = "history", value_name = "ACCOUNT", action = ArgAction::Append)]
    pub history: Vec<String>,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// How replayed log records are matched to accounts
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReplayMatch {
    /// A record belongs to an account named by identifier on either leg
    Account,

    /// A record belongs to every account whose owner name appears on either
    /// leg, so accounts sharing an owner name share history
    Owner,
}

impl CliArgs {
    /// Create an EngineConfig from CLI arguments
    ///
    /// Fees stay disabled unless a fee sink is given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the fee rate is outside `0..=1` or the
    /// fee sink is blank.
    pub fn to_engine_config(&self) -> Result<EngineConfig, BankError> {
        let fee_policy = match &self.fee_sink {
            Some(sink) => {
                let sink = sink.trim();
                if sink.is_empty() {
                    return Err(BankError::invalid_config("fee sink account is empty"));
                }
                let rate = self.fee_rate.unwrap_or(DEFAULT_FEE_RATE);
                if rate < Decimal::ZERO || rate > Decimal::ONE {
                    return Err(BankError::invalid_config(format!(
                        "fee rate {} is outside 0..=1",
                        rate
                    )));
                }
                FeePolicy::Percentage {
                    rate,
                    sink: AccountId::new(sink),
                }
            }
            None => FeePolicy::None,
        };

        Ok(EngineConfig {
            fee_policy,
            journal: self.journal.clone(),
            replay: self.replay_by,
        })
    }
}
