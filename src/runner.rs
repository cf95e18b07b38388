//! Script runner
//!
//! Orchestrates a run by coordinating between the `ScriptReader` (operation
//! input), the `TransactionEngine` (business logic) and
//! `csv_format::write_accounts_csv` (account output).
//!
//! Fatal errors (missing script, unreadable journal, failed output) end the
//! run. A malformed row or a rejected operation is logged at `warn` and the
//! run continues with the next row.

use crate::cli::ReplayMatch;
use crate::core::{FeePolicy, TransactionEngine};
use crate::io::{write_accounts_csv, FileLog, ScriptReader};
use crate::types::{BankError, LogRecord, Operation};
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Owner name of the account that collects transfer fees
pub const FEE_SINK_OWNER: &str = "Bank fees";

/// Script run when no script is given
///
/// Two customers, two transfers that settle and two operations that are
/// rejected for lack of funds. Without fees the run ends with Alice at 850
/// and Bob at 650.
pub const DEMO_SCRIPT: &str = "\
type,account,owner,target,amount
open,CB-ALICE,Alice,,1000
open,CB-BOB,Bob,,500
transfer,CB-ALICE,,CB-BOB,200
transfer,CB-BOB,,CB-ALICE,50
transfer,CB-BOB,,CB-ALICE,800
withdrawal,CB-BOB,,,60000
";

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub fee_policy: FeePolicy,
    /// Transaction log; settled transactions are appended to it
    pub journal: Option<PathBuf>,
    /// Restore each opened account's history from the journal
    pub replay: Option<ReplayMatch>,
}

/// Runs operation scripts against a fresh engine
#[derive(Debug, Clone, Default)]
pub struct ScriptRunner {
    config: EngineConfig,
}

impl ScriptRunner {
    pub fn new(config: EngineConfig) -> Self {
        ScriptRunner { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the script at `path` and write the final accounts to `output`
    ///
    /// # Errors
    ///
    /// - `FileNotFound` / `IoError` if the script cannot be opened
    /// - `IoError` if the journal cannot be read or the output written
    pub fn run_path(
        &self,
        path: &Path,
        output: &mut dyn Write,
    ) -> Result<TransactionEngine, BankError> {
        let reader = ScriptReader::from_path(path)?;
        self.run(reader, output)
    }

    /// Run a script from any reader
    pub fn run_reader<R: Read>(
        &self,
        reader: R,
        output: &mut dyn Write,
    ) -> Result<TransactionEngine, BankError> {
        self.run(ScriptReader::new(reader), output)
    }

    /// Run the built-in demo script
    pub fn run_demo(&self, output: &mut dyn Write) -> Result<TransactionEngine, BankError> {
        self.run_reader(DEMO_SCRIPT.as_bytes(), output)
    }

    fn run<R: Read>(
        &self,
        reader: ScriptReader<R>,
        output: &mut dyn Write,
    ) -> Result<TransactionEngine, BankError> {
        let (mut engine, replay_log) = self.build_engine()?;

        let mut applied = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result {
                Ok(operation) => match self.apply(&mut engine, operation, &replay_log) {
                    Ok(()) => applied += 1,
                    Err(e) => {
                        rejected += 1;
                        warn!(error = %e, "Operation rejected");
                    }
                },
                Err(e) => {
                    rejected += 1;
                    warn!(error = %e, "Skipping script row");
                }
            }
        }
        info!(applied, rejected, "Script finished");

        write_accounts_csv(&engine.accounts(), output)?;
        Ok(engine)
    }

    /// Fresh engine plus the journal records to replay from
    ///
    /// The journal is read before anything is appended, so only earlier runs
    /// are replayed. When fees are enabled the fee sink is opened first; log
    /// records name the sink by identifier only, so its history is always
    /// restored by account.
    fn build_engine(&self) -> Result<(TransactionEngine, Vec<LogRecord>), BankError> {
        let mut engine = TransactionEngine::new().with_fee_policy(self.config.fee_policy.clone());
        let mut replay_log = Vec::new();

        if let Some(path) = &self.config.journal {
            let log = FileLog::new(path);
            if self.config.replay.is_some() {
                replay_log = log.load()?;
                info!(path = %path.display(), records = replay_log.len(), "Journal loaded for replay");
            }
            engine = engine.with_log(Box::new(log));
        }

        if let Some(sink) = self.config.fee_policy.sink() {
            engine.open_account(sink.clone(), FEE_SINK_OWNER, Decimal::ZERO)?;
            if self.config.replay.is_some() {
                engine.restore_history(sink, &replay_log, ReplayMatch::Account)?;
            }
        }

        Ok((engine, replay_log))
    }

    fn apply(
        &self,
        engine: &mut TransactionEngine,
        operation: Operation,
        replay_log: &[LogRecord],
    ) -> Result<(), BankError> {
        match operation {
            Operation::Open {
                account,
                owner,
                opening_balance,
            } => {
                engine.open_account(account.clone(), owner, opening_balance)?;
                if let Some(by) = self.config.replay {
                    engine.restore_history(&account, replay_log, by)?;
                }
            }
            Operation::Deposit { account, amount } => {
                engine.deposit(&account, amount)?;
            }
            Operation::Withdrawal { account, amount } => {
                engine.withdraw(&account, amount)?;
            }
            Operation::Transfer {
                source,
                target,
                amount,
            } => {
                engine.transfer(&source, &target, amount)?;
            }
        }
        Ok(())
    }
}
