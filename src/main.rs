//! Core Banker CLI
//!
//! Runs an operation script against a fresh in-memory ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                    # built-in demo
//! cargo run -- operations.csv > accounts.csv
//! cargo run -- --fee-sink CB-FEES operations.csv
//! cargo run -- --journal journal.csv --replay-by account --history CB-ALICE operations.csv
//! ```
//!
//! Final account states are written to stdout as CSV, followed by any
//! requested history blocks. Diagnostics go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid configuration, script not found or not readable, etc.)

use core_banker::cli;
use core_banker::io::write_histories;
use core_banker::logging;
use core_banker::runner::ScriptRunner;
use core_banker::types::{AccountId, BankError};
use std::io::Write;
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), BankError> {
    let runner = ScriptRunner::new(args.to_engine_config()?);

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    let engine = match &args.input_file {
        Some(path) => runner.run_path(path, &mut output)?,
        None => runner.run_demo(&mut output)?,
    };

    let history: Vec<AccountId> = args.history.iter().map(AccountId::new).collect();
    write_histories(&engine, &history, &mut output)?;
    output.flush()?;
    Ok(())
}
