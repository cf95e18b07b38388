//! Core Banker Library
//! # Overview
//!
//! This library provides an in-memory ledger of customer accounts that moves
//! money between them through a tracked transaction lifecycle, with an
//! optional transfer fee and an append-only flat-file transaction log that can
//! be replayed to rebuild account histories.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, LogRecord, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Transaction processing orchestration
//!   - [`core::account_manager`] - Account registry
//!   - [`core::transaction_store`] - Transactions and their status lifecycle
//!   - [`core::fees`] - Transfer fee policy
//! - [`io`] - Operation scripts, the transaction log and output
//! - [`runner`] - Runs a script against a fresh engine
//! - [`logging`] - Tracing subscriber setup
//!
//! # Transaction Types
//!
//! - **Transfer**: Move funds between two accounts (subject to the fee)
//! - **Deposit**: Credit funds to an account from outside the bank
//! - **Withdrawal**: Debit funds from an account to outside the bank
//!
//! # Transaction Lifecycle
//!
//! `Pending -> Processing -> Succeeded | Failed`, or `Pending -> Cancelled`.
//! A transaction settles at most once.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod runner;
pub mod types;

pub use core::{AccountManager, FeePolicy, Settlement, TransactionEngine, TransactionStore};
pub use io::{write_accounts_csv, FileLog, MemoryLog};
pub use runner::{EngineConfig, ScriptRunner};
pub use types::{
    Account, AccountId, BankError, LogRecord, Operation, Transaction, TransactionId,
    TransactionStatus, TransactionType,
};
