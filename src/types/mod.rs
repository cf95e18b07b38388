//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and identifiers
//! - `transaction`: Transactions, their type and status lifecycle
//! - `record`: Flat transaction log records
//! - `operation`: Operations read from a script
//! - `error`: Error types for the core banker

pub mod account;
pub mod error;
pub mod operation;
pub mod record;
pub mod transaction;

pub use account::{Account, AccountId};
pub use error::BankError;
pub use operation::Operation;
pub use record::{LogRecord, TIMESTAMP_FORMAT};
pub use transaction::{Transaction, TransactionId, TransactionStatus, TransactionType};
