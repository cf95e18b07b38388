//! Error types for the core banker
//!
//! This module defines every failure the engine can report. Each kind is a
//! distinct variant so callers can react programmatically instead of parsing
//! console output.
//!
//! # Error Categories
//!
//! - **Validation Errors**: invalid amounts, insufficient funds, unknown accounts
//! - **Lifecycle Errors**: replaying or cancelling a settled transaction
//! - **Arithmetic Errors**: balance overflow
//! - **Log Errors**: failing to append to or parse the transaction log
//! - **Input Errors**: missing files, malformed script rows, bad configuration

use super::account::AccountId;
use super::transaction::{TransactionId, TransactionStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the core banker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Amount is zero or negative where a strictly positive amount is required
    ///
    /// The operation is rejected and no state changes.
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
        /// Operation that rejected it
        operation: String,
    },

    /// Amount exceeds the balance of the debited account
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Decimal,
        requested: Decimal,
    },

    /// Account identifier is not registered
    #[error("Account {account} not found")]
    AccountNotFound { account: AccountId },

    /// Transaction lacks an account its type requires
    ///
    /// A transfer needs both legs, a deposit a target, a withdrawal a source.
    #[error("Transaction {tx} has no {leg} account")]
    MissingLeg { tx: TransactionId, leg: String },

    /// Account identifier is already registered
    #[error("Account {account} already exists")]
    DuplicateAccount { account: AccountId },

    /// Transaction identifier is not in the store
    #[error("Transaction {tx} not found")]
    TransactionNotFound { tx: TransactionId },

    /// Transaction has already left the pending state
    ///
    /// Raised when processing or cancelling a transaction a second time.
    /// Balances are never touched.
    #[error("Transaction {tx} was already processed (status {status})")]
    AlreadyProcessed {
        tx: TransactionId,
        status: TransactionStatus,
    },

    /// Status change that would move a transaction backwards
    #[error("Transaction {tx} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        tx: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        operation: String,
        account: AccountId,
    },

    /// Appending to the transaction log failed
    #[error("Failed to write transaction log: {message}")]
    LogWrite { message: String },

    /// A transaction log line could not be understood
    #[error("Transaction log parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    LogParse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    /// A script row could not be understood
    #[error("Script parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// Engine configuration is unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal, operation: &str) -> Self {
        BankError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &AccountId, balance: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            account: account.clone(),
            balance,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &AccountId) -> Self {
        BankError::AccountNotFound {
            account: account.clone(),
        }
    }

    /// Create a MissingLeg error
    pub fn missing_leg(tx: TransactionId, leg: &str) -> Self {
        BankError::MissingLeg {
            tx,
            leg: leg.to_string(),
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: &AccountId) -> Self {
        BankError::DuplicateAccount {
            account: account.clone(),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(tx: TransactionId) -> Self {
        BankError::TransactionNotFound { tx }
    }

    /// Create an AlreadyProcessed error
    pub fn already_processed(tx: TransactionId, status: TransactionStatus) -> Self {
        BankError::AlreadyProcessed { tx, status }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &AccountId) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.clone(),
        }
    }

    /// Create a LogWrite error
    pub fn log_write(message: impl Into<String>) -> Self {
        BankError::LogWrite {
            message: message.into(),
        }
    }

    /// Create a LogParse error
    pub fn log_parse(line: Option<u64>, message: impl Into<String>) -> Self {
        BankError::LogParse {
            line,
            message: message.into(),
        }
    }

    /// Create a script ParseError
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        BankError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        BankError::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn acct(id: &str) -> AccountId {
        AccountId::new(id)
    }

    #[rstest]
    #[case::invalid_amount(
        BankError::invalid_amount(Decimal::new(-500, 2), "deposit"),
        "Invalid amount -5.00 for deposit"
    )]
    #[case::insufficient_funds(
        BankError::insufficient_funds(&acct("CB-BOB"), Decimal::new(500, 0), Decimal::new(600, 0)),
        "Insufficient funds in account CB-BOB: balance 500, requested 600"
    )]
    #[case::account_not_found(
        BankError::account_not_found(&acct("CB-NOBODY")),
        "Account CB-NOBODY not found"
    )]
    #[case::duplicate_account(
        BankError::duplicate_account(&acct("CB-ALICE")),
        "Account CB-ALICE already exists"
    )]
    #[case::arithmetic_overflow(
        BankError::arithmetic_overflow("deposit", &acct("CB-ALICE")),
        "Arithmetic overflow in deposit for account CB-ALICE"
    )]
    #[case::log_write(
        BankError::log_write("disk full"),
        "Failed to write transaction log: disk full"
    )]
    #[case::log_parse_with_line(
        BankError::log_parse(Some(3), "unknown status 'DONE'"),
        "Transaction log parse error at line 3: unknown status 'DONE'"
    )]
    #[case::log_parse_without_line(
        BankError::log_parse(None, "bad field count"),
        "Transaction log parse error: bad field count"
    )]
    #[case::parse_error(
        BankError::parse_error(Some(7), "unknown operation 'refund'"),
        "Script parse error at line 7: unknown operation 'refund'"
    )]
    #[case::file_not_found(
        BankError::FileNotFound { path: "ops.csv".to_string() },
        "File not found: ops.csv"
    )]
    #[case::invalid_config(
        BankError::invalid_config("fee rate must be between 0 and 1"),
        "Invalid configuration: fee rate must be between 0 and 1"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_already_processed_display_names_status() {
        let tx = Uuid::nil();
        let error = BankError::already_processed(tx, TransactionStatus::Succeeded);
        assert_eq!(
            error.to_string(),
            format!("Transaction {} was already processed (status SUCCEEDED)", tx)
        );
    }

    #[test]
    fn test_missing_leg_display() {
        let tx = Uuid::nil();
        assert_eq!(
            BankError::missing_leg(tx, "target").to_string(),
            format!("Transaction {} has no target account", tx)
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: BankError = io_error.into();
        assert!(matches!(error, BankError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
