//! Core traits
//!
//! The engine writes every settled transaction through the [`TransactionLog`]
//! trait, so the file-backed log can be swapped for an in-memory one in tests
//! and benchmarks.

use crate::types::{BankError, LogRecord};

/// Append-only sink for settled transactions
pub trait TransactionLog {
    /// Append one record
    ///
    /// # Errors
    ///
    /// Returns `LogWrite` if the record could not be persisted. The engine
    /// treats this as a settlement failure and leaves balances untouched.
    fn append(&mut self, record: &LogRecord) -> Result<(), BankError>;
}

impl<L: TransactionLog + ?Sized> TransactionLog for Box<L> {
    fn append(&mut self, record: &LogRecord) -> Result<(), BankError> {
        (**self).append(record)
    }
}
