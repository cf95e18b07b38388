//! In-memory transaction log
//!
//! Clones share the same record buffer, so a caller can hand one clone to the
//! engine and inspect what was written through another.

use crate::core::TransactionLog;
use crate::types::{BankError, LogRecord};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    records: Rc<RefCell<Vec<LogRecord>>>,
    fail: bool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that rejects every append
    pub fn failing() -> Self {
        MemoryLog {
            records: Rc::default(),
            fail: true,
        }
    }

    /// Copy of every record appended so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }
}

impl TransactionLog for MemoryLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), BankError> {
        if self.fail {
            return Err(BankError::log_write("log is read-only"));
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}
