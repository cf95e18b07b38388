//! Transaction storage
//!
//! This module provides the TransactionStore, the single in-memory journal of
//! transactions. Accounts only hold transaction identifiers; the transaction
//! values live here exactly once, so both legs of a transfer share the same
//! record.
//!
//! # Duplicate Handling
//!
//! If a duplicate transaction ID is encountered, only the first occurrence is
//! stored. Subsequent transactions with the same ID are ignored.

use crate::types::{BankError, Transaction, TransactionId, TransactionStatus};
use std::collections::HashMap;

/// Transaction store keyed by transaction identifier
pub struct TransactionStore {
    transactions: HashMap<TransactionId, Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        TransactionStore {
            transactions: HashMap::new(),
        }
    }

    /// Store a transaction
    ///
    /// Returns `false` if a transaction with the same ID was already stored,
    /// in which case the new one is dropped.
    pub fn store(&mut self, tx: Transaction) -> bool {
        if self.transactions.contains_key(&tx.id) {
            return false;
        }
        self.transactions.insert(tx.id, tx);
        true
    }

    pub fn get(&self, tx_id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&tx_id)
    }

    pub fn get_mut(&mut self, tx_id: TransactionId) -> Option<&mut Transaction> {
        self.transactions.get_mut(&tx_id)
    }

    pub fn contains(&self, tx_id: TransactionId) -> bool {
        self.transactions.contains_key(&tx_id)
    }

    /// Advance the status of a stored transaction
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the ID is unknown
    /// - any lifecycle error from [`Transaction::transition`]
    pub fn set_status(
        &mut self,
        tx_id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), BankError> {
        let tx = self
            .get_mut(tx_id)
            .ok_or_else(|| BankError::transaction_not_found(tx_id))?;
        tx.transition(status)
    }

    /// Transactions for the given IDs, in the given order
    ///
    /// Unknown IDs are skipped.
    pub fn resolve<'a>(&'a self, ids: &'a [TransactionId]) -> impl Iterator<Item = &'a Transaction> + 'a {
        ids.iter().filter_map(move |id| self.get(*id))
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}
