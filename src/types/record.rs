//! Transaction log record
//!
//! A `LogRecord` is the flat, self-contained form of a settled transaction as
//! it is written to and read back from the transaction log. Unlike
//! [`Transaction`], it carries the owner name of each leg so that logs from
//! older layouts, which only recorded owner names, can still be replayed. It
//! also names the fee sink credited with the fee, so replay can give the sink
//! account its share of the history.

use super::account::AccountId;
use super::transaction::{Transaction, TransactionId, TransactionStatus, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Timestamp layout used in the log and in history reports (UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub id: TransactionId,
    pub timestamp: DateTime<Utc>,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub source: Option<AccountId>,
    pub source_owner: Option<String>,
    pub target: Option<AccountId>,
    pub target_owner: Option<String>,
    pub amount: Decimal,
    pub fee: Decimal,
    /// Account credited with `fee`; absent when no fee was charged
    pub fee_sink: Option<AccountId>,
}

impl LogRecord {
    /// Build the record for a transaction settling with `status`
    pub fn from_transaction(
        tx: &Transaction,
        status: TransactionStatus,
        source_owner: Option<String>,
        target_owner: Option<String>,
        fee_sink: Option<AccountId>,
    ) -> Self {
        LogRecord {
            id: tx.id,
            timestamp: tx.timestamp,
            tx_type: tx.tx_type,
            status,
            source: tx.source.clone(),
            source_owner,
            target: tx.target.clone(),
            target_owner,
            amount: tx.amount,
            fee: tx.fee,
            fee_sink,
        }
    }

    /// Whether either leg, or the fee sink, carries the given account identifier
    pub fn involves_account(&self, account: &AccountId) -> bool {
        self.source.as_ref() == Some(account)
            || self.target.as_ref() == Some(account)
            || self.fee_sink.as_ref() == Some(account)
    }

    /// Whether either leg carries the given owner name
    pub fn involves_owner(&self, owner: &str) -> bool {
        self.source_owner.as_deref() == Some(owner) || self.target_owner.as_deref() == Some(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transaction_copies_legs_and_amounts() {
        let mut tx = Transaction::transfer(
            AccountId::new("CB-ALICE"),
            AccountId::new("CB-BOB"),
            Decimal::new(200, 0),
        );
        tx.fee = Decimal::new(4, 0);

        let record = LogRecord::from_transaction(
            &tx,
            TransactionStatus::Succeeded,
            Some("Alice".to_string()),
            Some("Bob".to_string()),
            Some(AccountId::new("CB-FEES")),
        );

        assert_eq!(record.id, tx.id);
        assert_eq!(record.status, TransactionStatus::Succeeded);
        assert_eq!(record.amount, Decimal::new(200, 0));
        assert_eq!(record.fee, Decimal::new(4, 0));
        assert!(record.involves_account(&AccountId::new("CB-BOB")));
        assert!(record.involves_account(&AccountId::new("CB-FEES")));
        assert!(!record.involves_account(&AccountId::new("CB-CAROL")));
        assert!(record.involves_owner("Alice"));
        assert!(!record.involves_owner("alice"));
    }
}
