//! Transaction-related types for the core banker
//!
//! This module defines the transaction entity, its type and status enums,
//! and the status lifecycle rules.

use super::account::AccountId;
use super::error::BankError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Transaction identifier
pub type TransactionId = Uuid;

/// Kind of balance movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Move funds from a source account to a target account
    ///
    /// The only type subject to the transfer fee.
    Transfer,

    /// Credit funds to a target account from outside the bank
    Deposit,

    /// Debit funds from a source account to outside the bank
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRANSFER" => Ok(TransactionType::Transfer),
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            _ => Err(format!("unknown transaction type '{}'", s)),
        }
    }
}

/// Outcome of a transaction
///
/// Moves forward only: `Pending -> Processing -> Succeeded | Failed`, or
/// `Pending -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Succeeded => "SUCCEEDED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Succeeded | TransactionStatus::Failed | TransactionStatus::Cancelled
        )
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Processing)
                | (TransactionStatus::Pending, TransactionStatus::Cancelled)
                | (TransactionStatus::Processing, TransactionStatus::Succeeded)
                | (TransactionStatus::Processing, TransactionStatus::Failed)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "PROCESSING" => Ok(TransactionStatus::Processing),
            "SUCCEEDED" => Ok(TransactionStatus::Succeeded),
            "FAILED" => Ok(TransactionStatus::Failed),
            "CANCELLED" => Ok(TransactionStatus::Cancelled),
            _ => Err(format!("unknown transaction status '{}'", s)),
        }
    }
}

/// A requested balance movement
///
/// Everything except `status` and `fee` is fixed at construction. `fee` is
/// set once, when the transaction settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,

    /// Debited account (absent for deposits)
    pub source: Option<AccountId>,

    /// Credited account (absent for withdrawals)
    pub target: Option<AccountId>,

    /// Amount debited from the source, or credited for deposits
    pub amount: Decimal,

    /// Fee withheld from the credited amount
    pub fee: Decimal,

    pub timestamp: DateTime<Utc>,

    pub tx_type: TransactionType,

    status: TransactionStatus,
}

impl Transaction {
    fn new(
        tx_type: TransactionType,
        source: Option<AccountId>,
        target: Option<AccountId>,
        amount: Decimal,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            source,
            target,
            amount,
            fee: Decimal::ZERO,
            timestamp: Utc::now(),
            tx_type,
            status: TransactionStatus::Pending,
        }
    }

    pub fn transfer(source: AccountId, target: AccountId, amount: Decimal) -> Self {
        Self::new(TransactionType::Transfer, Some(source), Some(target), amount)
    }

    pub fn deposit(target: AccountId, amount: Decimal) -> Self {
        Self::new(TransactionType::Deposit, None, Some(target), amount)
    }

    pub fn withdrawal(source: AccountId, amount: Decimal) -> Self {
        Self::new(TransactionType::Withdrawal, Some(source), None, amount)
    }

    /// Rebuild a transaction from a log record
    ///
    /// The recorded status is kept as-is, so a restored transaction that
    /// reached a terminal state can never be processed again.
    #[allow(clippy::too_many_arguments)]
    pub fn restored(
        id: TransactionId,
        tx_type: TransactionType,
        status: TransactionStatus,
        source: Option<AccountId>,
        target: Option<AccountId>,
        amount: Decimal,
        fee: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id,
            source,
            target,
            amount,
            fee,
            timestamp,
            tx_type,
            status,
        }
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Amount credited to the target after the fee
    pub fn credited_amount(&self) -> Decimal {
        self.amount - self.fee
    }

    /// Whether the given account is on either leg
    pub fn involves(&self, account: &AccountId) -> bool {
        self.source.as_ref() == Some(account) || self.target.as_ref() == Some(account)
    }

    /// Advance the status
    ///
    /// # Errors
    ///
    /// - `AlreadyProcessed` if the transaction is in a terminal state
    /// - `InvalidStatusTransition` for any other backwards or skipping move
    pub fn transition(&mut self, next: TransactionStatus) -> Result<(), BankError> {
        if self.status.is_terminal() {
            return Err(BankError::already_processed(self.id, self.status));
        }
        if !self.status.can_transition_to(next) {
            return Err(BankError::InvalidStatusTransition {
                tx: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
