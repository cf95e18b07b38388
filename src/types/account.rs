//! Account-related types for the core banker
//!
//! This module defines the Account structure, its identifier, and the
//! validated balance operations every settlement goes through.

use super::error::BankError;
use super::transaction::TransactionId;
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Stable account identifier
///
/// Supplied by the caller so that log replay can re-link history to the same
/// account across runs. [`AccountId::generate`] produces a random `CB-xxxxxxxx`
/// identifier for callers that do not need stability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    /// Generate a random identifier of the form `CB-xxxxxxxx`
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        AccountId(format!("CB-{}", &uuid[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        AccountId::new(id)
    }
}

/// Bank account state
///
/// Holds the balance and the identifiers of every transaction that touched
/// the account. Transactions themselves live once in the engine's store.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,

    /// Display name, not a unique key
    pub owner: String,

    /// Current balance, never negative through the validated path
    pub balance: Decimal,

    /// Transaction identifiers in the order they touched this account
    history: Vec<TransactionId>,
}

impl Account {
    /// Create an account with an opening balance and empty history
    ///
    /// The opening balance is not validated here; the engine rejects
    /// negative opening balances before constructing an account.
    pub fn new(id: AccountId, owner: impl Into<String>, opening_balance: Decimal) -> Self {
        Account {
            id,
            owner: owner.into(),
            balance: opening_balance,
            history: Vec::new(),
        }
    }

    /// Credit the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `ArithmeticOverflow` if the balance would overflow
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, "deposit"));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("deposit", &self.id))?;

        Ok(())
    }

    /// Debit the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount` exceeds the balance
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, "withdrawal"));
        }

        if amount > self.balance {
            return Err(BankError::insufficient_funds(&self.id, self.balance, amount));
        }

        self.balance -= amount;

        Ok(())
    }

    /// Record a transaction in this account's history
    ///
    /// Returns `false` and leaves the history unchanged if the transaction
    /// is already recorded.
    pub fn add_to_history(&mut self, tx: TransactionId) -> bool {
        if self.history.contains(&tx) {
            return false;
        }
        self.history.push(tx);
        true
    }

    pub fn history(&self) -> &[TransactionId] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(balance: i64) -> Account {
        Account::new(AccountId::new("CB-TEST"), "Alice", Decimal::new(balance, 0))
    }

    #[test]
    fn test_generated_ids_have_bank_prefix() {
        let id = AccountId::generate();
        assert!(id.as_str().starts_with("CB-"));
        assert_eq!(id.as_str().len(), 11);
        assert_ne!(id, AccountId::generate());
    }

    #[test]
    fn test_deposit_increases_balance() {
        let mut account = account(100);
        account.deposit(Decimal::new(2550, 2)).unwrap();
        assert_eq!(account.balance, Decimal::new(12550, 2));
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-1, 0))]
    #[case::tiny_negative(Decimal::new(-1, 2))]
    fn test_non_positive_amounts_are_rejected(#[case] amount: Decimal) {
        let mut account = account(100);

        let deposit = account.deposit(amount);
        assert!(matches!(deposit, Err(BankError::InvalidAmount { .. })));

        let withdrawal = account.withdraw(amount);
        assert!(matches!(withdrawal, Err(BankError::InvalidAmount { .. })));

        assert_eq!(account.balance, Decimal::new(100, 0));
    }

    #[rstest]
    #[case::just_over(Decimal::new(10001, 2))]
    #[case::far_over(Decimal::new(60000, 0))]
    fn test_withdraw_more_than_balance_is_rejected(#[case] amount: Decimal) {
        let mut account = account(100);

        let result = account.withdraw(amount);

        assert!(matches!(result, Err(BankError::InsufficientFunds { .. })));
        assert_eq!(account.balance, Decimal::new(100, 0));
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account(100);
        account.withdraw(Decimal::new(100, 0)).unwrap();
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_deposit_overflow_leaves_balance_unchanged() {
        let mut account = Account::new(AccountId::new("CB-RICH"), "Rich", Decimal::MAX);

        let result = account.deposit(Decimal::ONE);

        assert!(matches!(result, Err(BankError::ArithmeticOverflow { .. })));
        assert_eq!(account.balance, Decimal::MAX);
    }

    #[test]
    fn test_history_is_deduplicated() {
        let mut account = account(0);
        let tx = Uuid::new_v4();

        assert!(account.add_to_history(tx));
        assert!(!account.add_to_history(tx));
        assert_eq!(account.history(), &[tx]);
    }
}
