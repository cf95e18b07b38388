//! Script operations
//!
//! One `Operation` is produced per row of an operation script and applied to
//! the engine in file order.

use super::account::AccountId;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Register an account
    Open {
        account: AccountId,
        owner: String,
        opening_balance: Decimal,
    },

    /// Credit an account from outside the bank
    Deposit { account: AccountId, amount: Decimal },

    /// Debit an account to outside the bank
    Withdrawal { account: AccountId, amount: Decimal },

    /// Move funds between two accounts
    Transfer {
        source: AccountId,
        target: AccountId,
        amount: Decimal,
    },
}
