//! Account management module
//!
//! This module provides the `AccountManager` struct, the account registry.
//! It is an explicit value owned by the engine; there is no process-wide
//! registry.
//!
//! The AccountManager is responsible for:
//! - Registering accounts under a unique identifier
//! - Looking accounts up by identifier, and by owner name for legacy replay
//! - Providing sorted account listings for output

use crate::types::{Account, AccountId, BankError};
use std::collections::HashMap;

/// Registry of all open accounts
pub struct AccountManager {
    accounts: HashMap<AccountId, Account>,
}

impl AccountManager {
    pub fn new() -> Self {
        AccountManager {
            accounts: HashMap::new(),
        }
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the identifier is already registered.
    pub fn add(&mut self, account: Account) -> Result<&Account, BankError> {
        if self.accounts.contains_key(&account.id) {
            return Err(BankError::duplicate_account(&account.id));
        }
        let id = account.id.clone();
        Ok(self.accounts.entry(id).or_insert(account))
    }

    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn get_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    /// Look up an account, failing with `AccountNotFound`
    pub fn find(&self, id: &AccountId) -> Result<&Account, BankError> {
        self.get(id).ok_or_else(|| BankError::account_not_found(id))
    }

    /// Look up an account for mutation, failing with `AccountNotFound`
    pub fn find_mut(&mut self, id: &AccountId) -> Result<&mut Account, BankError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| BankError::account_not_found(id))
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    /// All accounts held by `owner`, sorted by identifier
    ///
    /// Owner names are not unique, so this may return several accounts.
    pub fn find_by_owner(&self, owner: &str) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self
            .accounts
            .values()
            .filter(|account| account.owner == owner)
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }

    /// Get all accounts sorted by identifier
    ///
    /// Sorting gives deterministic output for CSV generation.
    pub fn get_all_accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountManager {
    fn default() -> Self {
        Self::new()
    }
}
