//! Transaction processing engine
//!
//! This module provides the TransactionEngine that orchestrates transaction
//! processing by coordinating between the AccountManager, the
//! TransactionStore and an optional TransactionLog.
//!
//! The engine enforces business rules such as:
//! - Validation in a fixed order: accounts resolve, amount is positive,
//!   source has enough funds
//! - Monotonic status lifecycle (a transaction settles at most once)
//! - All-or-nothing settlement: new balances are computed and the log record
//!   is written before any balance changes
//! - Fee conservation: a withheld fee is credited to the fee-sink account

use crate::cli::ReplayMatch;
use crate::core::account_manager::AccountManager;
use crate::core::fees::FeePolicy;
use crate::core::traits::TransactionLog;
use crate::core::transaction_store::TransactionStore;
use crate::types::{
    Account, AccountId, BankError, LogRecord, Transaction, TransactionId, TransactionStatus,
    TransactionType,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Balance movements of a settled transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub tx: TransactionId,
    /// Amount taken from the source (zero for deposits)
    pub debited: Decimal,
    /// Amount given to the target (zero for withdrawals)
    pub credited: Decimal,
    /// Amount given to the fee sink
    pub fee: Decimal,
}

/// Transaction processing engine
///
/// Owns the account registry and the transaction store. Callers construct one
/// per bank; nothing is global.
pub struct TransactionEngine {
    account_manager: AccountManager,
    transaction_store: TransactionStore,
    fee_policy: FeePolicy,
    log: Option<Box<dyn TransactionLog>>,
}

impl TransactionEngine {
    /// Create an engine with no accounts, no fees and no log
    pub fn new() -> Self {
        TransactionEngine {
            account_manager: AccountManager::new(),
            transaction_store: TransactionStore::new(),
            fee_policy: FeePolicy::None,
            log: None,
        }
    }

    pub fn with_fee_policy(mut self, fee_policy: FeePolicy) -> Self {
        self.fee_policy = fee_policy;
        self
    }

    /// Write every settled transaction to `log`
    pub fn with_log(mut self, log: Box<dyn TransactionLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn fee_policy(&self) -> &FeePolicy {
        &self.fee_policy
    }

    /// Open an account with an opening balance
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the opening balance is negative
    /// - `DuplicateAccount` if the identifier is taken
    pub fn open_account(
        &mut self,
        id: AccountId,
        owner: impl Into<String>,
        opening_balance: Decimal,
    ) -> Result<&Account, BankError> {
        if opening_balance < Decimal::ZERO {
            return Err(BankError::invalid_amount(opening_balance, "open account"));
        }

        let account = self
            .account_manager
            .add(Account::new(id, owner, opening_balance))?;
        info!(
            account = %account.id,
            owner = %account.owner,
            balance = %account.balance,
            "Account opened"
        );
        Ok(account)
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.account_manager.get(id)
    }

    /// All accounts sorted by identifier
    pub fn accounts(&self) -> Vec<&Account> {
        self.account_manager.get_all_accounts()
    }

    pub fn transaction(&self, tx_id: TransactionId) -> Option<&Transaction> {
        self.transaction_store.get(tx_id)
    }

    /// Transactions that touched an account, oldest first
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account.
    pub fn history(&self, id: &AccountId) -> Result<Vec<&Transaction>, BankError> {
        let account = self.account_manager.find(id)?;
        Ok(self.transaction_store.resolve(account.history()).collect())
    }

    /// Queue a transaction for processing
    ///
    /// The transaction is stored as `Pending`. Submitting a transaction whose
    /// identifier is already stored has no effect.
    pub fn submit(&mut self, tx: Transaction) -> TransactionId {
        let id = tx.id;
        if !self.transaction_store.store(tx) {
            debug!(tx = %id, "Transaction already submitted");
        }
        id
    }

    /// Cancel a pending transaction
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the ID is unknown
    /// - `AlreadyProcessed` if the transaction already settled or failed
    pub fn cancel(&mut self, tx_id: TransactionId) -> Result<(), BankError> {
        self.transaction_store
            .set_status(tx_id, TransactionStatus::Cancelled)?;
        info!(tx = %tx_id, "Transaction cancelled");
        Ok(())
    }

    /// Submit and process a transfer
    pub fn transfer(
        &mut self,
        source: &AccountId,
        target: &AccountId,
        amount: Decimal,
    ) -> Result<Settlement, BankError> {
        let id = self.submit(Transaction::transfer(source.clone(), target.clone(), amount));
        self.process(id)
    }

    /// Submit and process a deposit
    pub fn deposit(&mut self, target: &AccountId, amount: Decimal) -> Result<Settlement, BankError> {
        let id = self.submit(Transaction::deposit(target.clone(), amount));
        self.process(id)
    }

    /// Submit and process a withdrawal
    pub fn withdraw(&mut self, source: &AccountId, amount: Decimal) -> Result<Settlement, BankError> {
        let id = self.submit(Transaction::withdrawal(source.clone(), amount));
        self.process(id)
    }

    /// Process a pending transaction
    ///
    /// Moves the transaction to `Processing`, settles it, and records the
    /// outcome as `Succeeded` or `Failed`. A transaction that is no longer
    /// pending is rejected without touching any balance, so processing the
    /// same transaction twice cannot debit or credit twice.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the ID is unknown
    /// - `AlreadyProcessed` if the transaction is not pending
    /// - `AccountNotFound` / `MissingLeg` if a required account is missing
    /// - `InvalidAmount` if the amount is not strictly positive
    /// - `InsufficientFunds` if the source balance is below the amount
    /// - `ArithmeticOverflow` if a credited balance would overflow
    /// - `LogWrite` if the log record could not be written
    pub fn process(&mut self, tx_id: TransactionId) -> Result<Settlement, BankError> {
        let tx = self
            .transaction_store
            .get(tx_id)
            .ok_or_else(|| BankError::transaction_not_found(tx_id))?
            .clone();

        if tx.status() != TransactionStatus::Pending {
            return Err(BankError::already_processed(tx_id, tx.status()));
        }

        self.transaction_store
            .set_status(tx_id, TransactionStatus::Processing)?;

        match self.settle(&tx) {
            Ok(settlement) => {
                self.transaction_store
                    .set_status(tx_id, TransactionStatus::Succeeded)?;
                info!(
                    tx = %tx_id,
                    tx_type = %tx.tx_type,
                    amount = %tx.amount,
                    fee = %settlement.fee,
                    "Transaction succeeded"
                );
                Ok(settlement)
            }
            Err(e) => {
                self.transaction_store
                    .set_status(tx_id, TransactionStatus::Failed)?;
                warn!(tx = %tx_id, tx_type = %tx.tx_type, error = %e, "Transaction failed");
                Err(e)
            }
        }
    }

    /// Validate, log and apply a transaction
    ///
    /// Nothing is mutated until every check has passed and the log record is
    /// written.
    fn settle(&mut self, tx: &Transaction) -> Result<Settlement, BankError> {
        // (a) accounts resolve
        let (needs_source, needs_target) = match tx.tx_type {
            TransactionType::Transfer => (true, true),
            TransactionType::Deposit => (false, true),
            TransactionType::Withdrawal => (true, false),
        };
        let source = self.resolve_leg(tx, tx.source.as_ref(), needs_source, "source")?;
        let target = self.resolve_leg(tx, tx.target.as_ref(), needs_target, "target")?;

        // (b) amount strictly positive
        if tx.amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(
                tx.amount,
                &tx.tx_type.as_str().to_lowercase(),
            ));
        }

        // (c) source can cover the full amount
        if let Some(source) = source {
            if source.balance < tx.amount {
                return Err(BankError::insufficient_funds(
                    &source.id,
                    source.balance,
                    tx.amount,
                ));
            }
        }

        let fee = self.fee_policy.fee_for(tx.amount, tx.tx_type);
        let sink = match self.fee_policy.sink() {
            Some(sink) if fee > Decimal::ZERO => Some(self.account_manager.find(sink)?.id.clone()),
            _ => None,
        };
        let credited = tx.amount - fee;

        let source_id = source.map(|a| a.id.clone());
        let target_id = target.map(|a| a.id.clone());
        let source_owner = source.map(|a| a.owner.clone());
        let target_owner = target.map(|a| a.owner.clone());

        // Net movement per account; a self-transfer or a sink that is also a
        // leg collapses into one entry.
        let mut deltas: BTreeMap<AccountId, Decimal> = BTreeMap::new();
        if let Some(id) = &source_id {
            *deltas.entry(id.clone()).or_default() -= tx.amount;
        }
        if let Some(id) = &target_id {
            *deltas.entry(id.clone()).or_default() += credited;
        }
        if let Some(id) = &sink {
            *deltas.entry(id.clone()).or_default() += fee;
        }
        let mut planned: Vec<(AccountId, Decimal)> = Vec::with_capacity(deltas.len());
        for (id, delta) in &deltas {
            let account = self.account_manager.find(id)?;
            let balance = account
                .balance
                .checked_add(*delta)
                .ok_or_else(|| BankError::arithmetic_overflow(tx.tx_type.as_str(), id))?;
            if balance < Decimal::ZERO {
                return Err(BankError::insufficient_funds(id, account.balance, -*delta));
            }
            planned.push((id.clone(), balance));
        }

        let mut settled = tx.clone();
        settled.fee = fee;
        if let Some(log) = self.log.as_mut() {
            let record = LogRecord::from_transaction(
                &settled,
                TransactionStatus::Succeeded,
                source_owner,
                target_owner,
                sink.clone(),
            );
            log.append(&record)?;
        }

        // Every balance below was checked above; nothing can fail from here on.
        for (id, balance) in planned {
            if let Some(account) = self.account_manager.get_mut(&id) {
                account.balance = balance;
            }
        }

        for id in source_id.iter().chain(target_id.iter()).chain(sink.iter()) {
            if let Some(account) = self.account_manager.get_mut(id) {
                account.add_to_history(tx.id);
            }
        }
        if let Some(stored) = self.transaction_store.get_mut(tx.id) {
            stored.fee = fee;
        }

        debug!(tx = %tx.id, ?deltas, "Balances updated");

        Ok(Settlement {
            tx: tx.id,
            debited: if source_id.is_some() { tx.amount } else { Decimal::ZERO },
            credited: if target_id.is_some() { credited } else { Decimal::ZERO },
            fee,
        })
    }

    fn resolve_leg(
        &self,
        tx: &Transaction,
        leg: Option<&AccountId>,
        required: bool,
        name: &str,
    ) -> Result<Option<&Account>, BankError> {
        match leg {
            Some(id) => self.account_manager.find(id).map(Some),
            None if required => Err(BankError::missing_leg(tx.id, name)),
            None => Ok(None),
        }
    }

    /// Rebuild an account's history from transaction log records
    ///
    /// Matching records are added to the store (once, however many accounts
    /// claim them) and to the account's history. Balances are never touched;
    /// the account's opening balance is authoritative. Records that never
    /// reached a terminal status are skipped so they can never be processed.
    ///
    /// With [`ReplayMatch::Owner`] a record is claimed by every account whose
    /// owner name appears on it, so namesakes share history.
    ///
    /// Returns the number of history entries added.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account.
    pub fn restore_history(
        &mut self,
        account_id: &AccountId,
        records: &[LogRecord],
        by: ReplayMatch,
    ) -> Result<usize, BankError> {
        let owner = self.account_manager.find(account_id)?.owner.clone();
        let mut restored = 0;

        for record in records {
            let claimed = match by {
                ReplayMatch::Account => record.involves_account(account_id),
                ReplayMatch::Owner => record.involves_owner(&owner),
            };
            if !claimed {
                continue;
            }
            if !record.status.is_terminal() {
                warn!(tx = %record.id, status = %record.status, "Skipping unsettled log record");
                continue;
            }

            if !self.transaction_store.contains(record.id) {
                let source = self.relink_leg(
                    record.source.as_ref(),
                    record.source_owner.as_deref(),
                    account_id,
                    &owner,
                );
                let target = self.relink_leg(
                    record.target.as_ref(),
                    record.target_owner.as_deref(),
                    account_id,
                    &owner,
                );
                self.transaction_store.store(Transaction::restored(
                    record.id,
                    record.tx_type,
                    record.status,
                    source,
                    target,
                    record.amount,
                    record.fee,
                    record.timestamp,
                ));
            }

            if self
                .account_manager
                .find_mut(account_id)?
                .add_to_history(record.id)
            {
                restored += 1;
            }
        }

        info!(account = %account_id, restored, ?by, "History restored");
        Ok(restored)
    }

    /// Account identifier for one leg of a log record
    ///
    /// Records from the owner-only layout carry no identifier; the leg is
    /// linked to the restoring account when the owner matches, otherwise to
    /// the only registered account with that owner, if there is exactly one.
    fn relink_leg(
        &self,
        id: Option<&AccountId>,
        owner: Option<&str>,
        account_id: &AccountId,
        account_owner: &str,
    ) -> Option<AccountId> {
        if let Some(id) = id {
            return Some(id.clone());
        }
        let owner = owner?;
        if owner == account_owner {
            return Some(account_id.clone());
        }
        match self.account_manager.find_by_owner(owner).as_slice() {
            [only] => Some(only.id.clone()),
            _ => None,
        }
    }
}

impl Default for TransactionEngine {
    fn default() -> Self {
        Self::new()
    }
}
