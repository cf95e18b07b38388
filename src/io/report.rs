//! Human-readable account history

use crate::core::TransactionEngine;
use crate::types::{AccountId, BankError, Transaction, TIMESTAMP_FORMAT};
use std::io::Write;
use tracing::warn;

/// Write the history block for one account
///
/// ```text
/// History for CB-ALICE (Alice)
///   2024-03-01 09:30:00  TRANSFER    SUCCEEDED  CB-ALICE -> CB-BOB  200.00 (fee 4.00)
/// ```
///
/// # Errors
///
/// - `AccountNotFound` for an unknown account
/// - `IoError` if writing to `output` fails
pub fn write_history(
    engine: &TransactionEngine,
    account: &AccountId,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let history = engine.history(account)?;
    let owner = engine
        .account(account)
        .map(|a| a.owner.as_str())
        .unwrap_or_default();

    writeln!(output, "History for {} ({})", account, owner)?;
    if history.is_empty() {
        writeln!(output, "  no transactions")?;
    }
    for tx in history {
        writeln!(output, "  {}", history_line(tx))?;
    }
    Ok(())
}

/// Write a blank line and a history block for each listed account
///
/// Unknown accounts are skipped with a warning and leave no trace in `output`.
///
/// # Errors
///
/// - `IoError` if writing to `output` fails
pub fn write_histories(
    engine: &TransactionEngine,
    accounts: &[AccountId],
    output: &mut dyn Write,
) -> Result<(), BankError> {
    for account in accounts {
        match engine.history(account) {
            Ok(_) => {}
            Err(BankError::AccountNotFound { .. }) => {
                warn!(account = %account, "No such account, history skipped");
                continue;
            }
            Err(e) => return Err(e),
        }
        writeln!(output)?;
        write_history(engine, account, output)?;
    }
    Ok(())
}

fn history_line(tx: &Transaction) -> String {
    let leg = |id: &Option<AccountId>| {
        id.as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    format!(
        "{}  {:<10}  {:<9}  {} -> {}  {:.2} (fee {:.2})",
        tx.timestamp.format(TIMESTAMP_FORMAT),
        tx.tx_type.as_str(),
        tx.status().as_str(),
        leg(&tx.source),
        leg(&tx.target),
        tx.amount,
        tx.fee,
    )
}
