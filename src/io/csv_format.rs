//! CSV format handling for operation scripts and account output
//!
//! This module centralizes the script CSV format, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to [`Operation`]s
//! - Account output serialization
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Script Format
//!
//! ```text
//! type,account,owner,target,amount
//! open,CB-ALICE,Alice,,1000
//! deposit,CB-ALICE,,,25.50
//! withdrawal,CB-ALICE,,,10
//! transfer,CB-ALICE,,CB-BOB,200
//! ```

use crate::types::{Account, AccountId, BankError, Operation};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Decimal places allowed in a script amount
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// CSV record structure for deserialization
///
/// Matches the script columns: type, account, owner, target, amount.
/// Columns an operation does not use may be left empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub op: String,
    pub account: String,
    pub owner: Option<String>,
    pub target: Option<String>,
    pub amount: Option<String>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Convert a CsvRecord to an Operation
///
/// Amounts are parsed but not range-checked; non-positive amounts are left for
/// the engine to reject so they surface as `InvalidAmount`. Amounts finer than
/// a cent are rejected here, since balances are reported to two places.
///
/// # Errors
///
/// Returns a message describing the problem when:
/// - the operation type is unknown
/// - the account column is empty
/// - an `open` has no owner, or a `transfer` has no target
/// - a required amount is missing, or any amount is not a decimal number
/// - an amount has more than two decimal places
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<Operation, String> {
    let op = csv_record.op.trim().to_lowercase();
    let account = csv_record.account.trim();
    if account.is_empty() {
        return Err(format!("Operation '{}' requires an account", op));
    }
    let account = AccountId::new(account);

    let amount = match non_empty(csv_record.amount) {
        Some(raw) => Some(
            Decimal::from_str(&raw)
                .map_err(|_| format!("Invalid amount '{}' for account {}", raw, account))
                .and_then(|amount| {
                    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
                        Err(format!(
                            "Invalid amount '{}' for account {}: more than {} decimal places",
                            raw, account, MAX_AMOUNT_SCALE
                        ))
                    } else {
                        Ok(amount)
                    }
                })?,
        ),
        None => None,
    };
    let require_amount = |amount: Option<Decimal>| {
        amount.ok_or_else(|| format!("{} on account {} requires an amount", op, account))
    };

    match op.as_str() {
        "open" => {
            let owner = non_empty(csv_record.owner)
                .ok_or_else(|| format!("open of account {} requires an owner", account))?;
            Ok(Operation::Open {
                account,
                owner,
                opening_balance: amount.unwrap_or(Decimal::ZERO),
            })
        }
        "deposit" => Ok(Operation::Deposit {
            amount: require_amount(amount)?,
            account,
        }),
        "withdrawal" => Ok(Operation::Withdrawal {
            amount: require_amount(amount)?,
            account,
        }),
        "transfer" => {
            let amount = require_amount(amount)?;
            let target = non_empty(csv_record.target)
                .ok_or_else(|| format!("transfer from {} requires a target", account))?;
            Ok(Operation::Transfer {
                source: account,
                target: AccountId::new(target),
                amount,
            })
        }
        _ => Err(format!(
            "Invalid operation type: '{}' for account {}",
            csv_record.op, account
        )),
    }
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns: account, owner, balance.
/// Balances are written with two decimal places. Accounts are written in
/// the order given; the engine already returns them sorted by identifier.
///
/// # Errors
///
/// Returns `IoError` if writing to `output` fails.
pub fn write_accounts_csv(accounts: &[&Account], output: &mut dyn Write) -> Result<(), BankError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["account", "owner", "balance"])
        .map_err(|e| BankError::IoError {
            message: format!("Failed to write CSV header: {}", e),
        })?;

    for account in accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.owner.clone(),
                format!("{:.2}", account.balance),
            ])
            .map_err(|e| BankError::IoError {
                message: format!("Failed to write account record: {}", e),
            })?;
    }

    writer.flush().map_err(|e| BankError::IoError {
        message: format!("Failed to flush output: {}", e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(op: &str, account: &str, owner: &str, target: &str, amount: &str) -> CsvRecord {
        let field = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        CsvRecord {
            op: op.to_string(),
            account: account.to_string(),
            owner: field(owner),
            target: field(target),
            amount: field(amount),
        }
    }

    #[test]
    fn test_convert_open_with_balance() {
        let op = convert_csv_record(record("open", "CB-ALICE", "Alice", "", "1000")).unwrap();
        assert_eq!(
            op,
            Operation::Open {
                account: AccountId::new("CB-ALICE"),
                owner: "Alice".to_string(),
                opening_balance: Decimal::new(1000, 0),
            }
        );
    }

    #[test]
    fn test_convert_open_defaults_to_zero_balance() {
        let op = convert_csv_record(record("OPEN", "CB-ALICE", "Alice", "", "")).unwrap();
        assert!(matches!(
            op,
            Operation::Open { opening_balance, .. } if opening_balance == Decimal::ZERO
        ));
    }

    #[test]
    fn test_convert_transfer() {
        let op = convert_csv_record(record("transfer", "CB-ALICE", "", "CB-BOB", "200")).unwrap();
        assert_eq!(
            op,
            Operation::Transfer {
                source: AccountId::new("CB-ALICE"),
                target: AccountId::new("CB-BOB"),
                amount: Decimal::new(200, 0),
            }
        );
    }

    #[rstest]
    #[case("deposit")]
    #[case("Withdrawal")]
    fn test_convert_single_account_operations(#[case] op: &str) {
        let converted = convert_csv_record(record(op, "CB-ALICE", "", "", "25.50")).unwrap();
        match converted {
            Operation::Deposit { account, amount } | Operation::Withdrawal { account, amount } => {
                assert_eq!(account, AccountId::new("CB-ALICE"));
                assert_eq!(amount, Decimal::new(2550, 2));
            }
            other => panic!("unexpected operation {:?}", other),
        }
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let op = convert_csv_record(record("deposit", "CB-ALICE", "", "", "1.2500")).unwrap();
        assert_eq!(
            op,
            Operation::Deposit {
                account: AccountId::new("CB-ALICE"),
                amount: Decimal::new(125, 2),
            }
        );
    }

    #[test]
    fn test_negative_amounts_are_left_to_the_engine() {
        let op = convert_csv_record(record("deposit", "CB-ALICE", "", "", "-5")).unwrap();
        assert_eq!(
            op,
            Operation::Deposit {
                account: AccountId::new("CB-ALICE"),
                amount: Decimal::new(-5, 0),
            }
        );
    }

    #[rstest]
    #[case::invalid_type(record("refund", "CB-A", "", "", "1"), "Invalid operation type")]
    #[case::missing_account(record("deposit", "  ", "", "", "1"), "requires an account")]
    #[case::open_without_owner(record("open", "CB-A", "", "", "1"), "requires an owner")]
    #[case::transfer_without_target(record("transfer", "CB-A", "", "", "1"), "requires a target")]
    #[case::deposit_without_amount(record("deposit", "CB-A", "", "", ""), "requires an amount")]
    #[case::whitespace_amount(record("withdrawal", "CB-A", "", "", "   "), "requires an amount")]
    #[case::invalid_amount(record("deposit", "CB-A", "", "", "lots"), "Invalid amount")]
    #[case::sub_cent_amount(record("transfer", "CB-A", "", "CB-B", "0.005"), "more than 2 decimal places")]
    #[case::sub_cent_opening(record("open", "CB-A", "Ann", "", "10.001"), "more than 2 decimal places")]
    fn test_convert_csv_record_errors(#[case] record: CsvRecord, #[case] expected_error: &str) {
        let result = convert_csv_record(record);
        assert!(result.is_err());
        let message = result.unwrap_err();
        assert!(
            message.contains(expected_error),
            "'{}' does not contain '{}'",
            message,
            expected_error
        );
    }

    #[test]
    fn test_write_accounts_csv() {
        let alice = Account::new(AccountId::new("CB-ALICE"), "Alice", Decimal::new(8005, 1));
        let bob = Account::new(AccountId::new("CB-BOB"), "Bob", Decimal::new(700, 0));
        let mut output = Vec::new();

        write_accounts_csv(&[&alice, &bob], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,owner,balance\nCB-ALICE,Alice,800.50\nCB-BOB,Bob,700.00\n"
        );
    }

    #[test]
    fn test_write_no_accounts_writes_header_only() {
        let mut output = Vec::new();
        write_accounts_csv(&[], &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "account,owner,balance\n");
    }
}
