//! Flat-file transaction log
//!
//! One CSV line per settled transaction, no header:
//!
//! ```text
//! id,timestamp,type,status,source,source_owner,target,target_owner,amount,fee,fee_sink
//! ```
//!
//! `fee_sink` names the account credited with `fee` and is empty when no fee
//! was charged. Older layouts are still accepted when reading:
//!
//! - 10 fields: the current layout without `fee_sink`
//! - 7 fields: `id,timestamp,source_owner,target_owner,amount,type,status`
//! - 5 fields: `id,timestamp,source_id,target_id,amount` (a succeeded transfer)
//!
//! The file is opened in append mode for every record and closed again. There
//! is no locking and no fsync.

use crate::core::TransactionLog;
use crate::types::{
    AccountId, BankError, LogRecord, TransactionId, TransactionStatus, TransactionType,
    TIMESTAMP_FORMAT,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Transaction log backed by a file on disk
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in the log
    ///
    /// A missing file is an empty log. Lines that cannot be parsed are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file exists but cannot be opened.
    pub fn load(&self) -> Result<Vec<LogRecord>, BankError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No transaction log yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(BankError::IoError {
                    message: format!("Failed to open log '{}': {}", self.path.display(), e),
                })
            }
        };

        let mut records = Vec::new();
        for result in LogReader::new(file) {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %self.path.display(), error = %e, "Skipping log line"),
            }
        }
        debug!(path = %self.path.display(), count = records.len(), "Transaction log loaded");
        Ok(records)
    }
}

impl TransactionLog for FileLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), BankError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                BankError::log_write(format!("cannot open '{}': {}", self.path.display(), e))
            })?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .write_record(format_record(record))
            .map_err(|e| BankError::log_write(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| BankError::log_write(e.to_string()))?;
        Ok(())
    }
}

/// Fields of a record in the current layout
pub fn format_record(record: &LogRecord) -> Vec<String> {
    let leg = |id: &Option<AccountId>| id.as_ref().map(|id| id.to_string()).unwrap_or_default();

    vec![
        record.id.to_string(),
        record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        record.tx_type.as_str().to_string(),
        record.status.as_str().to_string(),
        leg(&record.source),
        record.source_owner.clone().unwrap_or_default(),
        leg(&record.target),
        record.target_owner.clone().unwrap_or_default(),
        record.amount.to_string(),
        record.fee.to_string(),
        leg(&record.fee_sink),
    ]
}

/// Parse one log line in any of the known layouts
///
/// # Errors
///
/// Returns `LogParse` for an unknown field count or any malformed field.
pub fn parse_record(fields: &StringRecord, line: Option<u64>) -> Result<LogRecord, BankError> {
    let field = |index: usize| fields.get(index).unwrap_or("").trim();
    let err = |message: String| BankError::log_parse(line, message);

    match fields.len() {
        count @ (11 | 10) => Ok(LogRecord {
            id: parse_id(field(0)).map_err(err)?,
            timestamp: parse_timestamp(field(1)).map_err(err)?,
            tx_type: TransactionType::from_str(field(2)).map_err(err)?,
            status: TransactionStatus::from_str(field(3)).map_err(err)?,
            source: optional(field(4)).map(AccountId::new),
            source_owner: optional(field(5)).map(str::to_string),
            target: optional(field(6)).map(AccountId::new),
            target_owner: optional(field(7)).map(str::to_string),
            amount: parse_amount(field(8)).map_err(err)?,
            fee: parse_amount(field(9)).map_err(err)?,
            fee_sink: if count == 11 {
                optional(field(10)).map(AccountId::new)
            } else {
                None
            },
        }),
        7 => Ok(LogRecord {
            id: parse_id(field(0)).map_err(err)?,
            timestamp: parse_timestamp(field(1)).map_err(err)?,
            source: None,
            source_owner: optional(field(2)).map(str::to_string),
            target: None,
            target_owner: optional(field(3)).map(str::to_string),
            amount: parse_amount(field(4)).map_err(err)?,
            tx_type: TransactionType::from_str(field(5)).map_err(err)?,
            status: TransactionStatus::from_str(field(6)).map_err(err)?,
            fee: Decimal::ZERO,
            fee_sink: None,
        }),
        5 => Ok(LogRecord {
            id: parse_id(field(0)).map_err(err)?,
            timestamp: parse_timestamp(field(1)).map_err(err)?,
            tx_type: TransactionType::Transfer,
            status: TransactionStatus::Succeeded,
            source: optional(field(2)).map(AccountId::new),
            source_owner: None,
            target: optional(field(3)).map(AccountId::new),
            target_owner: None,
            amount: parse_amount(field(4)).map_err(err)?,
            fee: Decimal::ZERO,
            fee_sink: None,
        }),
        count => Err(err(format!("expected 11, 10, 7 or 5 fields, found {}", count))),
    }
}

fn optional(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_id(value: &str) -> Result<TransactionId, String> {
    TransactionId::parse_str(value).map_err(|e| format!("invalid transaction id '{}': {}", value, e))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", value, e))
}

fn parse_amount(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value).map_err(|_| format!("invalid amount '{}'", value))
}

/// Streaming reader over log lines
pub struct LogReader<R: Read> {
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> LogReader<R> {
    pub fn new(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();

        Self { records }
    }
}

impl<R: Read> Iterator for LogReader<R> {
    type Item = Result<LogRecord, BankError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|pos| pos.line());
                return Some(Err(BankError::log_parse(line, e.to_string())));
            }
        };
        let line = record.position().map(|pos| pos.line());
        Some(parse_record(&record, line))
    }
}
