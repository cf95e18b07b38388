//! I/O module
//!
//! Handles operation scripts, the transaction log and output.
//!
//! # Components
//!
//! - `csv_format` - Script format handling (record conversion, account output)
//! - `script_reader` - Script reader with iterator interface
//! - `log_file` - File-backed transaction log and its reader
//! - `memory_log` - In-memory transaction log for tests and benchmarks
//! - `report` - Account history blocks

pub mod csv_format;
pub mod log_file;
pub mod memory_log;
pub mod report;
pub mod script_reader;

pub use csv_format::{convert_csv_record, write_accounts_csv, CsvRecord};
pub use log_file::{FileLog, LogReader};
pub use memory_log::MemoryLog;
pub use report::{write_histories, write_history};
pub use script_reader::ScriptReader;
