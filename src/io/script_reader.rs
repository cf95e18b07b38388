//! Operation script reader with iterator interface
//!
//! Provides a streaming iterator over the operations of a CSV script.
//! Delegates format concerns to the csv_format module.
//!
//! ```no_run
//! use core_banker::io::ScriptReader;
//! use std::path::Path;
//!
//! let reader = ScriptReader::from_path(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(operation) => println!("Applying {:?}", operation),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `from_path()`
//! - Individual row errors are yielded as `ParseError` items with a line number

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{BankError, Operation};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming script reader
pub struct ScriptReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    headers: Option<StringRecord>,
}

impl<R: Read> ScriptReader<R> {
    /// Read a script from any reader
    ///
    /// The CSV reader is configured to:
    /// - Expect a header row
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing empty columns may be omitted)
    pub fn new(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            headers: None,
        }
    }
}

impl ScriptReader<File> {
    /// Open a script file
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `IoError` for any other open failure
    pub fn from_path(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BankError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => BankError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        Ok(Self::new(file))
    }
}

impl<R: Read> Iterator for ScriptReader<R> {
    type Item = Result<Operation, BankError>;

    /// Get the next operation from the script
    ///
    /// Each row is deserialized against the header row and converted with
    /// `csv_format::convert_csv_record`. Errors carry the row's line number.
    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(BankError::from(e))),
        };
        let line = record.position().map(|pos| pos.line());

        if self.headers.is_none() {
            match self.records.reader_mut().headers() {
                Ok(headers) => self.headers = Some(headers.clone()),
                Err(e) => return Some(Err(BankError::from(e))),
            }
        }

        let csv_record: CsvRecord = match record.deserialize(self.headers.as_ref()) {
            Ok(csv_record) => csv_record,
            Err(e) => return Some(Err(BankError::parse_error(line, e.to_string()))),
        };

        Some(
            convert_csv_record(csv_record)
                .map_err(|message| BankError::parse_error(line, message)),
        )
    }
}
