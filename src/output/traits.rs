//! Output sink trait and errors
//!
//! A sink receives the finished record sequence once, at the end of a run, and
//! lays it out in the requested column order.

use crate::extract::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{0}' is not a configured field")]
    UnknownColumn(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the records of a run
pub trait OutputSink {
    /// Writes every record as one row, with values in `columns` order
    ///
    /// # Arguments
    ///
    /// * `columns` - Field names, in output order
    /// * `records` - Records in visit order
    fn write_records(&mut self, columns: &[String], records: &[Record]) -> OutputResult<()>;
}

/// Checks that every column names a field of the record
pub(crate) fn check_columns(columns: &[String], record: &Record) -> OutputResult<()> {
    match columns.iter().find(|c| record.get(c).is_none()) {
        Some(missing) => Err(OutputError::UnknownColumn(missing.clone())),
        None => Ok(()),
    }
}
