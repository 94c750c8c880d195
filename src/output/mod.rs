//! Output module for writing records and reporting runs
//!
//! This module handles:
//! - Writing the final record table to a delimited file
//! - Printing a summary of the run

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::CsvSink;
pub use stats::{field_coverage, print_summary, FieldCoverage};
pub use traits::{OutputError, OutputResult, OutputSink};
