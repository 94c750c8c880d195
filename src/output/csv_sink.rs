//! Delimited file output
//!
//! Writes a header row of column names followed by one row per record. Paths
//! ending in `.tsv` are tab-delimited; everything else is comma-delimited.

use crate::extract::Record;
use crate::output::traits::{check_columns, OutputResult, OutputSink};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink writing records to a CSV or TSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    /// Creates a sink for `path`, picking the delimiter from its extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        Self { path, delimiter }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the table to any writer
    fn write_to<W: Write>(&self, writer: W, columns: &[String], records: &[Record]) -> OutputResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        writer.write_record(columns)?;
        for record in records {
            check_columns(columns, record)?;
            writer.write_record(record.row(columns))?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl OutputSink for CsvSink {
    fn write_records(&mut self, columns: &[String], records: &[Record]) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        self.write_to(file, columns, records)
    }
}
