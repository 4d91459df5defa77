//! CSV-backed row source and row writer
//!
//! The reader is configured with `has_headers(false)` so the header row reaches
//! the binding session as an ordinary first row, and `flexible(true)` so short
//! or long rows are left for the session to judge.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::app::services::binding_engine::RowSource;
use crate::{Error, Result};

/// Row source reading CSV records
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl CsvRowSource<File> {
    /// Open a CSV file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvRowSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        Self {
            reader,
            record: StringRecord::new(),
        }
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        let more = self.reader.read_record(&mut self.record).map_err(|e| {
            let line = e.position().map_or(0, |position| position.line());
            Error::row_source(format!("Malformed CSV near line {}", line), Some(e))
        })?;
        if !more {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}

/// Write rows as CSV, allowing rows of differing length
pub fn write_rows<W: Write>(writer: W, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io("Failed to flush CSV output", e))
}
