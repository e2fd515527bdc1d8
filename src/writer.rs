//! CSV output table: created once with its header, then appended row by row.

use crate::error::ExportError;
use crate::record::{OutputRow, OUTPUT_HEADER};
use crate::util::create_new_with_backoff;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Destination for transformed rows.
pub trait RowSink {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), ExportError>;
}

/// In-memory sink, handy for inspecting one file's contribution.
impl RowSink for Vec<OutputRow> {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), ExportError> {
        self.push(row.clone());
        Ok(())
    }
}

/// Appends rows to a CSV file that did not exist before this writer created it.
pub struct CsvRowWriter {
    path: PathBuf,
    w: csv::Writer<BufWriter<File>>,
    rows: u64,
}

impl CsvRowWriter {
    /// Create the file (refusing to touch an existing one), write the header and flush it.
    pub fn create(path: &Path, buf_bytes: usize) -> Result<Self, ExportError> {
        let file = create_new_with_backoff(path, 16, 50).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                ExportError::OutputConflict(path.to_path_buf())
            } else {
                ExportError::write(path, e)
            }
        })?;
        let w = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(BufWriter::with_capacity(buf_bytes.max(8 * 1024), file));
        let mut this = Self { path: path.to_path_buf(), w, rows: 0 };
        this.w.write_record(OUTPUT_HEADER).map_err(|e| ExportError::write(path, e))?;
        this.flush()?;
        Ok(this)
    }

    /// Data rows written so far (header excluded).
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), ExportError> {
        self.w.flush().map_err(|e| ExportError::write(&self.path, e))
    }

    /// Flush everything down to the file. Returns the number of data rows.
    pub fn finish(mut self) -> Result<u64, ExportError> {
        self.flush()?;
        let inner = self
            .w
            .into_inner()
            .map_err(|e| ExportError::write(&self.path, io::Error::new(e.error().kind(), e.error().to_string())))?;
        inner.into_inner().map_err(|e| ExportError::write(&self.path, e.into_error()))?;
        Ok(self.rows)
    }
}

impl RowSink for CsvRowWriter {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), ExportError> {
        self.w.write_record(row.fields()).map_err(|e| ExportError::write(&self.path, e))?;
        self.rows += 1;
        Ok(())
    }
}
