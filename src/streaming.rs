//! The one-pass per-file pipeline: decompress → lines → decode → transform → stats → sink.

use crate::codec::Codec;
use crate::envelope::{Envelope, LineDecoder};
use crate::error::ExportError;
use crate::progress::ProgressScope;
use crate::reader::for_each_line;
use crate::record::Record;
use crate::stats::Statistics;
use crate::transform::SourceType;
use crate::writer::RowSink;
use std::path::{Path, PathBuf};

/// What one fully drained input file contributed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub source: SourceType,
    pub envelope: Envelope,
    pub lines: u64,
    pub records: u64,
    pub rows: u64,
    pub malformed: u64,
}

fn emit<S: RowSink>(
    source: SourceType,
    rec: &Record,
    sink: &mut S,
    stats: &mut Statistics,
    report: &mut FileReport,
) -> Result<(), ExportError> {
    report.records += 1;
    if let Some(row) = source.apply(rec) {
        sink.write_row(&row)?;
        stats.record(&row.country);
        report.rows += 1;
    }
    Ok(())
}

/// Stream one export file into `sink`, counting emitted rows per country in `stats`.
///
/// Malformed lines are logged and skipped. Missing/unreadable files and decompression
/// failures are returned as per-file errors (rows emitted before a decompression failure
/// stay written and counted). Sink failures propagate immediately.
pub fn stream_file<S: RowSink>(
    path: &Path,
    source: SourceType,
    envelope: Envelope,
    sink: &mut S,
    stats: &mut Statistics,
    read_buf_bytes: usize,
    progress: &ProgressScope,
) -> Result<FileReport, ExportError> {
    let mut report = FileReport {
        path: path.to_path_buf(),
        source,
        envelope,
        lines: 0,
        records: 0,
        rows: 0,
        malformed: 0,
    };
    let mut decoder = LineDecoder::new(envelope);

    let lines = for_each_line(path, Codec::from_path(path), read_buf_bytes, |line_no, line| {
        progress.inc_lines(1);
        match line.and_then(|l| decoder.push_line(l)) {
            Ok(records) => {
                for rec in &records {
                    emit(source, rec, sink, stats, &mut report)?;
                }
            }
            Err(cause) => {
                report.malformed += 1;
                let err = ExportError::Decode { path: path.to_path_buf(), line: line_no, source: cause };
                tracing::warn!("Skipping malformed record: {}", err);
            }
        }
        Ok(())
    })?;

    if let Some(rec) = decoder.finish() {
        emit(source, &rec, sink, stats, &mut report)?;
    }
    report.lines = lines;
    Ok(report)
}
