#[path = "common/mod.rs"]
mod common;

use common::*;
use snapetl::{stream_file, Envelope, ExportError, OutputRow, ProgressScope, RowSink, SourceType, Statistics};
use std::io;
use std::path::PathBuf;

const BUF: usize = 64 * 1024;

/// One profile file streamed into an in-memory sink:
/// the malformed line and the US record are dropped, VN records come out in order.
#[test]
fn profile_file_into_memory_sink() {
    let base = make_snapshot_basic();
    let path = base.join("user_profiles").join("a.json.gz");

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut stats = Statistics::new();
    let report = stream_file(
        &path,
        SourceType::Profile,
        Envelope::DynamoJson,
        &mut rows,
        &mut stats,
        BUF,
        &ProgressScope::lines(false, ""),
    )
    .unwrap();

    assert_eq!(report.lines, 4);
    assert_eq!(report.malformed, 1);
    assert_eq!(report.records, 3);
    assert_eq!(report.rows, 2);
    let users: Vec<_> = rows.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(users, vec!["u1", "u4"]);
    assert_eq!(rows[0].pk, "COUNTRY#VN");
    assert_eq!(rows[0].sk, "#USER#u1");
    assert_eq!(stats.get("VN"), 2);
    assert_eq!(stats.total(), rows.len() as u64);
}

/// CRLF terminators, blank lines and a missing final newline are all handled.
#[test]
fn universal_newlines_and_blank_lines() {
    let base = scratch_dir();
    let path = base.join("crlf.json.gz");
    let body = format!(
        "{}\r\n\r\n   \n{}",
        dynamo_line(&[("userId", "a"), ("language", "vi")]),
        dynamo_line(&[("userId", "b"), ("language", "vi")]),
    );
    write_gz_bytes(&path, body.as_bytes());

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut stats = Statistics::new();
    let report = stream_file(&path, SourceType::Notification, Envelope::DynamoJson, &mut rows, &mut stats, BUF, &ProgressScope::lines(false, "")).unwrap();

    assert_eq!(report.lines, 4);
    assert_eq!(report.malformed, 0);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.country == "CZ"));
    assert_eq!(stats.get("CZ"), 2);
}

#[test]
fn invalid_utf8_line_is_skipped() {
    let base = scratch_dir();
    let path = base.join("bytes.json.gz");
    let mut body = Vec::new();
    body.extend_from_slice(b"\xff\xfe not text\n");
    body.extend_from_slice(dynamo_line(&[("country", "VN"), ("userId", "ok")]).as_bytes());
    body.push(b'\n');
    write_gz_bytes(&path, &body);

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut stats = Statistics::new();
    let report = stream_file(&path, SourceType::Profile, Envelope::DynamoJson, &mut rows, &mut stats, BUF, &ProgressScope::lines(false, "")).unwrap();
    assert_eq!(report.malformed, 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, "ok");
}

/// The Ion variant emits the trailing in-progress record at end of file.
#[test]
fn ion_file_flushes_last_record() {
    let base = scratch_dir();
    let path = base.join("segments.ion.gz");
    write_gz_lines(
        &path,
        &[
            ion_line(&[("PK", "COUNTRY#VN"), ("SK", "#USER#1"), ("country", "VN"), ("userId", "1")]),
            "{}".to_string(),
            ion_line(&[("PK", "COUNTRY#TH"), ("SK", "#USER#2"), ("country", "TH"), ("userId", "2")]),
        ],
    );

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut stats = Statistics::new();
    let report = stream_file(&path, SourceType::UserSegment, Envelope::from_path(&path), &mut rows, &mut stats, BUF, &ProgressScope::lines(false, "")).unwrap();

    assert_eq!(report.envelope, Envelope::Ion);
    assert_eq!(report.records, 2);
    let users: Vec<_> = rows.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(users, vec!["1", "2"]);
    assert_eq!(stats.get("VN"), 1);
    assert_eq!(stats.get("TH"), 1);
}

#[test]
fn zstd_inputs_are_decoded() {
    let base = scratch_dir();
    let path = base.join("profiles.json.zst");
    write_zst_lines(&path, &[dynamo_line(&[("country", "VN"), ("userId", "z1")])]);

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut stats = Statistics::new();
    stream_file(&path, SourceType::Profile, Envelope::DynamoJson, &mut rows, &mut stats, BUF, &ProgressScope::lines(false, "")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sk, "#USER#z1");
}

#[test]
fn missing_and_corrupt_inputs_are_per_file_errors() {
    let base = scratch_dir();
    let mut rows: Vec<OutputRow> = Vec::new();
    let mut stats = Statistics::new();
    let quiet = ProgressScope::lines(false, "");

    let missing = base.join("nope.json.gz");
    let err = stream_file(&missing, SourceType::Profile, Envelope::DynamoJson, &mut rows, &mut stats, BUF, &quiet).unwrap_err();
    assert!(matches!(err, ExportError::FileNotFound(ref p) if p == &missing));
    assert!(err.is_file_recoverable());

    let not_gzip = base.join("plain.json.gz");
    std::fs::write(&not_gzip, dynamo_line(&[("country", "VN"), ("userId", "x")])).unwrap();
    let err = stream_file(&not_gzip, SourceType::Profile, Envelope::DynamoJson, &mut rows, &mut stats, BUF, &quiet).unwrap_err();
    assert!(matches!(err, ExportError::Decompression { .. }));
    assert!(err.is_file_recoverable());

    assert!(rows.is_empty());
    assert!(stats.is_empty());
}

/// Fails every write once `limit` rows have been accepted.
struct FailAfter {
    limit: usize,
    rows: Vec<OutputRow>,
}

impl RowSink for FailAfter {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), ExportError> {
        if self.rows.len() >= self.limit {
            return Err(ExportError::WriteFailure {
                path: PathBuf::from("out.csv"),
                source: io::Error::new(io::ErrorKind::Other, "no space left on device"),
            });
        }
        self.rows.push(row.clone());
        Ok(())
    }
}

/// A sink failure ends the file at once and is not treated as a per-file problem;
/// only the rows the sink accepted are counted.
#[test]
fn sink_failure_is_fatal() {
    let base = scratch_dir();
    let path = base.join("segments.json.gz");
    let lines: Vec<String> = (0..5)
        .map(|i| dynamo_line(&[("PK", "p"), ("SK", "s"), ("country", "VN"), ("userId", &format!("w{}", i))]))
        .collect();
    write_gz_lines(&path, &lines);

    let mut sink = FailAfter { limit: 2, rows: Vec::new() };
    let mut stats = Statistics::new();
    let err = stream_file(
        &path,
        SourceType::UserSegment,
        Envelope::DynamoJson,
        &mut sink,
        &mut stats,
        BUF,
        &ProgressScope::lines(false, ""),
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::WriteFailure { .. }));
    assert!(!err.is_file_recoverable());
    assert_eq!(sink.rows.len(), 2);
    assert_eq!(stats.total(), 2);
}
