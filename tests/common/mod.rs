#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Gzip-compress raw bytes into `path`.
pub fn write_gz_bytes(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = GzEncoder::new(f, Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap();
}

/// Write a `.gz` export file containing the provided lines, `\n`-terminated.
pub fn write_gz_lines(path: &Path, lines: &[String]) {
    let mut body = String::new();
    for l in lines {
        body.push_str(l);
        body.push('\n');
    }
    write_gz_bytes(path, body.as_bytes());
}

/// Write a `.zst` export file containing the provided lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// A gzip file cut off halfway through: the header is valid, the stream is not.
pub fn write_truncated_gz(path: &Path, lines: &[String]) {
    write_gz_lines(path, lines);
    let mut bytes = Vec::new();
    File::open(path).unwrap().read_to_end(&mut bytes).unwrap();
    bytes.truncate(bytes.len() / 2);
    fs::write(path, bytes).unwrap();
}

/// One DynamoDB-JSON export line with string attributes.
pub fn dynamo_line(fields: &[(&str, &str)]) -> String {
    let mut item = Map::new();
    for (k, v) in fields {
        item.insert(k.to_string(), json!({ "S": v }));
    }
    json!({ "Item": Value::Object(item) }).to_string()
}

/// One Ion export line: `$ion_1_0 {Item:{k:"v",...}}`.
pub fn ion_line(fields: &[(&str, &str)]) -> String {
    let body: Vec<String> = fields.iter().map(|(k, v)| format!("{}:\"{}\"", k, v)).collect();
    format!("$ion_1_0 {{Item:{{{}}}}}", body.join(","))
}

/// Read a CSV file into its raw lines (header included).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    BufReader::new(f).lines().map(|l| l.unwrap()).collect()
}

/// Read data rows (header excluded) via the csv crate.
pub fn read_csv_rows(path: &Path) -> Vec<Vec<String>> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
        .collect()
}

/// Scratch directory that lives for the rest of the test process.
pub fn scratch_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Snapshot layout used across tests:
/// - `user_segments/seg.json.gz`: two segment rows (VN, TH)
/// - `user_profiles/a.json.gz`: u1 (VN), u2 (US), one malformed line, u4 (VN)
/// - `notifications/n.json.gz`: u3 (vi), u5 (en)
pub fn make_snapshot_basic() -> PathBuf {
    let base = scratch_dir();
    write_gz_lines(
        &base.join("user_segments").join("seg.json.gz"),
        &[
            dynamo_line(&[("PK", "COUNTRY#VN"), ("SK", "#USER#s1"), ("country", "VN"), ("userId", "s1")]),
            dynamo_line(&[("PK", "COUNTRY#TH"), ("SK", "#USER#s2"), ("country", "TH"), ("userId", "s2")]),
        ],
    );
    write_gz_lines(
        &base.join("user_profiles").join("a.json.gz"),
        &[
            dynamo_line(&[("PK", "x"), ("SK", "y"), ("country", "VN"), ("userId", "u1")]),
            dynamo_line(&[("country", "US"), ("userId", "u2")]),
            "{\"Item\": {\"country\": ".to_string(),
            dynamo_line(&[("country", "VN"), ("userId", "u4")]),
        ],
    );
    write_gz_lines(
        &base.join("notifications").join("n.json.gz"),
        &[
            dynamo_line(&[("userId", "u3"), ("language", "vi")]),
            dynamo_line(&[("userId", "u5"), ("language", "en")]),
        ],
    );
    base
}
