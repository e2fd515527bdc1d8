//! Streaming line reader over a compressed snapshot: open, decompress, split into lines.
//! Only the current line is buffered.

use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::codec::Codec;
use crate::error::{DecodeError, ExportError};
use crate::util::open_with_backoff;

/// Map an open failure to the per-file error taxonomy.
fn open_error(path: &Path, e: io::Error) -> ExportError {
    if e.kind() == io::ErrorKind::NotFound {
        ExportError::FileNotFound(path.to_path_buf())
    } else {
        ExportError::InputUnreadable { path: path.to_path_buf(), source: e }
    }
}

/// Stream a compressed file line-by-line; call `on_line(line_no, line)` for each line.
///
/// `\n` and `\r\n` terminators are stripped. A line that is not valid UTF-8 is handed to
/// `on_line` as `Err(DecodeError::InvalidUtf8)` so the caller can skip it and keep going.
/// Read/decompression failures end the file with `ExportError::Decompression`; errors
/// returned by `on_line` propagate unchanged. Returns the number of lines read.
pub fn for_each_line(
    path: &Path,
    codec: Codec,
    read_buf_bytes: usize,
    mut on_line: impl FnMut(u64, Result<&str, DecodeError>) -> Result<(), ExportError>,
) -> Result<u64, ExportError> {
    let file = open_with_backoff(path, 16, 50).map_err(|e| open_error(path, e))?;
    let decoder = codec
        .decoder(file)
        .map_err(|e| ExportError::Decompression { path: path.to_path_buf(), lines: 0, source: e })?;
    let mut reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), decoder);

    let mut buf: Vec<u8> = Vec::with_capacity(16 * 1024);
    let mut lines = 0u64;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ExportError::Decompression { path: path.to_path_buf(), lines, source: e })?;
        if n == 0 {
            break;
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        lines += 1;
        let line = std::str::from_utf8(&buf).map_err(|_| DecodeError::InvalidUtf8);
        on_line(lines, line)?;
    }
    Ok(lines)
}
