//! Compression codecs: decoding input snapshots and writing the compressed copy of the output.

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::util::{create_new_with_backoff, open_with_backoff};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    Gzip,
    Zstd,
}

impl Codec {
    /// `.zst` selects zstd; every other name is treated as gzip.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Codec::Zstd,
            _ => Codec::Gzip,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Gzip => "gz",
            Codec::Zstd => "zst",
        }
    }

    /// Wrap a compressed byte stream in a streaming decoder.
    pub fn decoder<'a, R: Read + 'a>(&self, inner: R) -> io::Result<Box<dyn Read + 'a>> {
        match self {
            Codec::Gzip => Ok(Box::new(MultiGzDecoder::new(inner))),
            Codec::Zstd => {
                let mut dec = zstd::stream::read::Decoder::new(inner)?;
                // Large windows otherwise fail with "Frame requires too much memory".
                dec.window_log_max(31)?;
                Ok(Box::new(dec))
            }
        }
    }

    /// Path of the compressed copy of `path`: `<path>.gz` or `<path>.zst`.
    pub fn archive_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }

    /// Stream `src` through the encoder into `dest`, which must not exist yet
    /// (`io::ErrorKind::AlreadyExists` otherwise).
    pub fn compress_file(&self, src: &Path, dest: &Path, buf_bytes: usize) -> io::Result<u64> {
        let input = open_with_backoff(src, 16, 50)?;
        let mut reader = BufReader::with_capacity(buf_bytes, input);
        let out = create_new_with_backoff(dest, 16, 50)?;
        let out = BufWriter::with_capacity(buf_bytes, out);
        let n = match self {
            Codec::Gzip => {
                let mut enc = GzEncoder::new(out, Compression::default());
                let n = io::copy(&mut reader, &mut enc)?;
                enc.finish()?.flush()?;
                n
            }
            Codec::Zstd => {
                let mut enc = zstd::stream::write::Encoder::new(out, 19)?;
                let n = io::copy(&mut reader, &mut enc)?;
                enc.finish()?.flush()?;
                n
            }
        };
        Ok(n)
    }
}
