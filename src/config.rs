use crate::codec::Codec;
use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub output: PathBuf,
    pub progress: bool,                 // per-file line spinner
    pub progress_label: Option<String>, // prefix for spinner messages
    pub archive: Option<Codec>,         // compressed copy of the finished output

    // IO tuning
    pub read_buffer_bytes: usize,  // BufReader capacity over the decoder
    pub write_buffer_bytes: usize, // BufWriter capacity under the CSV writer
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output_combined.csv"),
            progress: true,
            progress_label: None,
            archive: Some(Codec::Gzip),
            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl ExportOptions {
    pub fn with_output(mut self, path: impl AsRef<Path>) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_archive(mut self, codec: Option<Codec>) -> Self {
        self.archive = codec;
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
