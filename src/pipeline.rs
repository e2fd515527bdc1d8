use crate::codec::Codec;
use crate::config::ExportOptions;
use crate::envelope::Envelope;
use crate::error::ExportError;
use crate::progress::ProgressScope;
use crate::stats::Statistics;
use crate::streaming::{stream_file, FileReport};
use crate::transform::SourceType;
use crate::util::init_tracing_once;
use crate::writer::CsvRowWriter;
use std::io;
use std::path::{Path, PathBuf};

/// One ordered list of export files sharing a source type.
#[derive(Clone, Debug)]
pub struct ExportJob {
    pub files: Vec<PathBuf>,
    pub source: SourceType,
    /// `None` infers the envelope from each file name.
    pub envelope: Option<Envelope>,
}

impl ExportJob {
    pub fn new<I, P>(source: SourceType, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            files: files.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            source,
            envelope: None,
        }
    }

    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }
}

/// An input file the run moved past without finishing.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub source: SourceType,
    pub error: ExportError,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub output: PathBuf,
    pub statistics: Statistics,
    pub files: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
    pub rows_written: u64,
    pub archive: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct SnapshotExport {
    pub(crate) opts: ExportOptions,
}

impl SnapshotExport {
    pub fn new() -> Self {
        Self { opts: ExportOptions::default() }
    }

    pub fn with_options(opts: ExportOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output(path); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn archive(mut self, codec: Option<Codec>) -> Self { self.opts = self.opts.with_archive(codec); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    /// Run every job in order into a fresh output table.
    ///
    /// Refuses to start if the output, or its compressed copy when one is requested,
    /// already exists. Missing, unreadable or corrupt input files are logged and skipped;
    /// a failed write ends the run.
    pub fn run_all(&self, jobs: &[ExportJob]) -> Result<RunSummary, ExportError> {
        init_tracing_once();
        let out_path = self.opts.output.clone();
        if out_path.exists() {
            return Err(ExportError::OutputConflict(out_path));
        }
        if let Some(dest) = self.opts.archive.map(|codec| codec.archive_path(&out_path)) {
            if dest.exists() {
                return Err(ExportError::OutputConflict(dest));
            }
        }
        let mut writer = CsvRowWriter::create(&out_path, self.opts.write_buffer_bytes)?;
        tracing::info!("Writing {}", out_path.display());

        let mut stats = Statistics::new();
        let mut files = Vec::new();
        let mut skipped = Vec::new();

        for job in jobs {
            tracing::info!("Processing {} files ({} planned)", job.source, job.files.len());
            for path in &job.files {
                let envelope = job.envelope.unwrap_or_else(|| Envelope::from_path(path));
                let label = match &self.opts.progress_label {
                    Some(prefix) => format!("{} {}", prefix, path.display()),
                    None => path.display().to_string(),
                };
                let progress = ProgressScope::lines(self.opts.progress, label);
                tracing::info!(path = %path.display(), source = %job.source, ?envelope, "Processing file");

                let res = stream_file(
                    path,
                    job.source,
                    envelope,
                    &mut writer,
                    &mut stats,
                    self.opts.read_buffer_bytes,
                    &progress,
                );
                writer.flush()?;
                match res {
                    Ok(report) => {
                        progress.finish(format!("{} rows", report.rows));
                        tracing::info!(
                            path = %path.display(),
                            lines = report.lines,
                            rows = report.rows,
                            malformed = report.malformed,
                            total_rows = writer.rows(),
                            "File done"
                        );
                        files.push(report);
                    }
                    Err(e) if e.is_file_recoverable() => {
                        progress.finish("skipped");
                        tracing::warn!("Skipping file: {}", e);
                        skipped.push(SkippedFile { path: path.clone(), source: job.source, error: e });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        let rows_written = writer.finish()?;
        debug_assert_eq!(rows_written, stats.total());

        let archive = match self.opts.archive {
            Some(codec) => {
                let dest = codec.archive_path(&out_path);
                codec.compress_file(&out_path, &dest, self.opts.write_buffer_bytes).map_err(|e| {
                    if e.kind() == io::ErrorKind::AlreadyExists {
                        ExportError::OutputConflict(dest.clone())
                    } else {
                        ExportError::write(&dest, e)
                    }
                })?;
                tracing::info!("Compressed copy written to {}", dest.display());
                Some(dest)
            }
            None => None,
        };

        Ok(RunSummary { output: out_path, statistics: stats, files, skipped, rows_written, archive })
    }
}
