use anyhow::{Context, Result};
use snapetl::{discover_export_files, init_tracing_once, ExportError, ExportJob, ExportOptions, SnapshotExport, SourceType};
use std::path::PathBuf;
use std::process::ExitCode;

const DATA_ROOT: &str = "./data";
const OUTPUT: &str = "output_combined.csv";

/// Sub-directories of the data root, processed in this order.
const SOURCES: [(&str, SourceType); 3] = [
    ("user_segments", SourceType::UserSegment),
    ("user_profiles", SourceType::Profile),
    ("notifications", SourceType::Notification),
];

fn run() -> Result<ExitCode> {
    let data_root = PathBuf::from(std::env::var("SNAPETL_DATA_DIR").unwrap_or_else(|_| DATA_ROOT.to_string()));
    let output = PathBuf::from(std::env::var("SNAPETL_OUTPUT").unwrap_or_else(|_| OUTPUT.to_string()));

    let jobs: Vec<ExportJob> = SOURCES
        .iter()
        .map(|(dir, source)| ExportJob::new(*source, discover_export_files(&data_root.join(dir))))
        .collect();

    for job in &jobs {
        println!("{}: {} files", job.source, job.files.len());
    }

    let opts = ExportOptions::default().with_output(&output).with_progress_label("snapetl");
    let summary = match SnapshotExport::with_options(opts).run_all(&jobs) {
        Ok(s) => s,
        Err(e @ ExportError::OutputConflict(_)) => {
            tracing::error!("{}", e);
            eprintln!("Aborted: {}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).with_context(|| format!("exporting into {}", output.display())),
    };

    println!("Data processed and combined into {}", summary.output.display());
    for (country, count) in summary.statistics.iter() {
        println!("  {:<8} {}", country, count);
    }
    println!("  {:<8} {}", "total", summary.rows_written);
    if !summary.skipped.is_empty() {
        println!("Skipped {} file(s):", summary.skipped.len());
        for s in &summary.skipped {
            println!("  {}", s.error);
        }
    }
    if let Some(archive) = &summary.archive {
        println!("Compressed copy: {}", archive.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    init_tracing_once();
    run().map_err(|e| {
        tracing::error!("Run aborted: {:#}", e);
        e
    })
}
