mod codec;
mod config;
mod dynamo;
mod envelope;
mod error;
mod ion;
mod paths;
mod pipeline;
mod progress;
mod reader;
mod record;
mod stats;
mod streaming;
mod transform;
mod util;
mod writer;

pub use crate::config::ExportOptions;
pub use crate::error::{DecodeError, ExportError};
pub use crate::pipeline::{ExportJob, RunSummary, SkippedFile, SnapshotExport};

// Data model and per-source rules.
pub use crate::record::{OutputRow, Record, Scalar, OUTPUT_HEADER};
pub use crate::stats::Statistics;
pub use crate::transform::SourceType;

// Decoders, usable on their own for inspecting a single line or wrapper stream.
pub use crate::dynamo::{decode_item_line, AttributeValue};
pub use crate::envelope::{Envelope, LineDecoder};
pub use crate::ion::{parse_values as parse_ion_values, IonValue};

// Single-file pipeline and its building blocks.
pub use crate::codec::Codec;
pub use crate::reader::for_each_line;
pub use crate::streaming::{stream_file, FileReport};
pub use crate::writer::{CsvRowWriter, RowSink};

pub use crate::paths::{discover_export_files, is_export_file};
pub use crate::progress::{make_line_spinner, ProgressScope};
pub use crate::util::init_tracing_once;
