use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::{DecoderOptions, LinkTableDecoder};
use crate::error::{IngestError, SourceError};
use crate::ingest::{ingest_split, ErrorPolicy, IngestSummary, SimpleVertexFactory, VertexRecordEmitter};
use crate::model::VertexRecord;
use crate::row::{CancelFlag, Cancellable, CsvRowSource};

/// How decoded vertices are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordFormat {
    /// Tab-separated `id`, `value`, `[targets]`.
    #[default]
    Text,
    /// One JSON object per line.
    JsonLines,
}

/// Configuration for decoding one dump file.
#[derive(Debug, Clone)]
pub struct DecodeDumpConfig {
    /// Path to the CSV row dump.
    pub path: PathBuf,
    /// Decoder column layout and policies.
    pub decoder: DecoderOptions,
    /// Reaction to rows that fail to decode.
    pub on_error: ErrorPolicy,
    /// Output format for vertices.
    pub format: RecordFormat,
    /// Stop after this many vertices.
    pub limit: Option<u64>,
}

impl DecodeDumpConfig {
    /// Creates a config with default decoder options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            decoder: DecoderOptions::default(),
            on_error: ErrorPolicy::default(),
            format: RecordFormat::default(),
            limit: None,
        }
    }
}

/// Error type for CLI decode operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Generic error message.
    #[error("{0}")]
    Message(String),
    /// IO error writing output.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON encoding error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Failure while ingesting the dump.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<SourceError> for CliError {
    fn from(value: SourceError) -> Self {
        CliError::Ingest(value.into())
    }
}

/// Decodes every row of a dump and writes the resulting vertices to `out`.
///
/// Output errors and `limit` both stop the split early; the remaining rows
/// are left unread.
pub fn run_decode<W: Write>(cfg: &DecodeDumpConfig, out: &mut W) -> Result<IngestSummary, CliError> {
    if !cfg.path.exists() {
        return Err(CliError::Message(format!(
            "row dump {} does not exist",
            cfg.path.display()
        )));
    }
    let stop = CancelFlag::new();
    if cfg.limit == Some(0) {
        stop.cancel();
    }
    let source = Cancellable::new(CsvRowSource::open(&cfg.path)?, stop.clone());
    let decoder = LinkTableDecoder::new(cfg.decoder.clone());
    let mut emitter = VertexRecordEmitter::new(source, decoder);

    let mut partial = IngestSummary::default();
    let mut write_err: Option<CliError> = None;
    let result = ingest_split(&mut emitter, &SimpleVertexFactory, cfg.on_error, |vertex| {
        if write_err.is_some() || cfg.limit.is_some_and(|limit| partial.vertices >= limit) {
            return;
        }
        let record = VertexRecord::from(vertex);
        if let Err(err) = write_record(&mut *out, &record, cfg.format) {
            write_err = Some(err);
            stop.cancel();
            return;
        }
        partial.vertices += 1;
        partial.edges += record.edges.len() as u64;
        if record.is_dangling() {
            partial.dangling += 1;
        }
        if cfg.limit.is_some_and(|limit| partial.vertices >= limit) {
            stop.cancel();
        }
    });
    if let Some(err) = write_err {
        return Err(err);
    }
    match result {
        Ok(summary) => Ok(summary),
        Err(IngestError::Source(SourceError::Cancelled)) => {
            partial.rows_read = emitter.rows_read();
            partial.rows_skipped = partial.rows_read - partial.vertices;
            Ok(partial)
        }
        Err(err) => Err(err.into()),
    }
}

fn write_record<W: Write>(out: &mut W, record: &VertexRecord, format: RecordFormat) -> Result<(), CliError> {
    match format {
        RecordFormat::Text => writeln!(out, "{record}")?,
        RecordFormat::JsonLines => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
