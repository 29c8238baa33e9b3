//! Error types for decoding, row sources and ingestion.

use std::io;

use thiserror::Error;

/// Result type alias for split ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Per-row and per-descriptor decoding failures.
///
/// Row keys and qualifiers are carried as display strings with invalid bytes
/// escaped, so a diagnostic always names the row that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The row key is empty or is not valid UTF-8.
    #[error("row '{row}': row key is not a usable vertex id")]
    MalformedKey {
        /// Row key, lossily rendered.
        row: String,
    },
    /// The score cell is present but is not an 8-byte big-endian double.
    #[error("row '{row}': score cell has {len} bytes, expected 8")]
    MalformedScore {
        /// Row key, lossily rendered.
        row: String,
        /// Length of the score cell in bytes.
        len: usize,
    },
    /// The score cell is absent and the decoder is configured to reject that.
    #[error("row '{row}': score cell is missing")]
    MissingScore {
        /// Row key, lossily rendered.
        row: String,
    },
    /// An outlink qualifier is not valid UTF-8 text.
    #[error("row '{row}': outlink qualifier '{qualifier}' is not valid UTF-8")]
    MalformedEdgeTarget {
        /// Row key, lossily rendered.
        row: String,
        /// Offending qualifier with invalid bytes escaped.
        qualifier: String,
    },
    /// A partition descriptor segment is not a clean `key=value` pair.
    #[error("unrecognized partition value format: '{descriptor}' (segment '{segment}')")]
    MalformedPartitionSegment {
        /// The full descriptor as given.
        descriptor: String,
        /// First segment that failed to parse.
        segment: String,
    },
}

/// Failures raised by a row source while advancing its cursor.
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// CSV framing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A cell value is not valid hex.
    #[error("line {line}: invalid hex value: {source}")]
    Hex {
        /// 1-based line number in the dump.
        line: u64,
        /// Decoder failure.
        #[source]
        source: hex::FromHexError,
    },
    /// The dump does not follow the expected layout.
    #[error("row dump format error: {0}")]
    Format(String),
    /// The split was cancelled.
    #[error("row source cancelled")]
    Cancelled,
}

/// Errors surfaced while ingesting a split.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A row failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The row source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// No row remained under the cursor.
    #[error("no row available: split is exhausted")]
    Exhausted,
}

/// Errors raised by the aggregator registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregatorError {
    /// The name is already taken.
    #[error("aggregator '{0}' is already registered")]
    Duplicate(String),
    /// No channel has this name.
    #[error("aggregator '{0}' not found")]
    NotFound(String),
    /// The contribution's scalar type differs from the channel's.
    #[error("aggregator '{name}' holds {expected} values")]
    TypeMismatch {
        /// Channel name.
        name: String,
        /// Scalar type the channel holds.
        expected: &'static str,
    },
}
