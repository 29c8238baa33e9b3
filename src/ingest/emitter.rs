//! Per-split sequencing over a row cursor.

use tracing::debug;

use crate::decode::VertexDecoder;
use crate::error::{IngestError, SourceError};
use crate::model::VertexRecord;
use crate::row::RowSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// The cursor must advance before a row is available.
    Idle,
    /// The cursor sits on a row that has not been decoded yet.
    Ready,
    /// The source is finished, failed, or was cancelled.
    Exhausted,
}

/// Drives one split's row cursor and decodes one row per advance.
///
/// `has_next` advances the cursor at most once per row and is idempotent
/// until `next_vertex` consumes that row. Rows are never decoded ahead of
/// the cursor.
pub struct VertexRecordEmitter<S, D> {
    source: S,
    decoder: D,
    cursor: Cursor,
    rows_read: u64,
}

impl<S: RowSource, D: VertexDecoder> VertexRecordEmitter<S, D> {
    /// Creates an emitter over `source`.
    pub fn new(source: S, decoder: D) -> Self {
        Self {
            source,
            decoder,
            cursor: Cursor::Idle,
            rows_read: 0,
        }
    }

    /// Returns true when another row is available.
    ///
    /// Source failures, including cancellation, are returned here and leave
    /// the emitter exhausted.
    pub fn has_next(&mut self) -> Result<bool, SourceError> {
        match self.cursor {
            Cursor::Ready => return Ok(true),
            Cursor::Exhausted => return Ok(false),
            Cursor::Idle => {}
        }
        match self.source.advance() {
            Ok(true) => {
                self.cursor = Cursor::Ready;
                self.rows_read += 1;
                Ok(true)
            }
            Ok(false) => {
                self.cursor = Cursor::Exhausted;
                Ok(false)
            }
            Err(err) => {
                debug!(error = %err, rows_read = self.rows_read, "ingest.source.failed");
                self.cursor = Cursor::Exhausted;
                Err(err)
            }
        }
    }

    /// Decodes the row under the cursor, advancing first if needed.
    ///
    /// The row is consumed whether or not decoding succeeds.
    pub fn next_vertex(&mut self) -> Result<VertexRecord, IngestError> {
        if !self.has_next()? {
            return Err(IngestError::Exhausted);
        }
        self.cursor = Cursor::Idle;
        let row = self.source.current().ok_or(IngestError::Exhausted)?;
        Ok(self.decoder.decode(row)?)
    }

    /// Rows the cursor has advanced onto so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Returns the underlying source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: RowSource, D: VertexDecoder> Iterator for VertexRecordEmitter<S, D> {
    type Item = Result<VertexRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_vertex()),
            Ok(false) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}
