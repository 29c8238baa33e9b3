//! Row to vertex decoding.
//!
//! [`VertexDecoder`] is the capability callers depend on; each storage
//! layout provides its own implementation. [`LinkTableDecoder`] handles the
//! web link table layout:
//!
//! ```text
//! http://www.source.com  s:s                    <8-byte big-endian f64 score>
//!                        ol:http://www.a.com    <unused>
//!                        ol:http://www.b.com    <unused>
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::DecodeError;
use crate::model::{EdgeRecord, VertexRecord};
use crate::primitives::bytes::{be, text};
use crate::row::Row;

/// Turns one row into one vertex record.
///
/// Implementations must be pure: the same row always yields a field-equal
/// record, and a failure never yields a partial record.
pub trait VertexDecoder: Send + Sync {
    /// Decodes `row` into a vertex record.
    fn decode(&self, row: &Row) -> Result<VertexRecord, DecodeError>;
}

impl<D: VertexDecoder + ?Sized> VertexDecoder for &D {
    fn decode(&self, row: &Row) -> Result<VertexRecord, DecodeError> {
        (**self).decode(row)
    }
}

impl<D: VertexDecoder + ?Sized> VertexDecoder for Box<D> {
    fn decode(&self, row: &Row) -> Result<VertexRecord, DecodeError> {
        (**self).decode(row)
    }
}

impl<D: VertexDecoder + ?Sized> VertexDecoder for std::sync::Arc<D> {
    fn decode(&self, row: &Row) -> Result<VertexRecord, DecodeError> {
        (**self).decode(row)
    }
}

/// What to do when a row carries no score cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingScorePolicy {
    /// Use `0.0`.
    #[default]
    Zero,
    /// Use `NaN`.
    Nan,
    /// Fail with [`DecodeError::MissingScore`].
    Error,
}

/// Column layout and policies for [`LinkTableDecoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Family whose qualifiers are outlink targets.
    pub outlink_family: String,
    /// Family holding the score cell.
    pub score_family: String,
    /// Qualifier of the score cell.
    pub score_qualifier: String,
    /// Score applied when the score cell is absent.
    pub missing_score: MissingScorePolicy,
    /// Collapse repeated outlink targets into one edge.
    pub dedup_outlinks: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            outlink_family: "ol".into(),
            score_family: "s".into(),
            score_qualifier: "s".into(),
            missing_score: MissingScorePolicy::Zero,
            dedup_outlinks: false,
        }
    }
}

impl DecoderOptions {
    /// Sets the outlink family.
    pub fn outlink_family(mut self, family: impl Into<String>) -> Self {
        self.outlink_family = family.into();
        self
    }

    /// Sets the score family and qualifier.
    pub fn score_column(mut self, family: impl Into<String>, qualifier: impl Into<String>) -> Self {
        self.score_family = family.into();
        self.score_qualifier = qualifier.into();
        self
    }

    /// Sets the missing-score policy.
    pub fn missing_score(mut self, policy: MissingScorePolicy) -> Self {
        self.missing_score = policy;
        self
    }

    /// Enables or disables outlink deduplication.
    pub fn dedup_outlinks(mut self, enabled: bool) -> Self {
        self.dedup_outlinks = enabled;
        self
    }
}

/// Decoder for the link table layout (`ol` outlinks, `s:s` score).
#[derive(Debug, Clone, Default)]
pub struct LinkTableDecoder {
    options: DecoderOptions,
}

impl LinkTableDecoder {
    /// Creates a decoder with the given options.
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    fn decode_score(&self, row: &Row, display_key: &str) -> Result<f64, DecodeError> {
        let opts = &self.options;
        match row.value(opts.score_family.as_bytes(), opts.score_qualifier.as_bytes()) {
            Some(raw) => be::decode_f64(raw).ok_or_else(|| DecodeError::MalformedScore {
                row: display_key.to_owned(),
                len: raw.len(),
            }),
            None => match opts.missing_score {
                MissingScorePolicy::Zero => Ok(0.0),
                MissingScorePolicy::Nan => Ok(f64::NAN),
                MissingScorePolicy::Error => Err(DecodeError::MissingScore {
                    row: display_key.to_owned(),
                }),
            },
        }
    }

    fn decode_edges(&self, row: &Row, display_key: &str) -> Result<Vec<EdgeRecord>, DecodeError> {
        let Some(family) = row.family(self.options.outlink_family.as_bytes()) else {
            return Ok(Vec::new());
        };
        let mut edges: Vec<EdgeRecord> = Vec::with_capacity(family.len());
        for cell in family.iter() {
            let target = text::decode_utf8(&cell.qualifier).ok_or_else(|| {
                DecodeError::MalformedEdgeTarget {
                    row: display_key.to_owned(),
                    qualifier: text::display_lossy(&cell.qualifier),
                }
            })?;
            // cells are qualifier-sorted, so repeats are always adjacent
            if self.options.dedup_outlinks
                && edges.last().is_some_and(|prev| prev.target == target)
            {
                continue;
            }
            edges.push(EdgeRecord::new(target));
        }
        Ok(edges)
    }
}

impl VertexDecoder for LinkTableDecoder {
    fn decode(&self, row: &Row) -> Result<VertexRecord, DecodeError> {
        let key = row.key();
        let id = match text::decode_utf8(key) {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(DecodeError::MalformedKey {
                    row: text::display_lossy(key),
                })
            }
        };
        let value = self.decode_score(row, id)?;
        let edges = self.decode_edges(row, id)?;
        trace!(row = id, value, edges = edges.len(), "decode.row");
        Ok(VertexRecord {
            id: id.to_owned(),
            value,
            edges,
        })
    }
}
