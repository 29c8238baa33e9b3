//! The engine side of ingestion.
//!
//! The BSP engine owns its vertex representation. It exposes a factory for
//! empty vertices and an `initialize` call that binds decoded fields; the
//! adapter calls `initialize` exactly once per successfully decoded row.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::decode::VertexDecoder;
use crate::error::IngestError;
use crate::model::{EdgeRecord, VertexRecord};
use crate::row::RowSource;

use super::emitter::VertexRecordEmitter;

/// An engine-owned vertex container.
pub trait EngineVertex {
    /// Binds the decoded fields into the engine's representation.
    fn initialize(&mut self, id: String, value: f64, edges: Vec<EdgeRecord>);
}

/// Creates empty engine vertices.
pub trait VertexFactory {
    /// The engine vertex type.
    type Vertex: EngineVertex;

    /// Returns a fresh, uninitialized vertex.
    fn create_vertex(&self) -> Self::Vertex;
}

/// In-memory vertex used by tools and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimpleVertex {
    /// Vertex id.
    pub id: String,
    /// Vertex score.
    pub value: f64,
    /// Outgoing edges.
    pub edges: Vec<EdgeRecord>,
}

impl EngineVertex for SimpleVertex {
    fn initialize(&mut self, id: String, value: f64, edges: Vec<EdgeRecord>) {
        self.id = id;
        self.value = value;
        self.edges = edges;
    }
}

impl From<SimpleVertex> for VertexRecord {
    fn from(v: SimpleVertex) -> Self {
        VertexRecord {
            id: v.id,
            value: v.value,
            edges: v.edges,
        }
    }
}

/// Factory for [`SimpleVertex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleVertexFactory;

impl VertexFactory for SimpleVertexFactory {
    type Vertex = SimpleVertex;

    fn create_vertex(&self) -> SimpleVertex {
        SimpleVertex::default()
    }
}

/// How a split reacts to a row that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the split at the first bad row.
    #[default]
    Abort,
    /// Log the bad row and continue with the next one.
    Skip,
}

/// Counters for one ingested split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Rows the cursor advanced onto.
    pub rows_read: u64,
    /// Vertices handed to the engine.
    pub vertices: u64,
    /// Edges across all emitted vertices.
    pub edges: u64,
    /// Emitted vertices without outgoing edges.
    pub dangling: u64,
    /// Rows dropped under [`ErrorPolicy::Skip`].
    pub rows_skipped: u64,
}

/// Ingests a whole split, passing each initialized vertex to `sink`.
///
/// Source failures always abort. Decode failures abort or are skipped
/// according to `policy`.
pub fn ingest_split<S, D, F, C>(
    emitter: &mut VertexRecordEmitter<S, D>,
    factory: &F,
    policy: ErrorPolicy,
    mut sink: C,
) -> Result<IngestSummary, IngestError>
where
    S: RowSource,
    D: VertexDecoder,
    F: VertexFactory,
    C: FnMut(F::Vertex),
{
    let mut summary = IngestSummary::default();
    while emitter.has_next()? {
        let record = match emitter.next_vertex() {
            Ok(record) => record,
            Err(IngestError::Decode(err)) if policy == ErrorPolicy::Skip => {
                warn!(error = %err, "ingest.row.skipped");
                summary.rows_skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        summary.vertices += 1;
        summary.edges += record.edges.len() as u64;
        if record.is_dangling() {
            summary.dangling += 1;
        }
        let mut vertex = factory.create_vertex();
        vertex.initialize(record.id, record.value, record.edges);
        sink(vertex);
    }
    summary.rows_read = emitter.rows_read();
    info!(
        rows_read = summary.rows_read,
        vertices = summary.vertices,
        edges = summary.edges,
        dangling = summary.dangling,
        rows_skipped = summary.rows_skipped,
        "ingest.split.completed"
    );
    Ok(summary)
}
