use std::fmt;

use serde::Serialize;

/// Payload carried by edges that have no value of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NoValue;

/// The shared edge payload; edge weights are computed downstream.
pub const NO_VALUE: NoValue = NoValue;

/// One outgoing edge of a decoded vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeRecord {
    /// Target vertex id.
    pub target: String,
    /// Edge payload, always [`NO_VALUE`].
    #[serde(skip)]
    pub value: NoValue,
}

impl EdgeRecord {
    /// Creates an edge pointing at `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            value: NO_VALUE,
        }
    }
}

/// A vertex reconstructed from one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexRecord {
    /// Vertex id decoded from the row key.
    pub id: String,
    /// Vertex score.
    pub value: f64,
    /// Outgoing edges in qualifier order.
    pub edges: Vec<EdgeRecord>,
}

impl VertexRecord {
    /// Returns true when the vertex has no outgoing edges.
    pub fn is_dangling(&self) -> bool {
        self.edges.is_empty()
    }
}

impl fmt::Display for VertexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t[", self.id, self.value)?;
        for (idx, edge) in self.edges.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&edge.target)?;
        }
        f.write_str("]")
    }
}
