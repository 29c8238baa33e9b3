//! Rowgraph turns wide-column rows into vertex records for BSP graph engines.
//!
//! Rows flow from a [`row::RowSource`] through a [`decode::VertexDecoder`]
//! into the engine's vertex factory, one split at a time. Partition
//! descriptors for the output side are parsed by [`partition`].

pub mod aggregate;
pub mod cli;
pub mod decode;
pub mod error;
pub mod ingest;
pub mod model;
pub mod partition;
pub mod primitives;
pub mod row;

pub use decode::{DecoderOptions, LinkTableDecoder, MissingScorePolicy, VertexDecoder};
pub use error::{DecodeError, IngestError, Result, SourceError};
pub use model::{EdgeRecord, NoValue, VertexRecord, NO_VALUE};
pub use partition::{parse_partition_values, PartitionSpec};
pub use row::{Row, RowSource};
