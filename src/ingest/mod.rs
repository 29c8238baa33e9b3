//! Split ingestion: walking a row cursor and handing vertices to the engine.

pub mod emitter;
pub mod engine;

pub use emitter::VertexRecordEmitter;
pub use engine::{
    ingest_split, EngineVertex, ErrorPolicy, IngestSummary, SimpleVertex, SimpleVertexFactory,
    VertexFactory,
};
