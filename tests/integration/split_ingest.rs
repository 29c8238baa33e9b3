#![allow(missing_docs)]

use std::fs;

use rowgraph::{
    ingest::{ingest_split, ErrorPolicy, SimpleVertex, SimpleVertexFactory, VertexRecordEmitter},
    row::{CancelFlag, Cancellable, CsvRowSource, VecRowSource},
    IngestError, LinkTableDecoder, Row, SourceError,
};

const DUMP: &str = "row,family,qualifier,value\n\
    http://a.com,ol,http://b.com,\n\
    http://a.com,ol,http://c.com,\n\
    http://a.com,s,s,3fd0000000000000\n\
    http://b.com,ol,http://c.com,\n\
    http://b.com,s,s,3fd0000000000000\n\
    http://c.com,s,s,3fe0000000000000\n";

#[test]
fn csv_split_feeds_engine_in_row_order() -> rowgraph::Result<()> {
    let dir = tempfile::tempdir().map_err(SourceError::from)?;
    let path = dir.path().join("links.csv");
    fs::write(&path, DUMP).map_err(SourceError::from)?;

    let mut emitter = VertexRecordEmitter::new(CsvRowSource::open(&path)?, LinkTableDecoder::default());
    let mut vertices: Vec<SimpleVertex> = Vec::new();
    let summary = ingest_split(&mut emitter, &SimpleVertexFactory, ErrorPolicy::Abort, |v| {
        vertices.push(v)
    })?;

    assert_eq!(summary.vertices, 3);
    assert_eq!(summary.edges, 3);
    assert_eq!(summary.dangling, 1);
    let ids: Vec<&str> = vertices.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["http://a.com", "http://b.com", "http://c.com"]);
    assert_eq!(vertices[0].value, 0.25);
    assert_eq!(vertices[2].value, 0.5);
    Ok(())
}

#[test]
fn cancelled_split_emits_no_partial_record() {
    let flag = CancelFlag::new();
    let rows = (0..5).map(|i| Row::builder(format!("v{i}")).build());
    let source = Cancellable::new(VecRowSource::new(rows), flag.clone());
    let mut emitter = VertexRecordEmitter::new(source, LinkTableDecoder::default());

    let mut seen = Vec::new();
    let err = ingest_split(&mut emitter, &SimpleVertexFactory, ErrorPolicy::Abort, |v| {
        seen.push(v.id);
        if seen.len() == 2 {
            flag.cancel();
        }
    })
    .unwrap_err();

    assert!(matches!(err, IngestError::Source(SourceError::Cancelled)));
    assert_eq!(seen, ["v0", "v1"]);
    assert_eq!(emitter.rows_read(), 2);
}

#[test]
fn splits_are_independent() {
    let split = |keys: &[&str]| {
        let rows: Vec<Row> = keys.iter().map(|k| Row::builder(k.as_bytes().to_vec()).build()).collect();
        VertexRecordEmitter::new(VecRowSource::new(rows), LinkTableDecoder::default())
    };
    let left = std::thread::spawn(move || {
        split(&["a", "b"]).map(|r| r.map(|v| v.id)).collect::<Result<Vec<_>, _>>()
    });
    let right = split(&["c"]).map(|r| r.map(|v| v.id)).collect::<Result<Vec<_>, _>>();
    assert_eq!(left.join().expect("thread").expect("left split"), ["a", "b"]);
    assert_eq!(right.expect("right split"), ["c"]);
}
