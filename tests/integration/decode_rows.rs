#![allow(missing_docs)]

use proptest::prelude::*;
use rowgraph::{
    primitives::bytes::be, DecodeError, DecoderOptions, EdgeRecord, LinkTableDecoder,
    MissingScorePolicy, Row, VertexDecoder, VertexRecord,
};
use std::sync::Arc;
use std::thread;

fn link_row(key: &str, score: Option<f64>, outlinks: &[&str]) -> Row {
    let mut builder = Row::builder(key.as_bytes().to_vec());
    if let Some(score) = score {
        builder.push("s", "s", be::encode_f64(score).to_vec());
    }
    for target in outlinks {
        builder.push("ol", target.as_bytes().to_vec(), "");
    }
    builder.build()
}

#[test]
fn source_page_scenario() {
    let row = link_row(
        "http://www.source.com",
        Some(0.53),
        &["http://b.com", "http://a.com"],
    );
    let vertex = LinkTableDecoder::default().decode(&row).expect("decode");
    assert_eq!(
        vertex,
        VertexRecord {
            id: "http://www.source.com".into(),
            value: 0.53,
            edges: vec![EdgeRecord::new("http://a.com"), EdgeRecord::new("http://b.com")],
        }
    );
}

#[test]
fn sink_page_has_no_edges() {
    let vertex = LinkTableDecoder::default()
        .decode(&link_row("http://sink.com", Some(0.1), &[]))
        .expect("decode");
    assert!(vertex.edges.is_empty());
}

#[test]
fn errors_distinguish_failure_kinds() {
    let decoder = LinkTableDecoder::new(DecoderOptions::default().missing_score(MissingScorePolicy::Error));
    let bad_score = Row::builder("r").cell("s", "s", vec![1u8, 2, 3]).build();
    let bad_edge = Row::builder("r")
        .cell("s", "s", be::encode_f64(1.0).to_vec())
        .cell("ol", vec![0xC0u8], "")
        .build();
    let cases = [
        (Row::builder("").build(), "MalformedKey"),
        (bad_score, "MalformedScore"),
        (bad_edge, "MalformedEdgeTarget"),
        (Row::builder("r").build(), "MissingScore"),
    ];
    for (row, expected) in cases {
        let kind = match decoder.decode(&row).unwrap_err() {
            DecodeError::MalformedKey { .. } => "MalformedKey",
            DecodeError::MalformedScore { .. } => "MalformedScore",
            DecodeError::MalformedEdgeTarget { .. } => "MalformedEdgeTarget",
            DecodeError::MissingScore { .. } => "MissingScore",
            DecodeError::MalformedPartitionSegment { .. } => "MalformedPartitionSegment",
        };
        assert_eq!(kind, expected);
    }
}

#[test]
fn decoder_is_shareable_across_threads() {
    let decoder: Arc<dyn VertexDecoder> = Arc::new(LinkTableDecoder::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let decoder = Arc::clone(&decoder);
            thread::spawn(move || {
                let key = format!("http://page{i}.com");
                let row = link_row(&key, Some(i as f64), &["http://x.com"]);
                decoder.decode(&row).expect("decode")
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let vertex = handle.join().expect("thread");
        assert_eq!(vertex.id, format!("http://page{i}.com"));
        assert_eq!(vertex.value, i as f64);
    }
}

proptest! {
    #[test]
    fn score_roundtrips_through_row(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let vertex = LinkTableDecoder::default().decode(&link_row("k", Some(v), &[])).unwrap();
        prop_assert_eq!(vertex.value, v);
    }

    #[test]
    fn same_row_decodes_identically(
        targets in proptest::collection::vec("[a-z]{1,6}", 0..16),
        score in -1.0e6f64..1.0e6,
    ) {
        let refs: Vec<&str> = targets.iter().map(String::as_str).collect();
        let row = link_row("vertex", Some(score), &refs);
        let decoder = LinkTableDecoder::default();
        let first = decoder.decode(&row).unwrap();
        prop_assert_eq!(first.edges.len(), targets.len());
        prop_assert_eq!(first, decoder.decode(&row).unwrap());
    }
}
