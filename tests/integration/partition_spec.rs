#![allow(missing_docs)]

use rowgraph::{parse_partition_values, DecodeError, PartitionSpec};

#[test]
fn descriptor_examples() {
    let spec = parse_partition_values(Some("a=1,b=2")).unwrap().unwrap();
    assert_eq!(spec.get("a"), Some("1"));
    assert_eq!(spec.get("b"), Some("2"));

    let spec = parse_partition_values(Some("a=1,b=2,a=3")).unwrap().unwrap();
    assert_eq!(spec.get("a"), Some("3"));
    assert_eq!(spec.len(), 2);

    assert!(parse_partition_values(None).unwrap().is_none());
}

#[test]
fn malformed_descriptor_message_names_both_parts() {
    let err = parse_partition_values(Some("ds=2024-01-01,region")).unwrap_err();
    assert_eq!(
        err,
        DecodeError::MalformedPartitionSegment {
            descriptor: "ds=2024-01-01,region".into(),
            segment: "region".into(),
        }
    );
    let message = err.to_string();
    assert!(message.contains("ds=2024-01-01,region"));
    assert!(message.contains("'region'"));
}

#[test]
fn serializes_as_plain_map() {
    let spec: PartitionSpec = "ds=2024-01-01, region=eu".parse().unwrap();
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json, serde_json::json!({"ds": "2024-01-01", "region": "eu"}));
}
