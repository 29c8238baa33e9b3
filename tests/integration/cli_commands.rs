#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const DUMP: &str = "row,family,qualifier,value\n\
    http://www.source.com,ol,http://b.com,\n\
    http://www.source.com,ol,http://a.com,\n\
    http://www.source.com,s,s,3fe0f5c28f5c28f6\n\
    ,s,s,3ff0000000000000\n\
    http://sink.com,s,s,3ff0000000000000\n";

fn setup_dump() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("rows.csv");
    fs::write(&path, DUMP).expect("write dump");
    (dir, path)
}

fn rowgraph(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("rowgraph");
    cmd.env("ROWGRAPH_CONFIG", dir.path().join("cli.toml"))
        .env_remove("RUST_LOG")
        .arg("--quiet");
    cmd
}

#[test]
fn decode_aborts_on_bad_row_by_default() {
    let (dir, path) = setup_dump();
    fs::write(dir.path().join("cli.toml"), "").expect("config");
    let output = rowgraph(&dir).arg("decode").arg(&path).output().expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("row key is not a usable vertex id"), "{stderr}");
}

#[test]
fn quiet_failure_prints_only_the_error() {
    let (dir, path) = setup_dump();
    fs::write(dir.path().join("cli.toml"), "").expect("config");
    let output = rowgraph(&dir).arg("decode").arg(&path).output().expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("interrupted"), "{stderr}");
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert!(stderr.starts_with("error: "), "{stderr}");
}

#[test]
fn decode_limit_zero_writes_no_vertices() {
    let (dir, path) = setup_dump();
    fs::write(dir.path().join("cli.toml"), "[ingest]\nlimit = 0\n").expect("config");
    let output = rowgraph(&dir).arg("decode").arg(&path).output().expect("run");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn decode_skip_emits_json_lines() {
    let (dir, path) = setup_dump();
    fs::write(dir.path().join("cli.toml"), "[ingest]\non_error = \"skip\"\n").expect("config");
    let output = rowgraph(&dir)
        .args(["--format", "json", "decode"])
        .arg(&path)
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], "http://www.source.com");
    assert_eq!(lines[0]["edges"][0]["target"], "http://a.com");
    assert_eq!(lines[1]["id"], "http://sink.com");
    assert_eq!(lines[1]["value"], 1.0);
}

#[test]
fn decode_flags_override_config() {
    let (dir, path) = setup_dump();
    fs::write(dir.path().join("cli.toml"), "[ingest]\non_error = \"skip\"\n").expect("config");
    let output = rowgraph(&dir)
        .arg("decode")
        .arg(&path)
        .args(["--on-error", "abort"])
        .output()
        .expect("run");
    assert!(!output.status.success());
}

#[test]
fn partition_command_outputs_sorted_pairs() {
    let dir = TempDir::new().expect("tempdir");
    let output = rowgraph(&dir)
        .args(["partition", "region=eu, ds=2024-01-01"])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ds=2024-01-01\nregion=eu\n"
    );
}

#[test]
fn partition_command_rejects_bad_segment() {
    let dir = TempDir::new().expect("tempdir");
    let output = rowgraph(&dir)
        .args(["partition", "a=1,b"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'a=1,b'") && stderr.contains("'b'"), "{stderr}");
}

#[test]
fn aggregators_command_lists_four_channels() {
    let dir = TempDir::new().expect("tempdir");
    let output = rowgraph(&dir)
        .args(["--format", "json", "aggregators"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let specs: Value = serde_json::from_slice(&output.stdout).expect("json");
    let names: Vec<&str> = specs
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["DANGLING", "MAX", "MIN", "SUM"]);
}
