#[path = "common/mod.rs"]
mod common;

use common::*;
use std::process::{Command, Output};

fn popreduce(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_popreduce"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn popreduce")
}

#[test]
fn prints_ranked_report() {
    let dir = make_two_files();
    let root = dir.path().to_str().unwrap();

    let out = popreduce(&[root, "100000", "--workers", "2"]);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "IL: 2\n- Springfield, 120000\n- Chicago, 2700000\nTX: 1\n- Austin, 950000\n"
    );
}

#[test]
fn missing_arguments_exit_with_usage() {
    let dir = make_two_files();

    let out = popreduce(&[dir.path().to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn non_numeric_threshold_is_fatal() {
    let dir = make_two_files();
    let root = dir.path().to_str().unwrap();

    assert_eq!(popreduce(&[root, "lots"]).status.code(), Some(2));
    assert_eq!(popreduce(&[root, "-5"]).status.code(), Some(2));
}

#[test]
fn missing_directory_exits_with_traversal_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let out = popreduce(&[missing.to_str().unwrap(), "0"]);

    assert_eq!(out.status.code(), Some(3));
    assert!(out.stdout.is_empty());
    assert!(!out.stderr.is_empty());
}

#[test]
fn json_format_is_parseable() {
    let dir = make_two_files();

    let out = popreduce(&[dir.path().to_str().unwrap(), "100000", "--format", "json"]);

    assert_eq!(out.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["groups"][1]["key"], "TX");
}
