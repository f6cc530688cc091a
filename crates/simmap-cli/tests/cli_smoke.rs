use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture() -> PathBuf {
    let path = repo_root().join("fixtures").join("items").join("basic.json");
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let exe = assert_cmd::cargo_bin!("simmap-cli");
    let out = Command::new(exe)
        .current_dir(repo_root())
        .args(args)
        .output()
        .expect("spawn simmap-cli");
    assert!(
        out.status.success(),
        "simmap-cli failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

#[test]
fn cli_solves_center_layout() {
    let fixture = fixture();
    let v = run_json(&["solve", "--seed", "7", fixture.to_string_lossy().as_ref()]);

    let positions = v["positions"].as_object().expect("positions object");
    assert_eq!(positions.len(), 3);
    assert!(!positions.contains_key("1000"), "source must not be placed");
    assert_eq!(v["anchor"], serde_json::json!([700.0, 400.0]));

    let first = positions.values().next().expect("one position");
    for key in ["itemId", "floatSeed", "rank", "radius"] {
        assert!(first.get(key).is_some(), "missing camelCase key `{key}`: {first}");
    }
    assert!(first.get("item_id").is_none());
    assert!(v.get("minNodeDistance").is_some());
}

#[test]
fn cli_is_reproducible_with_a_seed() {
    let fixture = fixture();
    let path = fixture.to_string_lossy();
    let a = run_json(&["--anchor", "corner", "--seed", "11", path.as_ref()]);
    let b = run_json(&["--anchor", "corner", "--seed", "11", path.as_ref()]);
    assert_eq!(a, b);
    assert_eq!(a["anchor"], serde_json::json!([130.0, 625.0]));
}

#[test]
fn cli_samples_frames() {
    let fixture = fixture();
    let v = run_json(&[
        "frames",
        "--seed",
        "3",
        "--frames",
        "5",
        "--interval-ms",
        "20",
        fixture.to_string_lossy().as_ref(),
    ]);

    let frames = v["frames"].as_array().expect("frames array");
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[4]["elapsedMs"], 100);
    for frame in frames {
        assert_eq!(frame["points"].as_array().map(Vec::len), Some(3));
    }
}

#[test]
fn cli_reads_stdin_and_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{ "nodeWidth": 60, "nodeHeight": 90 }"#).expect("write config");

    let exe = assert_cmd::cargo_bin!("simmap-cli");
    let out = assert_cmd::Command::new(exe)
        .current_dir(repo_root())
        .args(["--config", config.to_string_lossy().as_ref(), "-"])
        .write_stdin(fs::read(fixture()).expect("read fixture"))
        .output()
        .expect("spawn simmap-cli");
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(v["nodeSize"], serde_json::json!([60.0, 90.0]));
}

#[test]
fn cli_rejects_unknown_flags() {
    let exe = assert_cmd::cargo_bin!("simmap-cli");
    Command::new(exe)
        .args(["--wat"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn cli_reports_invalid_config() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("bad.json");
    fs::write(&config, r#"{ "safetyMargin": -1 }"#).expect("write config");

    let exe = assert_cmd::cargo_bin!("simmap-cli");
    let out = Command::new(exe)
        .args([
            "--config",
            config.to_string_lossy().as_ref(),
            fixture().to_string_lossy().as_ref(),
        ])
        .output()
        .expect("spawn simmap-cli");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("safetyMargin"));
}
