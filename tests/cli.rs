use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const RING: &str = r#"{
    "router_count": 4,
    "adjacency": [[0,1,0,1],[1,0,1,0],[0,1,0,1],[1,0,1,0]],
    "weights":   [[0,1,0,1],[1,0,1,0],[0,1,0,1],[1,0,1,0]],
    "addresses": ["10.0.0.1","10.0.0.2","10.0.0.3","10.0.0.4"]
}"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_congestion-routing"))
        .args(args)
        .output()
        .expect("run congestion-routing")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_prints_matrix_and_router_states() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ring.json", RING);

    let output = run(&["check", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("Adjacency Matrix:\n0\t1\t0\t1\n1\t0\t1\t0\n"));
    assert!(out.contains("Router 1 10.0.0.1 (clear)"));
    assert!(out.contains("Router 4 10.0.0.4 (clear)"));
}

#[test]
fn check_fails_on_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        dir.path(),
        "dup.json",
        &RING.replace("\"10.0.0.4\"", "\"10.0.0.1\""),
    );

    let output = run(&["check", "--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn route_prints_path_and_distance() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ring.json", RING);

    let output = run(&[
        "route",
        "--config",
        config.to_str().unwrap(),
        "--source",
        "10.0.0.1",
        "--destination",
        "10.0.0.3",
        "--mode",
        "dynamic",
        "--congestion",
        "0,1,0,0",
    ]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "Shortest Path: 10.0.0.1 -> 10.0.0.4 -> 10.0.0.3\nTotal Distance: 2"
    );
}

#[test]
fn route_reports_no_path_with_success_status() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ring.json", RING);

    // 10.0.0.2 and 10.0.0.4 cut 10.0.0.1 off from 10.0.0.3.
    let output = run(&[
        "route",
        "--config",
        config.to_str().unwrap(),
        "--source",
        "10.0.0.1",
        "--destination",
        "10.0.0.3",
        "--mode",
        "dynamic",
        "--congestion",
        "0,1,0,1",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "No path found.");
}

#[test]
fn route_reports_congested_endpoint_with_success_status() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ring.json", RING);

    let output = run(&[
        "route",
        "--config",
        config.to_str().unwrap(),
        "--source",
        "10.0.0.1",
        "--destination",
        "10.0.0.2",
        "--mode",
        "dynamic",
        "--congestion",
        "0,1,0,0",
    ]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "Path cannot be found as the source or destination router is congested."
    );
}

#[test]
fn route_fails_on_unknown_router() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ring.json", RING);

    let output = run(&[
        "route",
        "--config",
        config.to_str().unwrap(),
        "--source",
        "256.1.1.1",
        "--destination",
        "10.0.0.1",
    ]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn route_rejects_invalid_congestion_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ring.json", RING);

    for flags in ["0,2,0,0", "0,1"] {
        let output = run(&[
            "route",
            "--config",
            config.to_str().unwrap(),
            "--source",
            "10.0.0.1",
            "--destination",
            "10.0.0.3",
            "--congestion",
            flags,
        ]);
        assert!(!output.status.success(), "{flags} should be rejected");
        assert!(stdout(&output).is_empty());
    }
}
