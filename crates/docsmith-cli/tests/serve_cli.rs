//! Integration tests for `docsmith serve` and `docsmith config`.

mod common;

use std::fs;

use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

use common::{docsmith_cmd, setup_node_project, write_file};

fn reply_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("each reply is one JSON line"))
        .collect()
}

// ============================================================================
// serve
// ============================================================================

#[test]
fn test_serve_round_trip() {
    let temp = TempDir::new().expect("create temp dir");
    setup_node_project(temp.path());

    let input = concat!(
        r#"{"command":"trackFileCreation","filePath":"docs/NOTES.md","content":"notes"}"#,
        "\n",
        "\n",
        r#"{"command":"getChangeStats"}"#,
        "\n",
        r#"{"command":"formatDisk"}"#,
        "\n",
        r#"{"command":"getActivities","status":"applied"}"#,
        "\n",
    );

    let output = docsmith_cmd()
        .current_dir(temp.path())
        .arg("serve")
        .write_stdin(input)
        .output()
        .expect("run serve");
    assert!(output.status.success());

    let replies = reply_lines(&output.stdout);
    assert_eq!(replies.len(), 4, "blank lines get no reply");

    assert_eq!(replies[0]["type"], "changeRecorded");
    assert_eq!(replies[0]["record"]["filePath"], "docs/NOTES.md");

    assert_eq!(replies[1]["type"], "stats");
    assert_eq!(replies[1]["stats"]["total"], 1);

    // An unknown command is answered, and the session keeps going.
    assert_eq!(replies[2]["type"], "error");
    assert_eq!(replies[3]["type"], "activities");
    assert_eq!(replies[3]["activities"].as_array().unwrap().len(), 1);
}

#[test]
fn test_serve_generate_and_revert() {
    let temp = TempDir::new().expect("create temp dir");
    setup_node_project(temp.path());

    let output = docsmith_cmd()
        .current_dir(temp.path())
        .arg("serve")
        .write_stdin("{\"command\":\"generateMissingDocs\"}\n")
        .output()
        .expect("run serve");
    let replies = reply_lines(&output.stdout);
    assert_eq!(replies[0]["type"], "generation");
    let readme = replies[0]["report"]["written"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["target"] == "README.md")
        .expect("README generated")
        .clone();
    assert!(temp.path().join("README.md").exists());

    let revert = format!(
        "{{\"command\":\"revertChange\",\"id\":\"{}\"}}\n",
        readme["changeId"].as_str().unwrap()
    );
    let output = docsmith_cmd()
        .current_dir(temp.path())
        .arg("serve")
        .write_stdin(revert)
        .output()
        .expect("run serve");
    let replies = reply_lines(&output.stdout);
    assert_eq!(replies[0]["type"], "outcome");
    assert_eq!(replies[0]["outcome"]["success"], true);
    assert!(!temp.path().join("README.md").exists());
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_show_merges_project_config() {
    let temp = TempDir::new().expect("create temp dir");
    setup_node_project(temp.path());
    write_file(
        temp.path(),
        ".docsmith/config.yaml",
        "analysis:\n  docsDir: documentation\ngeneration:\n  author: Docs Team\n",
    );

    let output = docsmith_cmd()
        .current_dir(temp.path())
        .args(["config", "show", "--json"])
        .output()
        .expect("run config show");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["analysis"]["docsDir"], "documentation");
    assert_eq!(json["analysis"]["maxFileSizeBytes"], 1_000_000);
    assert_eq!(json["generation"]["author"], "Docs Team");
}

#[test]
fn test_config_check_reports_invalid_value() {
    let temp = TempDir::new().expect("create temp dir");
    setup_node_project(temp.path());

    docsmith_cmd()
        .current_dir(temp.path())
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    fs::create_dir_all(temp.path().join(".docsmith")).unwrap();
    fs::write(
        temp.path().join(".docsmith/config.yaml"),
        "analysis:\n  maxFileSizeBytes: 0\n",
    )
    .unwrap();

    docsmith_cmd()
        .current_dir(temp.path())
        .args(["config", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("maxFileSizeBytes cannot be 0"));

    // The engine refuses to open with the same file.
    docsmith_cmd()
        .current_dir(temp.path())
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxFileSizeBytes"));
}

#[test]
fn test_version_includes_commit() {
    docsmith_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docsmith"))
        .stdout(predicate::str::contains("("));
}
