use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn conversations_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const SAMPLE: &str = r#"[{"title": "T", "mapping": {
    "n0": {"message": null},
    "n1": {"message": {"id": "m1", "author": {"role": "user"}, "content": {"parts": ["Hi", "there"]}, "create_time": 100}}
}}]"#;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("chatvec").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search them by similarity"))
        .stdout(predicate::str::contains("ingest"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("chatvec").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_search_help_lists_metric() {
    let mut cmd = Command::cargo_bin("chatvec").unwrap();
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--metric"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("No cutoff by default"));
}

#[test]
fn test_cli_extract_prints_messages() {
    let file = conversations_file(SAMPLE);
    let output = Command::cargo_bin("chatvec")
        .unwrap()
        .arg("extract")
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let messages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["conversation_id"], "T");
    assert_eq!(messages[0]["message_id"], "m1");
    assert_eq!(messages[0]["text"], "Hi there");
    assert_eq!(messages[0]["create_time"], 100.0);
}

#[test]
fn test_cli_extract_with_skipped() {
    let file = conversations_file(SAMPLE);
    Command::cargo_bin("chatvec")
        .unwrap()
        .arg("extract")
        .arg(file.path())
        .arg("--with-skipped")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skipped\""))
        .stdout(predicate::str::contains("no_message"));
}

#[test]
fn test_cli_extract_missing_file_fails() {
    Command::cargo_bin("chatvec")
        .unwrap()
        .args(["extract", "/no/such/conversations.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_unknown_metric_rejected() {
    Command::cargo_bin("chatvec")
        .unwrap()
        .args(["search", "hello", "--metric", "manhattan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("manhattan"));
}

#[test]
fn test_cli_unknown_disposition_rejected() {
    let file = conversations_file(SAMPLE);
    Command::cargo_bin("chatvec")
        .unwrap()
        .arg("ingest")
        .arg(file.path())
        .args(["--disposition", "overwrite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overwrite"));
}
