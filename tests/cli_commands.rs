//! CLI Command Tests
//!
//! Runs the built `kafkalite` binary against a temp topics directory and
//! checks stdout and exit status for each command.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn kafkalite(topics_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kafkalite"))
        .args(args)
        .arg("--topics-dir")
        .arg(topics_dir)
        .env_remove("KAFKALITE_TOPIC_DIR")
        .env_remove("KAFKALITE_MIRROR_TEXT")
        .env_remove("KAFKALITE_CRASH_POINT")
        .output()
        .expect("failed to run kafkalite")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn test_orders_scenario_via_cli() {
    let temp_dir = create_temp_data_dir();
    let dir = temp_dir.path();

    let out = kafkalite(dir, &["create_topic", "orders"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Topic 'orders' created.\n");

    let out = kafkalite(dir, &["produce", "orders", "-m", "hello"]);
    assert_eq!(
        stdout(&out),
        "Message 'hello' written to topic 'orders' with id 1.\n"
    );
    let out = kafkalite(dir, &["produce", "orders", "--message", "world"]);
    assert_eq!(
        stdout(&out),
        "Message 'world' written to topic 'orders' with id 2.\n"
    );

    let out = kafkalite(dir, &["consume", "orders"]);
    assert_eq!(stdout(&out), "1: hello\n2: world\n");

    let out = kafkalite(dir, &["consume_from_id", "orders", "--from_id", "2"]);
    assert_eq!(stdout(&out), "2: world\n");

    let out = kafkalite(dir, &["last_id", "orders"]);
    assert_eq!(stdout(&out), "2\n");

    let out = kafkalite(dir, &["list_topics"]);
    assert_eq!(stdout(&out), "orders\n");

    let out = kafkalite(dir, &["delete_topic", "orders"]);
    assert_eq!(stdout(&out), "Topic 'orders' deleted.\n");
    assert!(!dir.join("orders").exists());
}

#[test]
fn test_consume_from_id_defaults_to_first() {
    let temp_dir = create_temp_data_dir();
    let dir = temp_dir.path();
    kafkalite(dir, &["create_topic", "t"]);
    kafkalite(dir, &["produce", "t", "-m", "a"]);

    let out = kafkalite(dir, &["consume_from_id", "t"]);
    assert_eq!(stdout(&out), "1: a\n");
}

#[test]
fn test_json_output() {
    let temp_dir = create_temp_data_dir();
    let dir = temp_dir.path();
    kafkalite(dir, &["create_topic", "t"]);

    let out = kafkalite(dir, &["produce", "t", "-m", "x", "--json"]);
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["data"]["id"], 1);

    let out = kafkalite(dir, &["consume", "t", "--json"]);
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["data"]["payload"], "x");
}

// =============================================================================
// Informational Outcomes (exit 0)
// =============================================================================

#[test]
fn test_informational_outcomes_exit_zero() {
    let temp_dir = create_temp_data_dir();
    let dir = temp_dir.path();

    let out = kafkalite(dir, &["consume", "ghost"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Topic 'ghost' does not exist.\n");

    let out = kafkalite(dir, &["produce", "ghost", "-m", "x"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Topic 'ghost' does not exist.\n");

    let out = kafkalite(dir, &["delete_topic", "ghost"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Topic 'ghost' does not exist.\n");

    kafkalite(dir, &["create_topic", "t"]);
    let out = kafkalite(dir, &["create_topic", "t"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Topic 't' already exists.\n");

    let out = kafkalite(dir, &["consume_from_id", "t", "--from_id", "9"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "No message with id 9 in topic 't'.\n");
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_produce_without_message_is_usage_error() {
    let temp_dir = create_temp_data_dir();
    let out = kafkalite(temp_dir.path(), &["produce", "t"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_produce_empty_message_is_usage_error() {
    let temp_dir = create_temp_data_dir();
    let dir = temp_dir.path();
    kafkalite(dir, &["create_topic", "t"]);

    let out = kafkalite(dir, &["produce", "t", "-m", ""]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(stdout(&kafkalite(dir, &["last_id", "t"])), "0\n");
}

#[test]
fn test_truncated_log_exits_one_after_printing_good_records() {
    let temp_dir = create_temp_data_dir();
    let dir = temp_dir.path();
    kafkalite(dir, &["create_topic", "t"]);
    kafkalite(dir, &["produce", "t", "-m", "good"]);
    kafkalite(dir, &["produce", "t", "-m", "bad"]);

    let log = dir.join("t/t.log");
    let len = fs::metadata(&log).unwrap().len();
    fs::OpenOptions::new()
        .write(true)
        .open(&log)
        .unwrap()
        .set_len(len - 1)
        .unwrap();

    let out = kafkalite(dir, &["consume", "t"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "1: good\n");
    assert!(String::from_utf8_lossy(&out.stderr).contains("KAFKALITE_RECORD_TRUNCATED"));
}

#[test]
fn test_invalid_topic_name_exits_one() {
    let temp_dir = create_temp_data_dir();
    let out = kafkalite(temp_dir.path(), &["create_topic", ".."]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("KAFKALITE_TOPIC_INVALID_NAME"));
}
