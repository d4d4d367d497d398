//! Log Engine Invariant Tests
//!
//! Tests for invariants:
//! - Ids are contiguous from 1 and never reused
//! - Create is idempotent; delete leaves nothing behind
//! - Seek scans start exactly at the requested id
//! - A partial tail record is reported, never skipped
//!
//! All tests run against the public `LogEngine` API over a temp directory.

use kafkalite::config::EngineConfig;
use kafkalite::engine::{EngineError, LogEngine};
use kafkalite::record::LogRecord;
use kafkalite::topic::{CreateOutcome, DeleteOutcome};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn open_engine(dir: &TempDir) -> LogEngine {
    LogEngine::open(EngineConfig::new(dir.path()).with_fsync(false)).unwrap()
}

fn collect(engine: &LogEngine, topic: &str) -> Vec<(u32, String)> {
    engine
        .consume(topic)
        .unwrap()
        .map(|r| {
            let record = r.unwrap();
            (record.id, record.payload_lossy().into_owned())
        })
        .collect()
}

fn collect_from(engine: &LogEngine, topic: &str, from: u32) -> Vec<u32> {
    engine
        .consume_from(topic, from)
        .unwrap()
        .map(|r| r.unwrap().id)
        .collect()
}

// =============================================================================
// Id Monotonicity
// =============================================================================

#[test]
fn test_n_produces_yield_ids_one_through_n() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();

    let ids: Vec<u32> = (0..20)
        .map(|i| engine.produce("t", format!("msg-{}", i)).unwrap())
        .collect();

    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    assert_eq!(engine.last_id("t").unwrap(), 20);
    let consumed: Vec<u32> = collect(&engine, "t").into_iter().map(|(id, _)| id).collect();
    assert_eq!(consumed, (1..=20).collect::<Vec<_>>());
}

#[test]
fn test_ids_survive_reopen() {
    let temp_dir = create_temp_data_dir();
    {
        let engine = open_engine(&temp_dir);
        engine.create_topic("t").unwrap();
        engine.produce("t", "a").unwrap();
        engine.produce("t", "b").unwrap();
    }

    let engine = open_engine(&temp_dir);
    assert_eq!(engine.produce("t", "c").unwrap(), 3);
}

#[test]
fn test_topics_have_independent_sequences() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("a").unwrap();
    engine.create_topic("b").unwrap();

    engine.produce("a", "1").unwrap();
    engine.produce("a", "2").unwrap();
    assert_eq!(engine.produce("b", "1").unwrap(), 1);
    assert_eq!(engine.last_id("a").unwrap(), 2);
}

#[test]
fn test_payload_bytes_are_preserved() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("bin").unwrap();

    let payload = vec![0u8, 10, 13, 0xFF, b':', b' '];
    engine.produce("bin", &payload).unwrap();
    engine.produce("bin", b"").unwrap();

    let records: Vec<LogRecord> = engine.consume("bin").unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(records[0], LogRecord::new(1, payload));
    assert_eq!(records[1], LogRecord::new(2, Vec::new()));
}

// =============================================================================
// Create / Delete
// =============================================================================

#[test]
fn test_create_is_idempotent() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);

    assert_eq!(engine.create_topic("t").unwrap(), CreateOutcome::Created);
    engine.produce("t", "kept").unwrap();
    assert_eq!(engine.create_topic("t").unwrap(), CreateOutcome::AlreadyExists);

    assert_eq!(engine.last_id("t").unwrap(), 1);
    assert_eq!(collect(&engine, "t"), vec![(1, "kept".to_string())]);
}

#[test]
fn test_delete_then_recreate_starts_fresh() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();
    engine.produce("t", "old").unwrap();

    assert_eq!(engine.delete_topic("t").unwrap(), DeleteOutcome::Deleted);
    assert!(!temp_dir.path().join("t").exists());
    assert!(!engine.topic_exists("t").unwrap());
    assert!(matches!(
        engine.consume("t"),
        Err(EngineError::TopicNotFound(_))
    ));
    assert!(matches!(
        engine.produce("t", "late"),
        Err(EngineError::TopicNotFound(_))
    ));
    assert!(!temp_dir.path().join("t").exists());
    assert_eq!(engine.delete_topic("t").unwrap(), DeleteOutcome::NotFound);

    engine.create_topic("t").unwrap();
    assert_eq!(engine.produce("t", "new").unwrap(), 1);
}

#[test]
fn test_list_topics_sorted() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    for name in ["zeta", "alpha", "mid"] {
        engine.create_topic(name).unwrap();
    }
    assert_eq!(engine.list_topics().unwrap(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_invalid_names_rejected() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    for name in ["", "..", "a/b", "has space"] {
        let err = engine.create_topic(name).unwrap_err();
        assert_eq!(err.code(), "KAFKALITE_TOPIC_INVALID_NAME", "name {:?}", name);
    }
}

#[test]
fn test_operations_on_missing_topic() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);

    assert!(matches!(engine.produce("x", "m"), Err(EngineError::TopicNotFound(_))));
    assert!(matches!(engine.consume("x"), Err(EngineError::TopicNotFound(_))));
    assert!(matches!(
        engine.consume_from("x", 1),
        Err(EngineError::TopicNotFound(_))
    ));
    assert!(matches!(engine.last_id("x"), Err(EngineError::TopicNotFound(_))));
    assert!(!temp_dir.path().join("x").exists());
}

// =============================================================================
// Seek Scan
// =============================================================================

#[test]
fn test_seek_starts_at_target() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();
    for i in 1..=5 {
        engine.produce("t", "x".repeat(i * 100)).unwrap();
    }

    assert_eq!(collect_from(&engine, "t", 3), vec![3, 4, 5]);
    assert_eq!(collect_from(&engine, "t", 5), vec![5]);
}

#[test]
fn test_seek_past_end_is_record_not_found() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();
    for _ in 0..5 {
        engine.produce("t", "x").unwrap();
    }

    let err = engine.consume_from("t", 99).err().unwrap();
    assert!(matches!(err, EngineError::RecordNotFound { id: 99, .. }));
    assert!(err.is_informational());

    assert!(matches!(
        engine.consume_from("t", 0),
        Err(EngineError::RecordNotFound { id: 0, .. })
    ));
}

// =============================================================================
// Truncation
// =============================================================================

#[test]
fn test_truncated_tail_reported_after_good_records() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();
    engine.produce("t", "one").unwrap();
    engine.produce("t", "two").unwrap();

    let log = temp_dir.path().join("t/t.log");
    let len = fs::metadata(&log).unwrap().len();
    fs::OpenOptions::new()
        .write(true)
        .open(&log)
        .unwrap()
        .set_len(len - 1)
        .unwrap();

    let results: Vec<_> = engine.consume("t").unwrap().collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().id, 1);
    let err = results[1].as_ref().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.code(), "KAFKALITE_RECORD_TRUNCATED");
}

#[test]
fn test_seek_over_truncated_payload_fails() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();
    engine.produce("t", "payload").unwrap();

    let log = temp_dir.path().join("t/t.log");
    fs::OpenOptions::new()
        .write(true)
        .open(&log)
        .unwrap()
        .set_len(10)
        .unwrap();

    let err = engine.consume_from("t", 2).err().unwrap();
    assert!(err.is_truncated());
}

#[test]
fn test_partial_header_is_truncated() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);
    engine.create_topic("t").unwrap();
    fs::write(temp_dir.path().join("t/t.log"), [1u8, 0, 0]).unwrap();

    let first = engine.consume("t").unwrap().next().unwrap();
    assert!(first.unwrap_err().is_truncated());
}

// =============================================================================
// End to End
// =============================================================================

#[test]
fn test_orders_scenario() {
    let temp_dir = create_temp_data_dir();
    let engine = open_engine(&temp_dir);

    assert_eq!(engine.create_topic("orders").unwrap(), CreateOutcome::Created);
    assert_eq!(engine.produce("orders", "hello").unwrap(), 1);
    assert_eq!(engine.produce("orders", "world").unwrap(), 2);
    assert_eq!(
        collect(&engine, "orders"),
        vec![(1, "hello".to_string()), (2, "world".to_string())]
    );
    assert_eq!(collect_from(&engine, "orders", 2), vec![2]);
    assert_eq!(engine.last_id("orders").unwrap(), 2);
    assert_eq!(engine.delete_topic("orders").unwrap(), DeleteOutcome::Deleted);
    assert!(matches!(
        engine.consume("orders"),
        Err(EngineError::TopicNotFound(_))
    ));
    assert!(matches!(
        engine.produce("orders", "x"),
        Err(EngineError::TopicNotFound(ref t)) if t == "orders"
    ));
}
