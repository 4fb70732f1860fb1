//! Tests for output module

use super::*;
use crate::state::{State, INCIDENTS_SINCE};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

fn extracted_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap()
}

// ============================================================================
// Message Shape Tests
// ============================================================================

#[test]
fn test_schema_message_json() {
    let msg = Message::schema("teams", json!({"type": "object"}), &["id"]);
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({
            "type": "SCHEMA",
            "stream": "teams",
            "schema": {"type": "object"},
            "key_properties": ["id"]
        })
    );
    assert!(msg.is_schema());
    assert_eq!(msg.stream(), Some("teams"));
}

#[test]
fn test_record_message_json() {
    let msg = Message::record("incidents", json!({"id": "P1"}), extracted_at());
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({
            "type": "RECORD",
            "stream": "incidents",
            "record": {"id": "P1"},
            "time_extracted": "2023-03-01T00:00:00Z"
        })
    );
    assert!(msg.is_record());
}

#[test]
fn test_state_message_json() {
    let state = State::new().with_bookmark("incidents", INCIDENTS_SINCE, "2023-03-01T00:00:00.000");
    let msg = Message::state(state);
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({
            "type": "STATE",
            "value": {"bookmarks": {"incidents": {"since": "2023-03-01T00:00:00.000"}}}
        })
    );
    assert!(msg.is_state());
    assert_eq!(msg.stream(), None);
}

#[test]
fn test_message_parses_back() {
    let line = r#"{"type":"RECORD","stream":"users","record":{"id":"U1"},"time_extracted":"2023-03-01T00:00:00Z"}"#;
    let msg: Message = serde_json::from_str(line).unwrap();
    assert_eq!(msg, Message::record("users", json!({"id": "U1"}), extracted_at()));
}

// ============================================================================
// Sink Tests
// ============================================================================

#[test]
fn test_writer_sink_json_lines() {
    let sink = WriterSink::new(Vec::new(), false);
    sink.emit(&Message::schema("teams", json!({}), &["id"])).unwrap();
    sink.emit(&Message::record("teams", json!({"id": "T1"}), extracted_at()))
        .unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(r#"{"type":"SCHEMA""#));
    assert!(lines[1].contains(r#""record":{"id":"T1"}"#));
}

#[test]
fn test_writer_sink_pretty() {
    let sink = WriterSink::new(Vec::new(), true);
    sink.emit(&Message::state(State::new())).unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert!(output.lines().count() > 1);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["type"], "STATE");
}

#[test]
fn test_memory_sink_filters() {
    let sink = MemorySink::new();
    assert!(sink.is_empty());

    sink.emit(&Message::record("teams", json!({"id": "T1"}), extracted_at()))
        .unwrap();
    sink.emit(&Message::record("users", json!({"id": "U1"}), extracted_at()))
        .unwrap();
    sink.emit(&Message::record("teams", json!({"id": "T2"}), extracted_at()))
        .unwrap();
    sink.emit(&Message::state(State::new())).unwrap();

    assert_eq!(sink.len(), 4);
    assert_eq!(sink.records("teams"), vec![json!({"id": "T1"}), json!({"id": "T2"})]);
    assert_eq!(sink.states(), vec![State::new()]);
}
