// todo-ledger-core/tests/audit.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Tests for JSON-line audit sinks.
// Purpose: Validate event shape and file sink append behavior.
// Dependencies: todo-ledger-core, serde_json, tempfile
// ============================================================================
//! ## Overview
//! Audit events are the only place internal failure causes are written, so
//! their wire shape and the file sink's append semantics are pinned here.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::Value;
use todo_ledger_core::FileAuditSink;
use todo_ledger_core::FilterCriteria;
use todo_ledger_core::InMemoryTodoStore;
use todo_ledger_core::TodoAuditEvent;
use todo_ledger_core::TodoAuditEventParams;
use todo_ledger_core::TodoAuditSink;
use todo_ledger_core::TodoOperation;
use todo_ledger_core::TodoOutcome;
use todo_ledger_core::TodoService;
use todo_ledger_core::TodoServiceConfig;

fn failure_event() -> TodoAuditEvent {
    TodoAuditEvent::new(TodoAuditEventParams {
        operation: TodoOperation::GetOne,
        outcome: TodoOutcome::Failure,
        error_kind: Some("not_found"),
        detail: Some("todo 5f1d7a2b9c8e4d3f2a1b0c9d not found".to_string()),
        todo_id: None,
        result_count: None,
    })
}

#[test]
fn event_serializes_snake_case_labels() {
    let value = serde_json::to_value(failure_event()).expect("json");
    assert_eq!(value["event"], "todo_request");
    assert_eq!(value["operation"], "get_one");
    assert_eq!(value["outcome"], "failure");
    assert_eq!(value["error_kind"], "not_found");
    assert!(value["timestamp_ms"].as_u64().is_some_and(|ms| ms > 0));
}

#[test]
fn file_sink_appends_one_line_per_event() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).expect("open");
    sink.record(&failure_event());
    sink.record(&failure_event());
    drop(sink);

    let reopened = FileAuditSink::new(&path).expect("reopen");
    reopened.record(&failure_event());
    drop(reopened);

    let contents = std::fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let value: Value = serde_json::from_str(line).expect("json line");
        assert_eq!(value["operation"], "get_one");
    }
}

#[test]
fn service_writes_events_through_file_sink() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("service.jsonl");
    let sink = FileAuditSink::new(&path).expect("open");
    let service = TodoService::new(InMemoryTodoStore::new(), sink, TodoServiceConfig::default());
    service.add_fields("x", "false", "b", "c").expect("add");
    service.get_many(&FilterCriteria::new()).expect("get many");
    drop(service);

    let contents = std::fs::read_to_string(&path).expect("read");
    let operations: Vec<String> = contents
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).expect("json")["operation"].to_string())
        .collect();
    assert_eq!(operations, vec!["\"add_one\"", "\"get_many\""]);
}
