// todo-ledger-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for input bounds, criteria mapping, and exit codes.
// Purpose: Ensure CLI helpers classify failures and never buffer unbounded input.
// Dependencies: todo-ledger-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the helpers behind the CLI commands without spawning a process.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use todo_ledger_config::AuditConfig;
use todo_ledger_config::AuditSinkType;
use todo_ledger_config::StoreConfig;
use todo_ledger_config::StoreType;
use todo_ledger_core::ServiceError;
use todo_ledger_core::TodoId;
use todo_ledger_core::TodoStore;

use super::CliError;
use super::EXIT_CLIENT_ERROR;
use super::EXIT_FAILURE;
use super::ListCommand;
use super::build_audit_sink;
use super::build_store;
use super::criteria_from_flags;
use super::read_bounded;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn read_bounded_returns_small_input_unchanged() {
    let bytes = read_bounded(&b"{\"owner\":\"Nic\"}"[..], 64).expect("read");
    assert_eq!(bytes, b"{\"owner\":\"Nic\"}");
}

#[test]
fn read_bounded_stops_one_byte_past_limit() {
    let input = vec![b'x'; 100];
    let bytes = read_bounded(input.as_slice(), 10).expect("read");
    assert_eq!(bytes.len(), 11);
}

#[test]
fn read_bounded_reads_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("payload.json");
    fs::write(&path, b"{}").expect("write");
    let file = fs::File::open(&path).expect("open");
    assert_eq!(read_bounded(file, 1024).expect("read"), b"{}");
}

#[test]
fn criteria_from_flags_uses_query_keys() {
    let command = ListCommand {
        owner: Some("Vipul".to_string()),
        status: Some("complete".to_string()),
        limit: Some("3".to_string()),
        order_by: Some("category".to_string()),
        ..ListCommand::default()
    };
    let criteria = criteria_from_flags(&command);
    assert_eq!(criteria.first("owner"), Some("Vipul"));
    assert_eq!(criteria.first("status"), Some("complete"));
    assert_eq!(criteria.first("limit"), Some("3"));
    assert_eq!(criteria.first("orderBy"), Some("category"));
    assert_eq!(criteria.first("body"), None);
    assert_eq!(criteria.first("category"), None);
}

#[test]
fn criteria_from_flags_is_empty_without_flags() {
    assert!(criteria_from_flags(&ListCommand::default()).is_empty());
}

#[test]
fn service_errors_map_to_exit_codes() {
    let client = [
        ServiceError::InvalidIdentifier,
        ServiceError::NotFound,
        ServiceError::InvalidCriteria("status".to_string()),
        ServiceError::MissingField("owner"),
        ServiceError::MalformedPayload,
    ];
    for error in &client {
        assert_eq!(CliError::from_service(error).exit_code, EXIT_CLIENT_ERROR);
    }
    let failure = CliError::from_service(&ServiceError::StoreUnavailable);
    assert_eq!(failure.exit_code, EXIT_FAILURE);
    assert_eq!(failure.message, "store_unavailable: todo store unavailable");
}

#[test]
fn build_store_opens_memory_backend() {
    let store = build_store(&StoreConfig::default()).expect("memory store");
    let id = TodoId::parse("0123456789abcdef01234567").expect("id");
    assert!(store.find_one(&id).expect("find").is_none());
}

#[test]
fn build_store_opens_sqlite_backend() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = StoreConfig {
        store_type: StoreType::Sqlite,
        path: Some(dir.path().join("ledger.db")),
        ..StoreConfig::default()
    };
    build_store(&config).expect("sqlite store");
    assert!(dir.path().join("ledger.db").exists());
}

#[test]
fn build_store_fails_closed_without_sqlite_path() {
    let config = StoreConfig {
        store_type: StoreType::Sqlite,
        ..StoreConfig::default()
    };
    let Err(err) = build_store(&config) else {
        panic!("expected missing path failure");
    };
    assert_eq!(err.exit_code, EXIT_FAILURE);
}

#[test]
fn build_audit_sink_creates_file_sink() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("audit.jsonl");
    let config = AuditConfig {
        sink: AuditSinkType::File,
        path: Some(path.clone()),
    };
    build_audit_sink(&config).expect("file sink");
    assert!(path.exists());
}
