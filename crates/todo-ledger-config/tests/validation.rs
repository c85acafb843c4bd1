//! Section validation tests for todo-ledger-config.
// todo-ledger-config/tests/validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate store, query, limits, and audit constraints.
// Purpose: Ensure invalid combinations fail closed with clear messages.
// =============================================================================

use std::path::PathBuf;

use todo_ledger_config::AuditSinkType;
use todo_ledger_config::StoreType;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn memory_store_rejects_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Memory;
    config.store.path = Some(PathBuf::from("todos.db"));
    assert_invalid(config.validate(), "memory store must not set path")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    assert_invalid(config.validate(), "sqlite store requires path")
}

#[test]
fn sqlite_store_rejects_empty_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(PathBuf::from(""));
    assert_invalid(config.validate(), "store path must be non-empty")
}

#[test]
fn sqlite_store_rejects_zero_busy_timeout() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(PathBuf::from("todos.db"));
    config.store.busy_timeout_ms = 0;
    assert_invalid(config.validate(), "busy_timeout_ms must be between 1 and 60000")
}

#[test]
fn sqlite_store_rejects_excessive_busy_timeout() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(PathBuf::from("todos.db"));
    config.store.busy_timeout_ms = 60_001;
    assert_invalid(config.validate(), "busy_timeout_ms must be between 1 and 60000")
}

#[test]
fn sqlite_store_accepts_boundary_timeout() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(PathBuf::from("todos.db"));
    config.store.busy_timeout_ms = 60_000;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn query_rejects_zero_max_results() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.query.max_results = Some(0);
    assert_invalid(config.validate(), "query max_results must be greater than zero")
}

#[test]
fn limits_reject_zero_payload() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_payload_bytes = 0;
    assert_invalid(config.validate(), "limits max_payload_bytes must be between 1 and")
}

#[test]
fn limits_reject_payload_above_one_mebibyte() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_payload_bytes = 1024 * 1024 + 1;
    assert_invalid(config.validate(), "limits max_payload_bytes must be between 1 and")
}

#[test]
fn file_audit_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkType::File;
    assert_invalid(config.validate(), "file audit sink requires path")
}

#[test]
fn stderr_audit_rejects_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkType::Stderr;
    config.audit.path = Some(PathBuf::from("audit.jsonl"));
    assert_invalid(config.validate(), "audit path is only valid for the file sink")
}

#[test]
fn none_audit_parses_from_toml() -> TestResult {
    let config = common::config_from_toml("[audit]\nsink = \"none\"\n")
        .map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkType::None {
        return Err("sink none not parsed".to_string());
    }
    config.validate().map_err(|err| err.to_string())
}
