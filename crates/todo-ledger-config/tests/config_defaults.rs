//! Default and loading tests for todo-ledger-config.
// todo-ledger-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Default Tests
// Description: Validate defaults and file loading limits.
// Purpose: Ensure an empty config is usable and bad files fail closed.
// =============================================================================

use std::fs;
use std::path::PathBuf;

use todo_ledger_config::AuditSinkType;
use todo_ledger_config::StoreType;
use todo_ledger_config::TodoLedgerConfig;
use todo_ledger_core::DEFAULT_MAX_PAYLOAD_BYTES;
use todo_ledger_store_sqlite::SqliteStoreMode;
use todo_ledger_store_sqlite::SqliteSyncMode;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Memory {
        return Err("default store should be memory".to_string());
    }
    if config.store.busy_timeout_ms != 5_000 {
        return Err("default busy timeout should be 5000".to_string());
    }
    if config.store.journal_mode != SqliteStoreMode::Wal
        || config.store.sync_mode != SqliteSyncMode::Full
    {
        return Err("default sqlite modes should be wal/full".to_string());
    }
    if config.query.max_results.is_some() {
        return Err("max_results should be unset by default".to_string());
    }
    if config.limits.max_payload_bytes != DEFAULT_MAX_PAYLOAD_BYTES {
        return Err("default payload limit should be 64 KiB".to_string());
    }
    if config.audit.sink != AuditSinkType::Stderr {
        return Err("default audit sink should be stderr".to_string());
    }
    Ok(())
}

#[test]
fn full_config_parses() -> TestResult {
    let config = TodoLedgerConfig::from_toml(
        r#"
        [store]
        type = "sqlite"
        path = "data/todos.db"
        busy_timeout_ms = 250
        journal_mode = "delete"
        sync_mode = "normal"

        [query]
        max_results = 100

        [limits]
        max_payload_bytes = 4096

        [audit]
        sink = "file"
        path = "logs/audit.jsonl"
        "#,
    )
    .map_err(|err| err.to_string())?;
    let sqlite = config.store.sqlite_config().ok_or("sqlite config missing")?;
    if sqlite.path != PathBuf::from("data/todos.db") || sqlite.busy_timeout_ms != 250 {
        return Err(format!("unexpected sqlite config {}", sqlite.path.display()));
    }
    if sqlite.journal_mode != SqliteStoreMode::Delete || sqlite.sync_mode != SqliteSyncMode::Normal
    {
        return Err("sqlite modes not applied".to_string());
    }
    let service = config.service_config();
    if service.max_results != Some(100) || service.max_payload_bytes != 4096 {
        return Err("service config not derived from query/limits".to_string());
    }
    Ok(())
}

#[test]
fn memory_store_has_no_sqlite_config() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.store.sqlite_config().is_some() {
        return Err("memory store should not yield sqlite config".to_string());
    }
    Ok(())
}

#[test]
fn unknown_store_type_is_parse_error() -> TestResult {
    assert_invalid(TodoLedgerConfig::from_toml("[store]\ntype = \"mongo\"\n"), "config parse error")
}

#[test]
fn load_reads_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("todo-ledger.toml");
    fs::write(&path, "[query]\nmax_results = 7\n").map_err(|err| err.to_string())?;
    let config = TodoLedgerConfig::load(Some(path.as_path())).map_err(|err| err.to_string())?;
    if config.query.max_results != Some(7) {
        return Err("max_results not loaded".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(TodoLedgerConfig::load(Some(path.as_path())), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("big.toml");
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    fs::write(&path, padding).map_err(|err| err.to_string())?;
    assert_invalid(TodoLedgerConfig::load(Some(path.as_path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("binary.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(TodoLedgerConfig::load(Some(path.as_path())), "config file must be utf-8")
}

#[test]
fn load_validates_after_parsing() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("invalid.toml");
    fs::write(&path, "[store]\ntype = \"sqlite\"\n").map_err(|err| err.to_string())?;
    assert_invalid(TodoLedgerConfig::load(Some(path.as_path())), "sqlite store requires path")
}
