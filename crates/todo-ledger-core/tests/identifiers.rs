// todo-ledger-core/tests/identifiers.rs
// ============================================================================
// Module: Todo Identifier Tests
// Description: Tests for object-id parsing and generation.
// Purpose: Validate the canonical hex form and generator uniqueness.
// Dependencies: todo-ledger-core, serde_json
// ============================================================================
//! ## Overview
//! Identifiers are minted by stores and parsed from untrusted caller input,
//! so both directions are checked here.

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

use std::collections::BTreeSet;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use todo_ledger_core::IdentifierError;
use todo_ledger_core::TodoId;
use todo_ledger_core::TodoIdGenerator;

#[test]
fn parse_accepts_hex_and_normalizes_case() {
    let id = TodoId::parse("5F1D7A2B9C8E4D3F2A1B0C9D").expect("parse");
    assert_eq!(id.as_str(), "5f1d7a2b9c8e4d3f2a1b0c9d");
    assert_eq!(id.to_string(), "5f1d7a2b9c8e4d3f2a1b0c9d");
}

#[test]
fn parse_rejects_wrong_length() {
    assert_eq!(
        TodoId::parse("abc"),
        Err(IdentifierError::Length {
            expected: 24,
            actual: 3,
        })
    );
    assert!(TodoId::parse("").is_err());
    assert!(TodoId::parse("5f1d7a2b9c8e4d3f2a1b0c9d0").is_err());
}

#[test]
fn parse_rejects_non_hex_characters() {
    assert_eq!(TodoId::parse("5f1d7a2b9c8e4d3f2a1b0c9g"), Err(IdentifierError::NonHex(23)));
    assert!(TodoId::parse("5f1d7a2b-c8e4d3f2a1b0c9d").is_err());
}

#[test]
fn serde_uses_plain_string_and_validates() {
    let id = TodoId::parse("5f1d7a2b9c8e4d3f2a1b0c9d").expect("parse");
    let json = serde_json::to_string(&id).expect("serialize");
    assert_eq!(json, "\"5f1d7a2b9c8e4d3f2a1b0c9d\"");
    let back: TodoId = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, id);
    assert!(serde_json::from_str::<TodoId>("\"nope\"").is_err());
}

#[test]
fn generator_mints_unique_parseable_ids() {
    let generator = TodoIdGenerator::new();
    let ids: Vec<TodoId> = (0 .. 1000).map(|_| generator.next_id()).collect();
    let unique: BTreeSet<&TodoId> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    for id in &ids {
        assert_eq!(TodoId::parse(id.as_str()).as_ref(), Ok(id));
    }
}

#[test]
fn generated_ids_embed_creation_time() {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock").as_secs();
    let id = TodoIdGenerator::new().next_id();
    let embedded = u64::from(id.timestamp_secs());
    assert!(embedded.abs_diff(now) <= 5, "embedded {embedded}, now {now}");
}
