// todo-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Todo Store
// Description: Durable TodoStore backend using SQLite JSON documents.
// Purpose: Persist todo documents with grouped aggregation in one pass.
// Dependencies: todo-ledger-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`TodoStore`] implementation that
//! keeps each todo as a schemaless JSON document. Filters, sorts, and
//! completion grouping are compiled to SQL so the database does the work.
//! Database contents are untrusted and decoded defensively on read.
//!
//! [`TodoStore`]: todo_ledger_core::TodoStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_DOCUMENT_BYTES;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteTodoStore;
