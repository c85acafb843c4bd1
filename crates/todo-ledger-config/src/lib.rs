// todo-ledger-config/src/lib.rs
// ============================================================================
// Module: Todo Ledger Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for todo-ledger.toml semantics.
// Dependencies: todo-ledger-core, todo-ledger-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `todo-ledger-config` defines the configuration model for the todo ledger:
//! which store backs the service, result and payload limits, and where audit
//! events go. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
