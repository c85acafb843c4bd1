// todo-ledger-core/src/lib.rs
// ============================================================================
// Module: Todo Ledger Core Library
// Description: Public API surface for the todo ledger core.
// Purpose: Expose record types, the store interface, and runtime services.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Todo ledger core provides criteria-driven lookup, insertion, and
//! completion aggregation over a schemaless todo collection. It is
//! backend-agnostic: stores plug in through [`TodoStore`], and the
//! request layer talks only to [`TodoService`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::StoreError;
pub use interfaces::TodoCursor;
pub use interfaces::TodoStore;
pub use runtime::CriteriaError;
pub use runtime::DEFAULT_MAX_PAYLOAD_BYTES;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryTodoStore;
pub use runtime::NoopAuditSink;
pub use runtime::QueryBuilder;
pub use runtime::ServiceError;
pub use runtime::SharedTodoStore;
pub use runtime::StderrAuditSink;
pub use runtime::TodoAuditEvent;
pub use runtime::TodoAuditEventParams;
pub use runtime::TodoAuditSink;
pub use runtime::TodoOperation;
pub use runtime::TodoOutcome;
pub use runtime::TodoService;
pub use runtime::TodoServiceConfig;
pub use runtime::build_query;
pub use runtime::parse_status;
pub use runtime::summarize;
