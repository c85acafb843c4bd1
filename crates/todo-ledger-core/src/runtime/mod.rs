// todo-ledger-core/src/runtime/mod.rs
// ============================================================================
// Module: Todo Ledger Runtime
// Description: Query builder, aggregation engine, service, and reference store.
// Purpose: Turn caller requests into store round trips with classified errors.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules translate criteria into typed queries, compute completion
//! summaries, and expose the record service. Every backend is reached through
//! [`crate::interfaces::TodoStore`], so the same logic runs against the
//! in-memory and `SQLite` stores.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregate;
pub mod audit;
pub mod query;
pub mod service;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::summarize;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::TodoAuditEvent;
pub use audit::TodoAuditEventParams;
pub use audit::TodoAuditSink;
pub use audit::TodoOperation;
pub use audit::TodoOutcome;
pub use query::CriteriaError;
pub use query::QueryBuilder;
pub use query::build_query;
pub use query::parse_status;
pub use service::DEFAULT_MAX_PAYLOAD_BYTES;
pub use service::ServiceError;
pub use service::TodoService;
pub use service::TodoServiceConfig;
pub use store::InMemoryTodoStore;
pub use store::SharedTodoStore;
