// todo-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Todo Ledger Core Types
// Description: Canonical record, criteria, filter, and summary structures.
// Purpose: Provide stable, serializable types shared by every backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types define the todo record, its identifier, caller criteria, the
//! backend-agnostic filter language, and the derived completion summary.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod criteria;
pub mod filter;
pub mod identifiers;
pub mod record;
pub mod summary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use criteria::FilterCriteria;
pub use filter::FieldValue;
pub use filter::Predicate;
pub use filter::QueryOptions;
pub use filter::SortField;
pub use filter::TodoFilter;
pub use filter::TodoQuery;
pub use identifiers::IdentifierError;
pub use identifiers::TodoId;
pub use identifiers::TodoIdGenerator;
pub use record::NewTodo;
pub use record::TodoDocument;
pub use record::TodoField;
pub use record::TodoRecord;
pub use record::status_from_text;
pub use record::status_value;
pub use summary::CompletionCounts;
pub use summary::TodoSummary;
