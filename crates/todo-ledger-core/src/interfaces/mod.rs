// todo-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Todo Ledger Interfaces
// Description: Backend-agnostic capability interface over the todo collection.
// Purpose: Define the store contract every backend must satisfy.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The service and aggregation engine depend only on [`TodoStore`], never on
//! a concrete backend. Stores never swallow errors; classification into
//! caller-facing kinds happens in the service layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::core::filter::Predicate;
use crate::core::filter::TodoFilter;
use crate::core::filter::TodoQuery;
use crate::core::identifiers::TodoId;
use crate::core::record::NewTodo;
use crate::core::record::TodoField;
use crate::core::record::TodoRecord;
use crate::core::summary::CompletionCounts;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Todo store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store could not be reached (transport, lock, or busy timeout).
    #[error("todo store unavailable: {0}")]
    Unavailable(String),
    /// Stored data could not be decoded.
    #[error("todo store corruption: {0}")]
    Corrupt(String),
    /// Store rejected the input.
    #[error("todo store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Cursor
// ============================================================================

/// Lazy, finite, single-pass sequence of records produced by `find_many`.
pub struct TodoCursor {
    /// Underlying record iterator.
    inner: Box<dyn Iterator<Item = Result<TodoRecord, StoreError>> + Send>,
}

impl TodoCursor {
    /// Wraps an iterator of decoded records.
    pub fn new<I>(records: I) -> Self
    where
        I: Iterator<Item = Result<TodoRecord, StoreError>> + Send + 'static,
    {
        Self {
            inner: Box::new(records),
        }
    }

    /// Drains the cursor, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] produced while decoding records.
    pub fn collect_records(self) -> Result<Vec<TodoRecord>, StoreError> {
        self.collect()
    }
}

impl Iterator for TodoCursor {
    type Item = Result<TodoRecord, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for TodoCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoCursor").finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Todo Store
// ============================================================================

/// Capability interface over the todo collection.
pub trait TodoStore {
    /// Returns the record with the identifier, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_one(&self, id: &TodoId) -> Result<Option<TodoRecord>, StoreError>;

    /// Returns matching records, sorted and truncated per the query options.
    ///
    /// Without a sort field, records come back in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query cannot be started.
    fn find_many(&self, query: &TodoQuery) -> Result<TodoCursor, StoreError>;

    /// Persists a new record and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert_one(&self, todo: &NewTodo) -> Result<TodoId, StoreError>;

    /// Counts records matching the filter (empty filter counts everything).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when counting fails.
    fn count_matching(&self, filter: &TodoFilter) -> Result<u64, StoreError>;

    /// Returns every distinct text value of the field across all records.
    ///
    /// Records missing the field, or holding a non-text value, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan fails.
    fn distinct_values(&self, field: TodoField) -> Result<BTreeSet<String>, StoreError>;

    /// Returns total and complete counts per distinct text value of the field.
    ///
    /// The provided implementation issues one distinct scan plus two counts per
    /// value; backends with grouped aggregation should override it with a
    /// single pass.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when any underlying round trip fails.
    fn group_completion(
        &self,
        field: TodoField,
    ) -> Result<BTreeMap<String, CompletionCounts>, StoreError> {
        let mut groups = BTreeMap::new();
        for value in self.distinct_values(field)? {
            let in_group = TodoFilter::all().and(Predicate::text(field, value.clone()));
            let total = self.count_matching(&in_group)?;
            let complete = self.count_matching(&in_group.and(Predicate::status(true)))?;
            groups.insert(value, CompletionCounts::new(total, complete));
        }
        Ok(groups)
    }
}
