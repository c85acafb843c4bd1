// todo-ledger-core/src/runtime/store.rs
// ============================================================================
// Module: Todo Ledger In-Memory Store
// Description: In-memory document collection for tests and local runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! [`InMemoryTodoStore`] keeps schemaless documents in insertion order behind a
//! mutex and evaluates filters directly. Its ordering rules mirror the `SQLite`
//! backend: missing values sort first, then booleans and numbers, then text;
//! ties keep insertion order. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde_json::Value;

use crate::core::CompletionCounts;
use crate::core::NewTodo;
use crate::core::SortField;
use crate::core::TodoDocument;
use crate::core::TodoField;
use crate::core::TodoFilter;
use crate::core::TodoId;
use crate::core::TodoIdGenerator;
use crate::core::TodoQuery;
use crate::core::TodoRecord;
use crate::core::status_value;
use crate::interfaces::StoreError;
use crate::interfaces::TodoCursor;
use crate::interfaces::TodoStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Stored document paired with its identifier.
type StoredTodo = (TodoId, TodoDocument);

/// In-memory todo store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTodoStore {
    /// Documents in insertion order.
    documents: Arc<Mutex<Vec<StoredTodo>>>,
    /// Identifier generator shared by clones.
    ids: Arc<TodoIdGenerator>,
}

impl InMemoryTodoStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw document, allowing fields to be absent or extra.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the document carries its own `_id`.
    pub fn insert_document(&self, document: TodoDocument) -> Result<TodoId, StoreError> {
        if document.contains_key(TodoField::Id.as_str()) {
            return Err(StoreError::Invalid("documents must not carry _id".to_string()));
        }
        let id = self.ids.next_id();
        self.lock()?.push((id.clone(), document));
        Ok(id)
    }

    /// Locks the document list.
    fn lock(&self) -> Result<MutexGuard<'_, Vec<StoredTodo>>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Unavailable("todo store mutex poisoned".to_string()))
    }
}

impl TodoStore for InMemoryTodoStore {
    fn find_one(&self, id: &TodoId) -> Result<Option<TodoRecord>, StoreError> {
        let found = self.lock()?.iter().find(|(stored, _)| stored == id).cloned();
        Ok(found.map(|(id, document)| TodoRecord::from_document(id, &document)))
    }

    fn find_many(&self, query: &TodoQuery) -> Result<TodoCursor, StoreError> {
        let mut matches: Vec<StoredTodo> = self
            .lock()?
            .iter()
            .filter(|(id, document)| query.filter.matches(id, document))
            .cloned()
            .collect();
        if let Some(sort) = &query.options.sort {
            matches.sort_by(|left, right| compare_by_field(sort, left, right));
        }
        if let Some(limit) = query.options.limit {
            matches.truncate(limit);
        }
        Ok(TodoCursor::new(
            matches.into_iter().map(|(id, document)| Ok(TodoRecord::from_document(id, &document))),
        ))
    }

    fn insert_one(&self, todo: &NewTodo) -> Result<TodoId, StoreError> {
        self.insert_document(todo.to_document())
    }

    fn count_matching(&self, filter: &TodoFilter) -> Result<u64, StoreError> {
        let count = self.lock()?.iter().filter(|(id, document)| filter.matches(id, document)).count();
        u64::try_from(count).map_err(|_| StoreError::Invalid("count overflow".to_string()))
    }

    fn distinct_values(&self, field: TodoField) -> Result<BTreeSet<String>, StoreError> {
        let guard = self.lock()?;
        let values = guard
            .iter()
            .filter_map(|(id, document)| text_value(field, id, document))
            .map(str::to_string)
            .collect();
        drop(guard);
        Ok(values)
    }

    fn group_completion(
        &self,
        field: TodoField,
    ) -> Result<BTreeMap<String, CompletionCounts>, StoreError> {
        let guard = self.lock()?;
        let mut groups: BTreeMap<String, CompletionCounts> = BTreeMap::new();
        for (id, document) in guard.iter() {
            if let Some(value) = text_value(field, id, document) {
                let complete = document
                    .get(TodoField::Status.as_str())
                    .and_then(status_value)
                    .unwrap_or(false);
                groups.entry(value.to_string()).or_default().observe(complete);
            }
        }
        drop(guard);
        Ok(groups)
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared todo store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedTodoStore {
    /// Inner store implementation.
    inner: Arc<dyn TodoStore + Send + Sync>,
}

impl SharedTodoStore {
    /// Wraps a todo store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl TodoStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl TodoStore for SharedTodoStore {
    fn find_one(&self, id: &TodoId) -> Result<Option<TodoRecord>, StoreError> {
        self.inner.find_one(id)
    }

    fn find_many(&self, query: &TodoQuery) -> Result<TodoCursor, StoreError> {
        self.inner.find_many(query)
    }

    fn insert_one(&self, todo: &NewTodo) -> Result<TodoId, StoreError> {
        self.inner.insert_one(todo)
    }

    fn count_matching(&self, filter: &TodoFilter) -> Result<u64, StoreError> {
        self.inner.count_matching(filter)
    }

    fn distinct_values(&self, field: TodoField) -> Result<BTreeSet<String>, StoreError> {
        self.inner.distinct_values(field)
    }

    fn group_completion(
        &self,
        field: TodoField,
    ) -> Result<BTreeMap<String, CompletionCounts>, StoreError> {
        self.inner.group_completion(field)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================


/// Returns the text value of a field, if present and textual.
fn text_value<'a>(field: TodoField, id: &'a TodoId, document: &'a TodoDocument) -> Option<&'a str> {
    if field == TodoField::Id {
        return Some(id.as_str());
    }
    document.get(field.as_str()).and_then(Value::as_str)
}

/// Sort rank of a JSON value; variant order is the cross-type ordering.
#[derive(Debug)]
enum SortKey {
    /// Field missing or JSON null.
    Missing,
    /// Boolean (as 0/1) or number.
    Number(f64),
    /// Text, or the JSON text of an array/object.
    Text(String),
}

impl SortKey {
    /// Builds the sort key for an optional JSON value.
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::Bool(flag)) => Self::Number(if *flag { 1.0 } else { 0.0 }),
            Some(Value::Number(number)) => number.as_f64().map_or(Self::Missing, Self::Number),
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(other) => Self::Text(other.to_string()),
        }
    }

    /// Total ordering across all keys.
    fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Cross-type rank.
    const fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

/// Compares two stored todos by the sort field (ascending).
fn compare_by_field(sort: &SortField, left: &StoredTodo, right: &StoredTodo) -> Ordering {
    if sort.is_id() {
        return left.0.cmp(&right.0);
    }
    let left_key = SortKey::from_value(left.1.get(sort.as_str()));
    let right_key = SortKey::from_value(right.1.get(sort.as_str()));
    left_key.total_cmp(&right_key)
}
