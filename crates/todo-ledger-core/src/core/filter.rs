// todo-ledger-core/src/core/filter.rs
// ============================================================================
// Module: Todo Filters
// Description: Conjunctive filter expressions and query options.
// Purpose: Describe store queries independently of any backend.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`TodoFilter`] is a conjunction of field predicates; the empty filter
//! matches every document. Matching is type-strict: a text predicate never
//! matches a boolean field, and a missing field never matches anything.
//! Backends either evaluate filters directly ([`TodoFilter::matches`]) or
//! compile them into their native query language.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::identifiers::TodoId;
use crate::core::record::TodoDocument;
use crate::core::record::TodoField;
use crate::core::record::status_value;

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Typed value used as an equality target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
}

impl FieldValue {
    /// Returns true when the JSON value equals this target.
    ///
    /// Text compares only against JSON strings. A boolean target compares
    /// against the completion flag read by [`status_value`].
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Text(expected), Value::String(actual)) => expected == actual,
            (Self::Bool(expected), actual) => status_value(actual) == Some(*expected),
            (Self::Text(_), _) => false,
        }
    }
}

/// Single field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals the value exactly.
    Equals {
        /// Target field.
        field: TodoField,
        /// Expected value.
        value: FieldValue,
    },
    /// Text field contains the needle (case-sensitive).
    Contains {
        /// Target field.
        field: TodoField,
        /// Substring to search for.
        needle: String,
    },
}

impl Predicate {
    /// Builds a text equality predicate.
    #[must_use]
    pub fn text(field: TodoField, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: FieldValue::Text(value.into()),
        }
    }

    /// Builds a status equality predicate.
    #[must_use]
    pub const fn status(complete: bool) -> Self {
        Self::Equals {
            field: TodoField::Status,
            value: FieldValue::Bool(complete),
        }
    }

    /// Builds a substring predicate.
    #[must_use]
    pub fn contains(field: TodoField, needle: impl Into<String>) -> Self {
        Self::Contains {
            field,
            needle: needle.into(),
        }
    }

    /// Returns the field this predicate constrains.
    #[must_use]
    pub const fn field(&self) -> TodoField {
        match self {
            Self::Equals {
                field, ..
            }
            | Self::Contains {
                field, ..
            } => *field,
        }
    }

    /// Evaluates the predicate against a stored document.
    #[must_use]
    pub fn matches(&self, id: &TodoId, document: &TodoDocument) -> bool {
        let id_value;
        let value = if self.field() == TodoField::Id {
            id_value = Value::String(id.as_str().to_string());
            Some(&id_value)
        } else {
            document.get(self.field().as_str())
        };
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::Equals {
                value: expected, ..
            } => expected.matches(value),
            Self::Contains {
                needle, ..
            } => value.as_str().is_some_and(|text| text.contains(needle.as_str())),
        }
    }
}

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Conjunction of predicates; empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Predicates joined with AND.
    predicates: Vec<Predicate>,
}

impl TodoFilter {
    /// Returns the filter matching every record.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Returns the filter extended with one more predicate.
    #[must_use]
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Appends a predicate in place.
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Returns the predicates in insertion order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns true when the filter has no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluates every predicate against a stored document.
    #[must_use]
    pub fn matches(&self, id: &TodoId, document: &TodoDocument) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(id, document))
    }
}

// ============================================================================
// SECTION: Query Options
// ============================================================================

/// Validated sort field name.
///
/// Any field name made of ASCII alphanumerics and underscores is accepted;
/// the field does not need to exist on any document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField(String);

impl SortField {
    /// Parses a sort field name, returning `None` for unusable names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let valid = !name.is_empty()
            && name.len() <= 64
            && name.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_');
        valid.then(|| Self(name.to_string()))
    }

    /// Returns the field name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when sorting by the store-assigned identifier.
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.0 == TodoField::Id.as_str()
    }
}

/// Options applied after filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum number of records to return.
    pub limit: Option<usize>,
    /// Ascending sort field; insertion order when absent.
    pub sort: Option<SortField>,
}

/// Filter plus options consumed by `find_many`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    /// Conjunctive filter.
    pub filter: TodoFilter,
    /// Limit and sort options.
    pub options: QueryOptions,
}

impl TodoQuery {
    /// Returns a query matching every record in insertion order.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            filter: TodoFilter::all(),
            options: QueryOptions {
                limit: None,
                sort: None,
            },
        }
    }

    /// Returns a query for the provided filter with default options.
    #[must_use]
    pub fn filtered(filter: TodoFilter) -> Self {
        Self {
            filter,
            options: QueryOptions::default(),
        }
    }
}
