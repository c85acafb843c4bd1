// todo-ledger-core/src/core/criteria.rs
// ============================================================================
// Module: Filter Criteria
// Description: Loosely-typed caller criteria (query-string style multimap).
// Purpose: Carry raw criteria from the request boundary to the query builder.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Criteria arrive as a mapping from key to one or more text values, exactly
//! as a query string would produce them. Only the first value of a key is
//! honored downstream; later values are kept for inspection but never used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Recognized Keys
// ============================================================================

/// Exact owner match.
pub const OWNER_KEY: &str = "owner";
/// Completion status match.
pub const STATUS_KEY: &str = "status";
/// Body substring match.
pub const BODY_KEY: &str = "body";
/// Exact category match.
pub const CATEGORY_KEY: &str = "category";
/// Maximum result count.
pub const LIMIT_KEY: &str = "limit";
/// Sort field.
pub const ORDER_BY_KEY: &str = "orderBy";

// ============================================================================
// SECTION: Criteria
// ============================================================================

/// Caller-supplied filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Values per key in arrival order.
    entries: BTreeMap<String, Vec<String>>,
}

impl FilterCriteria {
    /// Creates empty criteria (matches every record).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the criteria with one more value appended.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the first value supplied for a key.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    /// Returns every value supplied for a key.
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true when no criteria were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
