// todo-ledger-core/src/runtime/query.rs
// ============================================================================
// Module: Todo Query Builder
// Description: Translate caller criteria into a filter plus query options.
// Purpose: Single place where loosely-typed criteria become typed predicates.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Each recognized key contributes at most one predicate (owner, status,
//! body, category, in that order) or option (limit, orderBy). Unrecognized
//! keys are ignored and only the first value of a key is read. The builder
//! is pure: it never mutates its input.
//!
//! - `status` is parsed into a boolean before the predicate is built; text
//!   that is not a recognized status is the only criteria error.
//! - `body` is a case-sensitive substring predicate.
//! - `limit` must be a positive integer; anything else is ignored.
//! - `orderBy` must be a plain field name; anything else is ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::FilterCriteria;
use crate::core::Predicate;
use crate::core::QueryOptions;
use crate::core::SortField;
use crate::core::TodoField;
use crate::core::TodoFilter;
use crate::core::TodoQuery;
use crate::core::criteria::BODY_KEY;
use crate::core::criteria::CATEGORY_KEY;
use crate::core::criteria::LIMIT_KEY;
use crate::core::criteria::ORDER_BY_KEY;
use crate::core::criteria::OWNER_KEY;
use crate::core::criteria::STATUS_KEY;
use crate::core::status_from_text;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Criteria errors reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// Status text is not one of the recognized spellings.
    #[error("status must be one of true, false, complete, incomplete (got '{0}')")]
    InvalidStatus(String),
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds store queries from caller criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    /// Upper bound applied to every result set.
    max_results: Option<usize>,
}

impl QueryBuilder {
    /// Creates a builder without a result cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_results: None,
        }
    }

    /// Creates a builder that caps every result set.
    #[must_use]
    pub const fn with_max_results(max_results: Option<usize>) -> Self {
        Self {
            max_results,
        }
    }

    /// Translates criteria into a query.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::InvalidStatus`] for an unrecognized status value.
    pub fn build(&self, criteria: &FilterCriteria) -> Result<TodoQuery, CriteriaError> {
        let mut filter = TodoFilter::all();
        if let Some(owner) = criteria.first(OWNER_KEY) {
            filter.push(Predicate::text(TodoField::Owner, owner));
        }
        if let Some(status) = criteria.first(STATUS_KEY) {
            filter.push(Predicate::status(parse_status(status)?));
        }
        if let Some(body) = criteria.first(BODY_KEY) {
            filter.push(Predicate::contains(TodoField::Body, body));
        }
        if let Some(category) = criteria.first(CATEGORY_KEY) {
            filter.push(Predicate::text(TodoField::Category, category));
        }
        let requested = criteria.first(LIMIT_KEY).and_then(parse_limit);
        let limit = match (requested, self.max_results) {
            (Some(requested), Some(cap)) => Some(requested.min(cap)),
            (requested, cap) => requested.or(cap),
        };
        let sort = criteria.first(ORDER_BY_KEY).and_then(SortField::parse);
        Ok(TodoQuery {
            filter,
            options: QueryOptions {
                limit,
                sort,
            },
        })
    }
}

/// Translates criteria into a query with no result cap.
///
/// # Errors
///
/// Returns [`CriteriaError::InvalidStatus`] for an unrecognized status value.
pub fn build_query(criteria: &FilterCriteria) -> Result<TodoQuery, CriteriaError> {
    QueryBuilder::new().build(criteria)
}

/// Parses status text into a completion flag.
///
/// Accepts `true`/`false` and `complete`/`incomplete`, ignoring ASCII case
/// and surrounding whitespace.
///
/// # Errors
///
/// Returns [`CriteriaError::InvalidStatus`] for any other text.
pub fn parse_status(text: &str) -> Result<bool, CriteriaError> {
    status_from_text(text.trim()).ok_or_else(|| CriteriaError::InvalidStatus(text.to_string()))
}

/// Parses a positive result limit.
fn parse_limit(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|limit| *limit > 0)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
