// todo-ledger-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Todo Aggregation Engine
// Description: Completion ratios overall, per category, and per owner.
// Purpose: Compute the completion summary from grouped store counts.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A summary costs four store round trips: the total count, the complete
//! count, and one grouped pass each for categories and owners. The round trips
//! are not transactional, so a write landing between them can make the
//! grouped ratios disagree with the overall ratio. Callers that need a
//! consistent snapshot must serialize writes themselves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::CompletionCounts;
use crate::core::Predicate;
use crate::core::TodoField;
use crate::core::TodoFilter;
use crate::core::TodoSummary;
use crate::interfaces::StoreError;
use crate::interfaces::TodoStore;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Computes the completion summary for the current store contents.
///
/// # Errors
///
/// Returns [`StoreError`] when any store round trip fails.
pub fn summarize<S>(store: &S) -> Result<TodoSummary, StoreError>
where
    S: TodoStore + ?Sized,
{
    let total = store.count_matching(&TodoFilter::all())?;
    let complete = store.count_matching(&TodoFilter::all().and(Predicate::status(true)))?;
    let overall = CompletionCounts::new(total, complete);
    let by_category = ratios(store.group_completion(TodoField::Category)?);
    let by_owner = ratios(store.group_completion(TodoField::Owner)?);
    Ok(TodoSummary {
        overall: overall.ratio(),
        total_todos: overall.total,
        by_category,
        by_owner,
    })
}

/// Converts grouped counts into ratios.
fn ratios(groups: BTreeMap<String, CompletionCounts>) -> BTreeMap<String, f64> {
    groups.into_iter().map(|(value, counts)| (value, counts.ratio())).collect()
}
