// todo-ledger-core/src/core/summary.rs
// ============================================================================
// Module: Completion Summary
// Description: Derived completion statistics over the todo collection.
// Purpose: Define grouped counts and the serialized summary shape.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Summaries are computed on demand and never persisted. Ratios are in
//! `[0, 1]`; an empty collection reports a ratio of zero with a total of zero
//! rather than an undefined value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Counts
// ============================================================================

/// Total and completed record counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCounts {
    /// Records in the group.
    pub total: u64,
    /// Records in the group whose status is complete.
    pub complete: u64,
}

impl CompletionCounts {
    /// Creates counts for a group.
    #[must_use]
    pub const fn new(total: u64, complete: u64) -> Self {
        Self {
            total,
            complete,
        }
    }

    /// Adds one record to the group.
    pub const fn observe(&mut self, complete: bool) {
        self.total += 1;
        if complete {
            self.complete += 1;
        }
    }

    /// Returns the completion ratio, or zero for an empty group.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Counts stay far below 2^52.")]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.complete as f64 / self.total as f64
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Completion summary: overall, per category, and per owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoSummary {
    /// Fraction of all todos that are complete.
    #[serde(rename = "percentageTodosComplete")]
    pub overall: f64,
    /// Number of todos the overall ratio was computed from.
    #[serde(rename = "totalTodos")]
    pub total_todos: u64,
    /// Completion ratio per distinct category.
    #[serde(rename = "categoriesPercentComplete")]
    pub by_category: BTreeMap<String, f64>,
    /// Completion ratio per distinct owner.
    #[serde(rename = "ownersPercentComplete")]
    pub by_owner: BTreeMap<String, f64>,
}
