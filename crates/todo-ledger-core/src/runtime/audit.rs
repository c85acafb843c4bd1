// todo-ledger-core/src/runtime/audit.rs
// ============================================================================
// Module: Todo Ledger Audit Logging
// Description: Structured audit events for record service operations.
// Purpose: Emit JSON-line operation logs without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every service operation emits one [`TodoAuditEvent`]. Events carry the
//! internal failure cause in `detail` so operators can diagnose store and
//! validation problems; callers only ever see the classified error kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Service operation recorded by an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoOperation {
    /// Single record lookup.
    GetOne,
    /// Criteria query.
    GetMany,
    /// Record insert.
    AddOne,
    /// Completion summary.
    Summarize,
}

/// Operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// Audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct TodoAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Operation performed.
    pub operation: TodoOperation,
    /// Operation outcome.
    pub outcome: TodoOutcome,
    /// Classified error kind on failure.
    pub error_kind: Option<&'static str>,
    /// Internal failure cause (never returned to callers).
    pub detail: Option<String>,
    /// Identifier read or written, when applicable.
    pub todo_id: Option<String>,
    /// Number of records returned, when applicable.
    pub result_count: Option<u64>,
}

/// Inputs required to construct an audit event.
pub struct TodoAuditEventParams {
    /// Operation performed.
    pub operation: TodoOperation,
    /// Operation outcome.
    pub outcome: TodoOutcome,
    /// Classified error kind on failure.
    pub error_kind: Option<&'static str>,
    /// Internal failure cause.
    pub detail: Option<String>,
    /// Identifier read or written.
    pub todo_id: Option<String>,
    /// Number of records returned.
    pub result_count: Option<u64>,
}

impl TodoAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: TodoAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "todo_request",
            timestamp_ms,
            operation: params.operation,
            outcome: params.outcome,
            error_kind: params.error_kind,
            detail: params.detail,
            todo_id: params.todo_id,
            result_count: params.result_count,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for service operation events.
pub trait TodoAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &TodoAuditEvent);
}

impl<T: TodoAuditSink + ?Sized> TodoAuditSink for Arc<T> {
    fn record(&self, event: &TodoAuditEvent) {
        (**self).record(event);
    }
}

impl<T: TodoAuditSink + ?Sized> TodoAuditSink for Box<T> {
    fn record(&self, event: &TodoAuditEvent) {
        (**self).record(event);
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl TodoAuditSink for StderrAuditSink {
    fn record(&self, event: &TodoAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl TodoAuditSink for FileAuditSink {
    fn record(&self, event: &TodoAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that discards events.
pub struct NoopAuditSink;

impl TodoAuditSink for NoopAuditSink {
    fn record(&self, _event: &TodoAuditEvent) {}
}
