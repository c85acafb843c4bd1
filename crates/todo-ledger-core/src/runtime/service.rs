// todo-ledger-core/src/runtime/service.rs
// ============================================================================
// Module: Todo Record Service
// Description: Caller-facing get/list/add/summarize operations.
// Purpose: Own input validation, error classification, and audit logging.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`TodoService`] is the only entry point the request layer needs. It owns
//! an injected store and audit sink, validates inputs, and classifies every
//! failure into a [`ServiceError`] kind. Store error text is written to the
//! audit sink and never returned to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::FilterCriteria;
use crate::core::NewTodo;
use crate::core::TodoId;
use crate::core::TodoRecord;
use crate::core::TodoSummary;
use crate::interfaces::StoreError;
use crate::interfaces::TodoStore;
use crate::runtime::aggregate::summarize;
use crate::runtime::audit::TodoAuditEvent;
use crate::runtime::audit::TodoAuditEventParams;
use crate::runtime::audit::TodoAuditSink;
use crate::runtime::audit::TodoOperation;
use crate::runtime::audit::TodoOutcome;
use crate::runtime::query::QueryBuilder;
use crate::runtime::query::parse_status;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum accepted insert payload size in bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Record service settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoServiceConfig {
    /// Upper bound applied to every `get_many` result.
    pub max_results: Option<usize>,
    /// Maximum accepted insert payload size in bytes.
    pub max_payload_bytes: usize,
}

impl Default for TodoServiceConfig {
    fn default() -> Self {
        Self {
            max_results: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Caller-visible service failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Identifier is not a syntactically valid object id.
    #[error("todo id is not a valid object id")]
    InvalidIdentifier,
    /// No todo has the identifier.
    #[error("todo not found")]
    NotFound,
    /// Criteria could not be interpreted.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),
    /// Insert payload omitted a required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Insert payload could not be parsed.
    #[error("malformed todo payload")]
    MalformedPayload,
    /// Store could not complete the operation.
    ///
    /// Covers every store-side fault, not only transport failures: stored
    /// data that cannot be read and data the store refuses both land here.
    /// The audit detail names which one occurred.
    #[error("todo store unavailable")]
    StoreUnavailable,
}

impl ServiceError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid_identifier",
            Self::NotFound => "not_found",
            Self::InvalidCriteria(_) => "invalid_criteria",
            Self::MissingField(_) => "missing_field",
            Self::MalformedPayload => "malformed_payload",
            Self::StoreUnavailable => "store_unavailable",
        }
    }

    /// Returns true when the caller can fix the request (4xx-equivalent).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::StoreUnavailable)
    }
}

/// Classified failure plus the internal cause for the audit log.
struct Failure {
    /// Caller-visible error.
    error: ServiceError,
    /// Internal cause.
    detail: Option<String>,
}

impl Failure {
    /// Creates a failure with an internal cause.
    fn new(error: ServiceError, detail: impl Into<String>) -> Self {
        Self {
            error,
            detail: Some(detail.into()),
        }
    }
}

impl From<StoreError> for Failure {
    fn from(error: StoreError) -> Self {
        let detail = match error {
            StoreError::Unavailable(message) => format!("unavailable: {message}"),
            StoreError::Corrupt(message) => format!("corrupt: {message}"),
            StoreError::Invalid(message) => format!("invalid: {message}"),
        };
        Self::new(ServiceError::StoreUnavailable, detail)
    }
}

// ============================================================================
// SECTION: Payload Schema
// ============================================================================

/// Untyped insert payload; null and absent fields are both missing.
#[derive(Debug, Deserialize)]
struct TodoPayload {
    /// Owner name.
    owner: Option<String>,
    /// Completion flag as JSON boolean or status text.
    status: Option<StatusField>,
    /// Free-text body.
    body: Option<String>,
    /// Category label.
    category: Option<String>,
}

/// Status as supplied in a payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusField {
    /// JSON boolean.
    Flag(bool),
    /// Status text such as `"true"` or `"complete"`.
    Text(String),
}

impl TodoPayload {
    /// Converts the payload into an insert, rejecting missing fields.
    fn into_new_todo(self) -> Result<NewTodo, Failure> {
        let owner = require(self.owner, "owner")?;
        let status = match require(self.status, "status")? {
            StatusField::Flag(flag) => flag,
            StatusField::Text(text) => parse_status(&text)
                .map_err(|err| Failure::new(ServiceError::MalformedPayload, err.to_string()))?,
        };
        let body = require(self.body, "body")?;
        let category = require(self.category, "category")?;
        Ok(NewTodo {
            owner,
            status,
            body,
            category,
        })
    }
}

/// Requires a payload field to be present and non-null.
fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Failure> {
    value.ok_or_else(|| {
        Failure::new(ServiceError::MissingField(field), format!("payload missing {field}"))
    })
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Record service over an injected store and audit sink.
pub struct TodoService<S, A> {
    /// Store implementation.
    store: S,
    /// Audit sink implementation.
    audit: A,
    /// Criteria translator.
    queries: QueryBuilder,
    /// Maximum accepted payload size in bytes.
    max_payload_bytes: usize,
}

impl<S, A> TodoService<S, A>
where
    S: TodoStore,
    A: TodoAuditSink,
{
    /// Creates a record service.
    pub const fn new(store: S, audit: A, config: TodoServiceConfig) -> Self {
        Self {
            store,
            audit,
            queries: QueryBuilder::with_max_results(config.max_results),
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the todo with the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidIdentifier`] for malformed identifiers,
    /// [`ServiceError::NotFound`] when no todo matches, and
    /// [`ServiceError::StoreUnavailable`] when the store fails.
    pub fn get_one(&self, id: &str) -> Result<TodoRecord, ServiceError> {
        let outcome = self.lookup(id);
        self.finish(TodoOperation::GetOne, outcome, |record| (Some(record.id.to_string()), Some(1)))
    }

    /// Returns every todo satisfying the criteria.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidCriteria`] for unrecognized status text
    /// and [`ServiceError::StoreUnavailable`] when the store fails.
    pub fn get_many(&self, criteria: &FilterCriteria) -> Result<Vec<TodoRecord>, ServiceError> {
        let outcome = self.query(criteria);
        self.finish(TodoOperation::GetMany, outcome, |records| {
            (None, u64::try_from(records.len()).ok())
        })
    }

    /// Inserts a typed todo.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] when the store fails.
    pub fn add_one(&self, todo: &NewTodo) -> Result<TodoId, ServiceError> {
        let outcome = self.store.insert_one(todo).map_err(Failure::from);
        self.finish(TodoOperation::AddOne, outcome, |id| (Some(id.to_string()), None))
    }

    /// Inserts a todo from text fields, parsing the status text.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MalformedPayload`] for unrecognized status text
    /// and [`ServiceError::StoreUnavailable`] when the store fails.
    pub fn add_fields(
        &self,
        owner: &str,
        status: &str,
        body: &str,
        category: &str,
    ) -> Result<TodoId, ServiceError> {
        let outcome = parse_status(status)
            .map_err(|err| Failure::new(ServiceError::MalformedPayload, err.to_string()))
            .and_then(|status| {
                let todo = NewTodo::new(owner, status, body, category);
                self.store.insert_one(&todo).map_err(Failure::from)
            });
        self.finish(TodoOperation::AddOne, outcome, |id| (Some(id.to_string()), None))
    }

    /// Inserts a todo from an untyped JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingField`] when a field is absent or null,
    /// [`ServiceError::MalformedPayload`] when the payload is not a JSON object
    /// of the expected shape, and [`ServiceError::StoreUnavailable`] when the
    /// store fails.
    pub fn add_payload(&self, payload: &[u8]) -> Result<TodoId, ServiceError> {
        let outcome = self
            .parse_payload(payload)
            .and_then(|todo| self.store.insert_one(&todo).map_err(Failure::from));
        self.finish(TodoOperation::AddOne, outcome, |id| (Some(id.to_string()), None))
    }

    /// Computes the completion summary.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] when the store fails.
    pub fn summarize(&self) -> Result<TodoSummary, ServiceError> {
        let outcome = summarize(&self.store).map_err(Failure::from);
        self.finish(TodoOperation::Summarize, outcome, |summary| (None, Some(summary.total_todos)))
    }

    /// Parses and resolves an identifier.
    fn lookup(&self, id: &str) -> Result<TodoRecord, Failure> {
        let parsed = TodoId::parse(id)
            .map_err(|err| Failure::new(ServiceError::InvalidIdentifier, format!("'{id}': {err}")))?;
        self.store
            .find_one(&parsed)?
            .ok_or_else(|| Failure::new(ServiceError::NotFound, format!("todo {parsed} not found")))
    }

    /// Builds and runs a criteria query.
    fn query(&self, criteria: &FilterCriteria) -> Result<Vec<TodoRecord>, Failure> {
        let query = self.queries.build(criteria).map_err(|err| {
            Failure::new(ServiceError::InvalidCriteria(err.to_string()), err.to_string())
        })?;
        self.store.find_many(&query)?.collect_records().map_err(Failure::from)
    }

    /// Parses an insert payload against the payload schema.
    fn parse_payload(&self, payload: &[u8]) -> Result<NewTodo, Failure> {
        if payload.len() > self.max_payload_bytes {
            return Err(Failure::new(
                ServiceError::MalformedPayload,
                format!("payload is {} bytes (max {})", payload.len(), self.max_payload_bytes),
            ));
        }
        let value: Value = serde_json::from_slice(payload)
            .map_err(|err| Failure::new(ServiceError::MalformedPayload, err.to_string()))?;
        if !value.is_object() {
            return Err(Failure::new(
                ServiceError::MalformedPayload,
                "payload must be a JSON object",
            ));
        }
        let parsed: TodoPayload = serde_json::from_value(value)
            .map_err(|err| Failure::new(ServiceError::MalformedPayload, err.to_string()))?;
        parsed.into_new_todo()
    }

    /// Records the audit event for an operation and strips internal detail.
    fn finish<T>(
        &self,
        operation: TodoOperation,
        outcome: Result<T, Failure>,
        facts: impl FnOnce(&T) -> (Option<String>, Option<u64>),
    ) -> Result<T, ServiceError> {
        let params = match &outcome {
            Ok(value) => {
                let (todo_id, result_count) = facts(value);
                TodoAuditEventParams {
                    operation,
                    outcome: TodoOutcome::Success,
                    error_kind: None,
                    detail: None,
                    todo_id,
                    result_count,
                }
            }
            Err(failure) => TodoAuditEventParams {
                operation,
                outcome: TodoOutcome::Failure,
                error_kind: Some(failure.error.kind()),
                detail: failure.detail.clone(),
                todo_id: None,
                result_count: None,
            },
        };
        self.audit.record(&TodoAuditEvent::new(params));
        outcome.map_err(|failure| failure.error)
    }
}
