// todo-ledger-core/src/core/record.rs
// ============================================================================
// Module: Todo Records
// Description: Canonical todo record, insert payload, and field names.
// Purpose: Define the wire shape shared by stores, the service, and callers.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Stores hold todos as schemaless JSON documents. [`TodoRecord`] is the typed
//! view returned to callers; it tolerates documents written before a field
//! existed (`body` and `category` may be absent) and documents written by
//! older clients that stored `status` as text. Fields holding some other JSON
//! type decode as absent rather than failing the read. [`NewTodo`] is the
//! insert shape and always carries all four fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::TodoId;

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// JSON object used as the stored form of a todo (without its identifier).
pub type TodoDocument = Map<String, Value>;

/// Named todo fields addressable by filters and groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TodoField {
    /// Store-assigned identifier (`_id`).
    Id,
    /// Todo owner.
    Owner,
    /// Completion flag.
    Status,
    /// Free-text body.
    Body,
    /// Category label.
    Category,
}

impl TodoField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Owner => "owner",
            Self::Status => "status",
            Self::Body => "body",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for TodoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// A stored todo as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: TodoId,
    /// Owner name.
    #[serde(default)]
    pub owner: String,
    /// Completion flag.
    #[serde(default)]
    pub status: bool,
    /// Free-text body, absent on legacy documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Category label, absent on legacy documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TodoRecord {
    /// Decodes a stored document into a record.
    ///
    /// Unknown fields are ignored. `owner` defaults to empty text, `status`
    /// accepts a boolean or status text and otherwise reads as incomplete, and
    /// `body` / `category` holding anything but text read as absent.
    #[must_use]
    pub fn from_document(id: TodoId, document: &TodoDocument) -> Self {
        let text = |field: TodoField| {
            document.get(field.as_str()).and_then(Value::as_str).map(str::to_string)
        };
        Self {
            id,
            owner: text(TodoField::Owner).unwrap_or_default(),
            status: document
                .get(TodoField::Status.as_str())
                .and_then(status_value)
                .unwrap_or(false),
            body: text(TodoField::Body),
            category: text(TodoField::Category),
        }
    }
}

// ============================================================================
// SECTION: Status Values
// ============================================================================

/// Parses status text (`true`, `complete`, `false`, `incomplete`).
///
/// Matching ignores ASCII case and surrounding spaces, tabs, and line breaks.
#[must_use]
pub fn status_from_text(text: &str) -> Option<bool> {
    let text = text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'));
    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("complete") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text.eq_ignore_ascii_case("incomplete") {
        Some(false)
    } else {
        None
    }
}

/// Reads a stored `status` value as a completion flag.
///
/// Booleans are taken as-is; text goes through [`status_from_text`]. Any
/// other JSON type has no completion flag.
#[must_use]
pub fn status_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => status_from_text(text),
        _ => None,
    }
}

/// Insert payload for a new todo; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Owner name.
    pub owner: String,
    /// Completion flag.
    pub status: bool,
    /// Free-text body.
    pub body: String,
    /// Category label.
    pub category: String,
}

impl NewTodo {
    /// Creates a new insert payload.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        status: bool,
        body: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            status,
            body: body.into(),
            category: category.into(),
        }
    }

    /// Returns the stored document form of this todo.
    #[must_use]
    pub fn to_document(&self) -> TodoDocument {
        let mut document = TodoDocument::new();
        document.insert(TodoField::Owner.as_str().to_string(), Value::String(self.owner.clone()));
        document.insert(TodoField::Status.as_str().to_string(), Value::Bool(self.status));
        document.insert(TodoField::Body.as_str().to_string(), Value::String(self.body.clone()));
        document
            .insert(TodoField::Category.as_str().to_string(), Value::String(self.category.clone()));
        document
    }
}
