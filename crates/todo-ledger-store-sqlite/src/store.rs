// todo-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Todo Store
// Description: Durable TodoStore backed by SQLite JSON documents.
// Purpose: Persist todos and push filtering and grouping into SQL.
// Dependencies: todo-ledger-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`TodoStore`] using `SQLite`. Each todo is
//! one row holding its identifier and the JSON document; an autoincrement
//! sequence column preserves insertion order. Filters compile to
//! `json_type`/`json_extract` predicates so matching stays type-strict, and
//! completion grouping runs as a single `GROUP BY` pass. Completion flags
//! stored as status text by older clients are read the same way the core
//! record decoder reads them.
//!
//! `find_many` reads the matching rows while holding the connection lock and
//! decodes them lazily as the cursor is drained, so a corrupt document fails
//! only the record it belongs to.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;
use serde::Deserialize;
use thiserror::Error;
use todo_ledger_core::CompletionCounts;
use todo_ledger_core::FieldValue;
use todo_ledger_core::NewTodo;
use todo_ledger_core::Predicate;
use todo_ledger_core::SortField;
use todo_ledger_core::StoreError;
use todo_ledger_core::TodoCursor;
use todo_ledger_core::TodoDocument;
use todo_ledger_core::TodoField;
use todo_ledger_core::TodoFilter;
use todo_ledger_core::TodoId;
use todo_ledger_core::TodoIdGenerator;
use todo_ledger_core::TodoQuery;
use todo_ledger_core::TodoRecord;
use todo_ledger_core::TodoStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum serialized document size accepted by the store.
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` todo store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for the path with default tuning.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row could not be decoded.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Document exceeded the size limit.
    #[error("sqlite store document too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual document size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) | SqliteStoreError::Db(message) => {
                Self::Unavailable(message)
            }
            SqliteStoreError::Corrupt(message) | SqliteStoreError::VersionMismatch(message) => {
                Self::Corrupt(message)
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "document exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Raw row read from the `todos` table: identifier and document text.
type RawRow = (String, String);

/// `SQLite`-backed todo store.
#[derive(Clone)]
pub struct SqliteTodoStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
    /// Identifier generator shared by clones.
    ids: Arc<TodoIdGenerator>,
}

impl SqliteTodoStore {
    /// Opens an `SQLite`-backed todo store, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            ids: Arc::new(TodoIdGenerator::new()),
        })
    }

    /// Inserts a raw document, allowing fields to be absent or extra.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when the document carries its own
    /// `_id`, [`SqliteStoreError::TooLarge`] when it exceeds
    /// [`MAX_DOCUMENT_BYTES`], and [`SqliteStoreError::Db`] on engine failure.
    pub fn insert_document(&self, document: &TodoDocument) -> Result<TodoId, SqliteStoreError> {
        if document.contains_key(TodoField::Id.as_str()) {
            return Err(SqliteStoreError::Invalid("documents must not carry _id".to_string()));
        }
        let text = serde_json::to_string(document)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if text.len() > MAX_DOCUMENT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_DOCUMENT_BYTES,
                actual_bytes: text.len(),
            });
        }
        let id = self.ids.next_id();
        self.with_connection(|connection| {
            connection
                .execute(
                    "INSERT INTO todos (todo_id, document) VALUES (?1, ?2)",
                    params![id.as_str(), text],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })?;
        Ok(id)
    }

    /// Runs an operation against the locked connection.
    fn with_connection<T>(
        &self,
        operation: impl FnOnce(&mut Connection) -> Result<T, SqliteStoreError>,
    ) -> Result<T, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        operation(&mut guard)
    }

    /// Loads the document row for an identifier.
    fn load_row(&self, id: &TodoId) -> Result<Option<RawRow>, SqliteStoreError> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT todo_id, document FROM todos WHERE todo_id = ?1",
                    params![id.as_str()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })
    }

    /// Loads every row matching a query in result order.
    fn load_rows(&self, query: &TodoQuery) -> Result<Vec<RawRow>, SqliteStoreError> {
        let mut sql = String::from("SELECT todo_id, document FROM todos");
        let mut values = Vec::new();
        push_where(&mut sql, &mut values, &query.filter);
        push_order(&mut sql, &mut values, query.options.sort.as_ref());
        if let Some(limit) = query.options.limit {
            sql.push_str(" LIMIT ?");
            values.push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }
        self.with_connection(|connection| {
            let mut statement =
                connection.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params_from_iter(values.iter()), |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            rows.collect::<Result<Vec<RawRow>, _>>()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })
    }

    /// Counts rows matching a filter.
    fn count_rows(&self, filter: &TodoFilter) -> Result<u64, SqliteStoreError> {
        let mut sql = String::from("SELECT COUNT(*) FROM todos");
        let mut values = Vec::new();
        push_where(&mut sql, &mut values, filter);
        let count: i64 = self.with_connection(|connection| {
            connection
                .query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })?;
        to_count(count)
    }

    /// Loads the distinct text values of a field.
    fn load_distinct(&self, field: TodoField) -> Result<BTreeSet<String>, SqliteStoreError> {
        let sql = if field == TodoField::Id {
            "SELECT todo_id FROM todos".to_string()
        } else {
            let path = field_path(field);
            format!(
                "SELECT DISTINCT json_extract(document, '{path}') FROM todos WHERE \
                 json_type(document, '{path}') = 'text'"
            )
        };
        self.with_connection(|connection| {
            let mut statement =
                connection.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![], |row| row.get::<_, String>(0))
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            rows.collect::<Result<BTreeSet<String>, _>>()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })
    }

    /// Computes grouped completion counts in one pass.
    fn load_groups(
        &self,
        field: TodoField,
    ) -> Result<BTreeMap<String, CompletionCounts>, SqliteStoreError> {
        let complete = format!(
            "SUM(CASE WHEN {} THEN 1 ELSE 0 END)",
            status_condition(&field_path(TodoField::Status), true)
        );
        let sql = if field == TodoField::Id {
            format!("SELECT todo_id, COUNT(*), {complete} FROM todos GROUP BY todo_id")
        } else {
            let path = field_path(field);
            format!(
                "SELECT json_extract(document, '{path}'), COUNT(*), {complete} FROM todos WHERE \
                 json_type(document, '{path}') = 'text' GROUP BY 1"
            )
        };
        let rows: Vec<(String, i64, i64)> = self.with_connection(|connection| {
            let mut statement =
                connection.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(|err| SqliteStoreError::Db(err.to_string()))
        })?;
        rows.into_iter()
            .map(|(value, total, complete)| {
                Ok((value, CompletionCounts::new(to_count(total)?, to_count(complete)?)))
            })
            .collect()
    }
}

impl TodoStore for SqliteTodoStore {
    fn find_one(&self, id: &TodoId) -> Result<Option<TodoRecord>, StoreError> {
        let row = self.load_row(id)?;
        row.map(decode_row).transpose()
    }

    fn find_many(&self, query: &TodoQuery) -> Result<TodoCursor, StoreError> {
        let rows = self.load_rows(query)?;
        Ok(TodoCursor::new(rows.into_iter().map(decode_row)))
    }

    fn insert_one(&self, todo: &NewTodo) -> Result<TodoId, StoreError> {
        self.insert_document(&todo.to_document()).map_err(StoreError::from)
    }

    fn count_matching(&self, filter: &TodoFilter) -> Result<u64, StoreError> {
        self.count_rows(filter).map_err(StoreError::from)
    }

    fn distinct_values(&self, field: TodoField) -> Result<BTreeSet<String>, StoreError> {
        self.load_distinct(field).map_err(StoreError::from)
    }

    fn group_completion(
        &self,
        field: TodoField,
    ) -> Result<BTreeMap<String, CompletionCounts>, StoreError> {
        self.load_groups(field).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Query Compilation
// ============================================================================

/// Returns the JSON path of a named field.
fn field_path(field: TodoField) -> String {
    format!("$.{}", field.as_str())
}

/// Appends the `WHERE` clause for a filter and its bound values.
fn push_where(sql: &mut String, values: &mut Vec<SqlValue>, filter: &TodoFilter) {
    let clauses: Vec<String> =
        filter.predicates().iter().map(|predicate| compile_predicate(predicate, values)).collect();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
}

/// Compiles one predicate; values are bound in the order placeholders appear.
fn compile_predicate(predicate: &Predicate, values: &mut Vec<SqlValue>) -> String {
    match predicate {
        Predicate::Equals {
            field: TodoField::Id,
            value,
        } => match value {
            FieldValue::Text(text) => {
                values.push(SqlValue::Text(text.clone()));
                "todo_id = ?".to_string()
            }
            FieldValue::Bool(_) => "0".to_string(),
        },
        Predicate::Equals {
            field,
            value: FieldValue::Bool(flag),
        } => status_condition(&field_path(*field), *flag),
        Predicate::Equals {
            field,
            value: FieldValue::Text(text),
        } => {
            values.push(SqlValue::Text(text.clone()));
            let path = field_path(*field);
            format!(
                "(json_type(document, '{path}') = 'text' AND json_extract(document, '{path}') = ?)"
            )
        }
        Predicate::Contains {
            field: TodoField::Id,
            needle,
        } => {
            values.push(SqlValue::Text(needle.clone()));
            "instr(todo_id, ?) > 0".to_string()
        }
        Predicate::Contains {
            field,
            needle,
        } => {
            values.push(SqlValue::Text(needle.clone()));
            let path = field_path(*field);
            format!(
                "(json_type(document, '{path}') = 'text' AND instr(json_extract(document, \
                 '{path}'), ?) > 0)"
            )
        }
    }
}

/// Builds the condition matching a completion flag stored as a JSON boolean
/// or as status text (ASCII case-insensitive, surrounding whitespace ignored).
fn status_condition(path: &str, flag: bool) -> String {
    let (json_type, spellings) =
        if flag { ("true", "'true', 'complete'") } else { ("false", "'false', 'incomplete'") };
    format!(
        "(json_type(document, '{path}') = '{json_type}' OR (json_type(document, '{path}') = \
         'text' AND lower(trim(json_extract(document, '{path}'), char(32, 9, 10, 13))) IN \
         ({spellings})))"
    )
}

/// Appends the `ORDER BY` clause; the sequence column breaks ties.
fn push_order(sql: &mut String, values: &mut Vec<SqlValue>, sort: Option<&SortField>) {
    match sort {
        None => sql.push_str(" ORDER BY seq"),
        Some(sort) if sort.is_id() => sql.push_str(" ORDER BY todo_id, seq"),
        Some(sort) => {
            sql.push_str(" ORDER BY json_extract(document, ?), seq");
            values.push(SqlValue::Text(format!("$.\"{}\"", sort.as_str())));
        }
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a raw row into a record.
///
/// Only an unusable identifier or a document that is not a bounded JSON object
/// is corruption; field-level type drift is absorbed by
/// [`TodoRecord::from_document`].
fn decode_row((id_text, document_text): RawRow) -> Result<TodoRecord, StoreError> {
    let id = TodoId::parse(&id_text)
        .map_err(|err| StoreError::Corrupt(format!("stored todo id {id_text}: {err}")))?;
    if document_text.len() > MAX_DOCUMENT_BYTES {
        return Err(StoreError::Corrupt(format!(
            "todo {id}: stored document is {} bytes (max {MAX_DOCUMENT_BYTES})",
            document_text.len()
        )));
    }
    let document: TodoDocument = serde_json::from_str(&document_text)
        .map_err(|err| StoreError::Corrupt(format!("todo {id}: {err}")))?;
    Ok(TodoRecord::from_document(id, &document))
}

/// Converts an `SQLite` count into `u64`.
fn to_count(value: i64) -> Result<u64, SqliteStoreError> {
    u64::try_from(value).map_err(|_| SqliteStoreError::Corrupt(format!("negative count {value}")))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(connection)
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS todos (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    todo_id TEXT NOT NULL UNIQUE,
                    document TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_todos_owner
                    ON todos (json_extract(document, '$.owner'));
                CREATE INDEX IF NOT EXISTS idx_todos_category
                    ON todos (json_extract(document, '$.category'));",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
