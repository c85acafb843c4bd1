// todo-ledger-cli/src/main.rs
// ============================================================================
// Module: Todo Ledger CLI Entry Point
// Description: Command dispatcher for todo lookup, query, insert, and summary.
// Purpose: Expose the record service over a local command line.
// Dependencies: clap, todo-ledger-config, todo-ledger-core, todo-ledger-store-sqlite, serde, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The Todo Ledger CLI loads configuration, opens the configured store, and
//! routes each subcommand through the record service. Results are written to
//! stdout as one JSON document per invocation. Client errors exit with code 2
//! and store, config, or I/O failures exit with code 1.
//!
//! The in-memory store does not persist between invocations; configure the
//! `sqlite` store for a durable ledger.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use todo_ledger_config::AuditConfig;
use todo_ledger_config::AuditSinkType;
use todo_ledger_config::StoreConfig;
use todo_ledger_config::StoreType;
use todo_ledger_config::TodoLedgerConfig;
use todo_ledger_core::FileAuditSink;
use todo_ledger_core::FilterCriteria;
use todo_ledger_core::InMemoryTodoStore;
use todo_ledger_core::NoopAuditSink;
use todo_ledger_core::ServiceError;
use todo_ledger_core::SharedTodoStore;
use todo_ledger_core::StderrAuditSink;
use todo_ledger_core::TodoAuditSink;
use todo_ledger_core::TodoService;
use todo_ledger_core::criteria::BODY_KEY;
use todo_ledger_core::criteria::CATEGORY_KEY;
use todo_ledger_core::criteria::LIMIT_KEY;
use todo_ledger_core::criteria::ORDER_BY_KEY;
use todo_ledger_core::criteria::OWNER_KEY;
use todo_ledger_core::criteria::STATUS_KEY;
use todo_ledger_store_sqlite::SqliteTodoStore;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Exit code for requests the caller can fix.
const EXIT_CLIENT_ERROR: u8 = 2;
/// Exit code for store, config, and I/O failures.
const EXIT_FAILURE: u8 = 1;
/// Path argument that selects stdin.
const STDIN_PATH: &str = "-";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "todo-ledger", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to `TODO_LEDGER_CONFIG` or ./todo-ledger.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one todo by identifier.
    Get {
        /// 24-character hex identifier.
        id: String,
    },
    /// List todos matching the given criteria.
    List(ListCommand),
    /// Insert a todo from flags.
    Add(AddCommand),
    /// Insert a todo from a JSON document (`-` reads stdin).
    AddJson {
        /// Input file path or `-`.
        input: String,
    },
    /// Print completion ratios overall, per category, and per owner.
    Summary,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Criteria flags for `list`. Values are passed through unparsed.
#[derive(Args, Debug, Default)]
struct ListCommand {
    /// Exact owner match.
    #[arg(long)]
    owner: Option<String>,
    /// Completion status (`true`, `false`, `complete`, `incomplete`).
    #[arg(long)]
    status: Option<String>,
    /// Case-sensitive body substring.
    #[arg(long)]
    body: Option<String>,
    /// Exact category match.
    #[arg(long)]
    category: Option<String>,
    /// Maximum number of results.
    #[arg(long)]
    limit: Option<String>,
    /// Sort field.
    #[arg(long = "order-by", value_name = "FIELD")]
    order_by: Option<String>,
}

/// Fields for `add`.
#[derive(Args, Debug)]
struct AddCommand {
    /// Owner name.
    #[arg(long)]
    owner: String,
    /// Completion status text.
    #[arg(long)]
    status: String,
    /// Todo text.
    #[arg(long)]
    body: String,
    /// Category label.
    #[arg(long)]
    category: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Validate,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying the process exit code.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Message written to stderr.
    message: String,
    /// Process exit code.
    exit_code: u8,
}

impl CliError {
    /// Creates a store, config, or I/O failure.
    const fn failure(message: String) -> Self {
        Self {
            message,
            exit_code: EXIT_FAILURE,
        }
    }

    /// Classifies a service error by who can fix it.
    fn from_service(error: &ServiceError) -> Self {
        let exit_code = if error.is_client_error() { EXIT_CLIENT_ERROR } else { EXIT_FAILURE };
        Self {
            message: format!("{}: {error}", error.kind()),
            exit_code,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

/// Service wired from configuration.
type CliService = TodoService<SharedTodoStore, Box<dyn TodoAuditSink>>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runs the CLI and maps failures to exit codes.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(),
        Commands::Get {
            id,
        } => command_get(&build_service(&config)?, &id),
        Commands::List(command) => command_list(&build_service(&config)?, &command),
        Commands::Add(command) => command_add(&build_service(&config)?, &command),
        Commands::AddJson {
            input,
        } => {
            command_add_json(&build_service(&config)?, &input, config.limits.max_payload_bytes)
        }
        Commands::Summary => command_summary(&build_service(&config)?),
    }
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Loads configuration from the flag, environment, or working directory.
fn load_config(cli: &Cli) -> CliResult<TodoLedgerConfig> {
    TodoLedgerConfig::load(cli.config.as_deref()).map_err(|err| CliError::failure(err.to_string()))
}

/// Builds the record service from configuration.
fn build_service(config: &TodoLedgerConfig) -> CliResult<CliService> {
    let store = build_store(&config.store)?;
    let audit = build_audit_sink(&config.audit)?;
    Ok(TodoService::new(store, audit, config.service_config()))
}

/// Opens the configured store backend.
fn build_store(config: &StoreConfig) -> CliResult<SharedTodoStore> {
    match config.store_type {
        StoreType::Memory => Ok(SharedTodoStore::from_store(InMemoryTodoStore::new())),
        StoreType::Sqlite => {
            let sqlite = config.sqlite_config().ok_or_else(|| {
                CliError::failure("sqlite store requires path".to_string())
            })?;
            let store = SqliteTodoStore::new(&sqlite).map_err(|err| {
                CliError::failure(format!("failed to open todo store: {err}"))
            })?;
            Ok(SharedTodoStore::from_store(store))
        }
    }
}

/// Builds the configured audit sink.
fn build_audit_sink(config: &AuditConfig) -> CliResult<Box<dyn TodoAuditSink>> {
    match (config.sink, &config.path) {
        (AuditSinkType::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditSinkType::None, _) => Ok(Box::new(NoopAuditSink)),
        (AuditSinkType::File, Some(path)) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                CliError::failure(format!("failed to open audit log {}: {err}", path.display()))
            })?;
            Ok(Box::new(sink))
        }
        (AuditSinkType::File, None) => {
            Err(CliError::failure("file audit sink requires path".to_string()))
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Reports a configuration that loaded and validated.
fn command_config_validate() -> CliResult<ExitCode> {
    write_json(&json!({ "valid": true }))?;
    Ok(ExitCode::SUCCESS)
}

/// Fetches one todo.
fn command_get(service: &CliService, id: &str) -> CliResult<ExitCode> {
    let record = service.get_one(id).map_err(|err| CliError::from_service(&err))?;
    write_json(&record)?;
    Ok(ExitCode::SUCCESS)
}

/// Lists todos matching the flags.
fn command_list(service: &CliService, command: &ListCommand) -> CliResult<ExitCode> {
    let criteria = criteria_from_flags(command);
    let records = service.get_many(&criteria).map_err(|err| CliError::from_service(&err))?;
    write_json(&records)?;
    Ok(ExitCode::SUCCESS)
}

/// Inserts a todo from flags.
fn command_add(service: &CliService, command: &AddCommand) -> CliResult<ExitCode> {
    let id = service
        .add_fields(&command.owner, &command.status, &command.body, &command.category)
        .map_err(|err| CliError::from_service(&err))?;
    write_json(&json!({ "_id": id }))?;
    Ok(ExitCode::SUCCESS)
}

/// Inserts a todo from a JSON document.
fn command_add_json(service: &CliService, input: &str, max_bytes: usize) -> CliResult<ExitCode> {
    let payload = if input == STDIN_PATH {
        read_bounded(std::io::stdin().lock(), max_bytes)
    } else {
        File::open(input).and_then(|file| read_bounded(file, max_bytes))
    }
    .map_err(|err| CliError::failure(format!("failed to read {input}: {err}")))?;
    let id = service.add_payload(&payload).map_err(|err| CliError::from_service(&err))?;
    write_json(&json!({ "_id": id }))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the completion summary.
fn command_summary(service: &CliService) -> CliResult<ExitCode> {
    let summary = service.summarize().map_err(|err| CliError::from_service(&err))?;
    write_json(&summary)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Converts `list` flags into query-string style criteria.
fn criteria_from_flags(command: &ListCommand) -> FilterCriteria {
    let flags = [
        (OWNER_KEY, &command.owner),
        (STATUS_KEY, &command.status),
        (BODY_KEY, &command.body),
        (CATEGORY_KEY, &command.category),
        (LIMIT_KEY, &command.limit),
        (ORDER_BY_KEY, &command.order_by),
    ];
    let mut criteria = FilterCriteria::new();
    for (key, value) in flags {
        if let Some(value) = value {
            criteria.insert(key, value.clone());
        }
    }
    criteria
}

/// Reads at most `max_bytes + 1` bytes so the service can reject oversize
/// payloads without buffering unbounded input.
fn read_bounded(reader: impl Read, max_bytes: usize) -> std::io::Result<Vec<u8>> {
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    reader.take(limit).read_to_end(&mut bytes)?;
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value to stdout as a single JSON line.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string(value)
        .map_err(|err| CliError::failure(format!("failed to render output: {err}")))?;
    write_stdout_line(&rendered)
        .map_err(|err| CliError::failure(format!("failed to write stdout: {err}")))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns its exit code.
fn emit_error(error: &CliError) -> ExitCode {
    let _ = write_stderr_line(&error.message);
    ExitCode::from(error.exit_code)
}
