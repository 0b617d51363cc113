// crates/data-console-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable append-only RecordStore backed by SQLite.
// Purpose: Persist whitelisted-table records with per-call connections.
// Dependencies: data-console-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! Every whitelisted table maps to a static SQL statement set; caller data is
//! bound as positional parameters and never interpolated into SQL text. The
//! store opens a fresh connection per call so concurrent callers never share
//! connection state; WAL mode plus a busy timeout serialize writers without
//! interleaving partial rows. Each insert commits before the call returns and
//! assigns the identifier and creation timestamp in the same statement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use data_console_core::ServiceError;
use data_console_core::record::FieldValue;
use data_console_core::record::NewRecord;
use data_console_core::record::StoredRecord;
use data_console_core::record::TableName;
use data_console_core::record::validate_record;
use data_console_core::store::InsertReceipt;
use data_console_core::store::RecordStore;
use data_console_core::store::TableSummary;
use data_console_core::store::unix_millis;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use thiserror::Error;

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

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
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
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
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

/// Configuration for the `SQLite` record store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` record store errors.
///
/// # Invariants
/// - Error messages avoid embedding record payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteRecordStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteRecordStoreError> for ServiceError {
    fn from(error: SqliteRecordStoreError) -> Self {
        match error {
            SqliteRecordStoreError::Invalid(message) => Self::Validation(message),
            SqliteRecordStoreError::Io(_)
            | SqliteRecordStoreError::Db(_)
            | SqliteRecordStoreError::VersionMismatch(_) => Self::Storage(error.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed record store with per-call connections.
///
/// # Invariants
/// - SQL text is static per table variant; caller data is always bound.
/// - Each call opens, uses, and drops its own connection.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    /// Store configuration.
    config: SqliteStoreConfig,
}

impl SqliteRecordStore {
    /// Opens an `SQLite`-backed record store and initializes its schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteRecordStoreError`] when the database cannot be opened
    /// or initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteRecordStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
        })
    }

    /// Opens a fresh connection for a single call.
    fn connection(&self) -> Result<Connection, SqliteRecordStoreError> {
        open_connection(&self.config)
    }
}

impl RecordStore for SqliteRecordStore {
    fn insert(&self, table: TableName, record: &NewRecord) -> Result<InsertReceipt, ServiceError> {
        validate_record(table, record)?;
        let connection = self.connection().map_err(ServiceError::from)?;
        let mut values: Vec<SqlValue> = table
            .columns()
            .iter()
            .map(|column| record.get(*column).map_or(SqlValue::Null, field_to_sql))
            .collect();
        values.push(SqlValue::Integer(unix_millis()));
        connection
            .execute(insert_sql(table), params_from_iter(values))
            .map_err(|err| ServiceError::Storage(format!("insert failed: {err}")))?;
        Ok(InsertReceipt {
            table,
            id: connection.last_insert_rowid(),
        })
    }

    fn query_recent(
        &self,
        table: TableName,
        limit: u32,
    ) -> Result<Vec<StoredRecord>, ServiceError> {
        let connection = self.connection().map_err(ServiceError::from)?;
        let mut statement = connection
            .prepare(select_recent_sql(table))
            .map_err(|err| ServiceError::Storage(format!("query failed: {err}")))?;
        let columns = table.columns();
        let rows = statement
            .query_map(params![i64::from(limit)], |row| {
                let id: i64 = row.get(0)?;
                let created_at: i64 = row.get(1)?;
                let mut values = BTreeMap::new();
                for (offset, column) in columns.iter().enumerate() {
                    let value = field_from_sql(row.get_ref(offset + 2)?);
                    values.insert((*column).to_string(), value);
                }
                Ok(StoredRecord {
                    id,
                    created_at,
                    values,
                })
            })
            .map_err(|err| ServiceError::Storage(format!("query failed: {err}")))?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|err| ServiceError::Storage(format!("query failed: {err}")))?);
        }
        Ok(records)
    }

    fn count_summary(&self, table: TableName) -> Result<TableSummary, ServiceError> {
        let connection = self.connection().map_err(ServiceError::from)?;
        let total: i64 = connection
            .query_row(count_sql(table), [], |row| row.get(0))
            .map_err(|err| ServiceError::Storage(format!("count failed: {err}")))?;
        Ok(TableSummary {
            table,
            total_records: u64::try_from(total).unwrap_or(0),
        })
    }
}

// ============================================================================
// SECTION: Static Statements
// ============================================================================

/// Returns the static insert statement for a table.
const fn insert_sql(table: TableName) -> &'static str {
    match table {
        TableName::WeatherLogs => {
            "INSERT INTO weather_logs (city, temperature, condition, created_at) VALUES (?1, ?2, \
             ?3, ?4)"
        }
        TableName::FileLogs => {
            "INSERT INTO file_logs (filename, action, created_at) VALUES (?1, ?2, ?3)"
        }
        TableName::Reports => {
            "INSERT INTO reports (report_name, content, created_at) VALUES (?1, ?2, ?3)"
        }
    }
}

/// Returns the static recent-records statement for a table.
const fn select_recent_sql(table: TableName) -> &'static str {
    match table {
        TableName::WeatherLogs => {
            "SELECT id, created_at, city, temperature, condition FROM weather_logs ORDER BY id \
             DESC LIMIT ?1"
        }
        TableName::FileLogs => {
            "SELECT id, created_at, filename, action FROM file_logs ORDER BY id DESC LIMIT ?1"
        }
        TableName::Reports => {
            "SELECT id, created_at, report_name, content FROM reports ORDER BY id DESC LIMIT ?1"
        }
    }
}

/// Returns the static count statement for a table.
const fn count_sql(table: TableName) -> &'static str {
    match table {
        TableName::WeatherLogs => "SELECT COUNT(*) FROM weather_logs",
        TableName::FileLogs => "SELECT COUNT(*) FROM file_logs",
        TableName::Reports => "SELECT COUNT(*) FROM reports",
    }
}

// ============================================================================
// SECTION: Value Mapping
// ============================================================================

/// Converts a field value into an `SQLite` parameter value.
fn field_to_sql(value: &FieldValue) -> SqlValue {
    match value {
        FieldValue::Null => SqlValue::Null,
        FieldValue::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        FieldValue::Integer(number) => SqlValue::Integer(*number),
        FieldValue::Number(number) => SqlValue::Real(*number),
        FieldValue::Text(text) => SqlValue::Text(text.clone()),
    }
}

/// Converts a stored `SQLite` value back into a field value.
fn field_from_sql(value: ValueRef<'_>) -> FieldValue {
    match value {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(number) => FieldValue::Integer(number),
        ValueRef::Real(number) => FieldValue::Number(number),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

// ============================================================================
// SECTION: Connection Helpers
// ============================================================================

/// Ensures the parent directory of the store path exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteRecordStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteRecordStoreError::Io(
            "store path missing parent directory".to_string(),
        ));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteRecordStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteRecordStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteRecordStoreError::Invalid(
            "store path must not be empty".to_string(),
        ));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteRecordStoreError::Invalid(
            "store path exceeds length limit".to_string(),
        ));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteRecordStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteRecordStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durability pragmas applied.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteRecordStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteRecordStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!(
            "PRAGMA journal_mode = {};",
            config.journal_mode.pragma_value()
        ))
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteRecordStoreError> {
    let tx = connection
        .transaction()
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS weather_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    city TEXT,
                    temperature REAL,
                    condition TEXT,
                    created_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS file_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    filename TEXT,
                    action TEXT,
                    created_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS reports (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    report_name TEXT,
                    content TEXT,
                    created_at INTEGER NOT NULL
                );",
            )
            .map_err(|err| SqliteRecordStoreError::Db(err.to_string()))?;
        }
        Some(found) if found == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SqliteRecordStoreError::VersionMismatch(format!(
                "found schema version {found}, expected {SCHEMA_VERSION}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteRecordStoreError::Db(err.to_string()))
}
