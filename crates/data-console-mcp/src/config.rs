// crates/data-console-mcp/src/config.rs
// ============================================================================
// Module: Data Console Configuration
// Description: Configuration loading and validation for Data Console.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: data-console-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys, missing required values, and inconsistent combinations fail
//! closed before any server component is constructed. The data root and the
//! table whitelist are process-wide constants fixed at startup; nothing here
//! is mutable at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use data_console_store_sqlite::SqliteJournalMode;
use data_console_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "data-console.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DATA_CONSOLE_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Default maximum JSON-RPC request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Default busy timeout for the sqlite record store (ms).
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config contents failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Server transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// JSON-RPC over stdin/stdout with Content-Length framing.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

impl ServerTransport {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Record store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStoreType {
    /// In-memory store; records do not survive restarts.
    #[default]
    Memory,
    /// Durable `SQLite` store.
    Sqlite,
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines to stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    Noop,
}

/// Server transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport used to serve requests.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordStoreConfig {
    /// Selected backend.
    #[serde(default)]
    pub store_type: RecordStoreType,
    /// Database file path for the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout for sqlite connections in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            store_type: RecordStoreType::Memory,
            path: None,
            busy_timeout_ms: DEFAULT_STORE_BUSY_TIMEOUT_MS,
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected audit sink.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Data Console MCP configuration.
///
/// # Invariants
/// - `data_root` and the table whitelist are fixed for the process lifetime.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConsoleConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory all file operations are confined to.
    pub data_root: PathBuf,
    /// Record store configuration.
    #[serde(default)]
    pub record_store: RecordStoreConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Returns the default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default sqlite busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl DataConsoleConfig {
    /// Loads configuration from an explicit path, the environment override,
    /// or the default filename, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
        };
        let metadata =
            fs::metadata(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "config file exceeds {MAX_CONFIG_FILE_SIZE} bytes"
            )));
        }
        let contents =
            fs::read_to_string(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, failing closed on inconsistencies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for missing or inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_root must not be empty".to_string()));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        match self.server.transport {
            ServerTransport::Http => {
                let Some(bind) = self.server.bind.as_ref() else {
                    return Err(ConfigError::Invalid(
                        "http transport requires server.bind".to_string(),
                    ));
                };
                if bind.parse::<SocketAddr>().is_err() {
                    return Err(ConfigError::Invalid(format!(
                        "server.bind is not a valid socket address: {bind}"
                    )));
                }
            }
            ServerTransport::Stdio => {}
        }
        if self.record_store.store_type == RecordStoreType::Sqlite
            && self.record_store.path.is_none()
        {
            return Err(ConfigError::Invalid(
                "sqlite record_store requires record_store.path".to_string(),
            ));
        }
        if self.audit.sink == AuditSinkType::File && self.audit.path.is_none() {
            return Err(ConfigError::Invalid(
                "file audit sink requires audit.path".to_string(),
            ));
        }
        Ok(())
    }
}
