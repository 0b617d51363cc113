// crates/data-console-core/src/record.rs
// ============================================================================
// Module: Record Model
// Description: Whitelisted tables, static per-table schemas, and records.
// Purpose: Keep caller data out of SQL text via fixed column lists.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The table whitelist is a closed enum; each variant carries a fixed,
//! ordered column list. A record whose key set is not exactly the schema's
//! column set is rejected rather than silently written, so no
//! caller-supplied identifier ever reaches a storage statement.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ServiceError;

/// Failure message for unknown table identifiers.
pub const INVALID_TABLE_MESSAGE: &str = "Invalid table name";

// ============================================================================
// SECTION: Table Whitelist
// ============================================================================

/// Canonical whitelisted table names for the record store.
///
/// # Invariants
/// - The set is closed and fixed at compile time; there is no runtime
///   registration path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    /// Weather lookups logged by callers.
    WeatherLogs,
    /// File access actions logged by callers.
    FileLogs,
    /// Free-form named reports.
    Reports,
}

impl TableName {
    /// Returns the canonical string name for the table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeatherLogs => "weather_logs",
            Self::FileLogs => "file_logs",
            Self::Reports => "reports",
        }
    }

    /// Returns all whitelisted tables in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::WeatherLogs, Self::FileLogs, Self::Reports]
    }

    /// Parses a table name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "weather_logs" => Some(Self::WeatherLogs),
            "file_logs" => Some(Self::FileLogs),
            "reports" => Some(Self::Reports),
            _ => None,
        }
    }

    /// Returns the fixed, ordered domain column list for the table.
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::WeatherLogs => &["city", "temperature", "condition"],
            Self::FileLogs => &["filename", "action"],
            Self::Reports => &["report_name", "content"],
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Field Values
// ============================================================================

/// Scalar cell value accepted in record columns.
///
/// # Invariants
/// - Only scalars are representable; nested structures are rejected at
///   deserialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Number(f64),
    /// Text value.
    Text(String),
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Caller-supplied column values for an insert, prior to validation.
pub type NewRecord = BTreeMap<String, FieldValue>;

/// A stored record with store-assigned identifier and creation timestamp.
///
/// # Invariants
/// - `id` and `created_at` are assigned by the store, never by callers.
/// - Records are immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Store-assigned identifier (monotonic per table).
    pub id: i64,
    /// Creation timestamp in unix milliseconds, assigned at insert time.
    pub created_at: i64,
    /// Domain column values, keyed by column name.
    #[serde(flatten)]
    pub values: BTreeMap<String, FieldValue>,
}

/// Validates a record's key set against the table's static schema.
///
/// Unknown and missing columns are both rejected; this runs in the gateway
/// and again inside every store implementation as defense in depth.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the key set is not exactly the
/// schema's column set.
pub fn validate_record(table: TableName, record: &NewRecord) -> Result<(), ServiceError> {
    let columns = table.columns();
    for column in columns {
        if !record.contains_key(*column) {
            return Err(ServiceError::Validation(format!(
                "table {table} requires column '{column}'"
            )));
        }
    }
    for key in record.keys() {
        if !columns.contains(&key.as_str()) {
            return Err(ServiceError::Validation(format!(
                "table {table} does not accept column '{key}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
