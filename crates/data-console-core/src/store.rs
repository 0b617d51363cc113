// crates/data-console-core/src/store.rs
// ============================================================================
// Module: Record Store Interface
// Description: Append-only record store trait and in-memory implementation.
// Purpose: Shared storage contract for durable and test backends.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The record store is append-only: inserts assign the identifier and
//! creation timestamp, queries return the newest records first (identifier
//! descending, independent of clock resolution), and no update or delete
//! operation exists. Implementations re-validate records against the static
//! table schemas as defense in depth.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ServiceError;
use crate::record::NewRecord;
use crate::record::StoredRecord;
use crate::record::TableName;
use crate::record::validate_record;

// ============================================================================
// SECTION: Contract
// ============================================================================

/// Receipt returned by a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertReceipt {
    /// Table the record was written to.
    pub table: TableName,
    /// Store-assigned identifier of the new record.
    pub id: i64,
}

/// Count summary for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Summarized table.
    pub table: TableName,
    /// Total number of stored records.
    pub total_records: u64,
}

/// Append-only record store shared by all tool calls in a process.
///
/// # Invariants
/// - Inserts commit before returning; identifiers are unique per table.
/// - `query_recent` orders by identifier descending.
pub trait RecordStore: Send + Sync {
    /// Inserts a validated record and returns the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the record does not match
    /// the table schema and [`ServiceError::Storage`] on backend failure.
    fn insert(&self, table: TableName, record: &NewRecord) -> Result<InsertReceipt, ServiceError>;

    /// Returns up to `limit` records, most recently inserted first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] on backend failure.
    fn query_recent(
        &self,
        table: TableName,
        limit: u32,
    ) -> Result<Vec<StoredRecord>, ServiceError>;

    /// Returns the record count summary for a table.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] on backend failure.
    fn count_summary(&self, table: TableName) -> Result<TableSummary, ServiceError>;
}

/// Shared handle to a record store implementation.
pub type SharedRecordStore = std::sync::Arc<dyn RecordStore>;

/// Returns the current unix timestamp in milliseconds.
#[must_use]
pub fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Per-table rows and identifier counter.
#[derive(Debug, Default)]
struct TableRows {
    /// Next identifier to assign.
    next_id: i64,
    /// Stored records in insertion order.
    rows: Vec<StoredRecord>,
}

/// In-memory record store for tests and ephemeral deployments.
///
/// # Invariants
/// - All access is serialized through a single mutex.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    /// Rows per whitelisted table.
    tables: Mutex<BTreeMap<TableName, TableRows>>,
}

impl InMemoryRecordStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, table: TableName, record: &NewRecord) -> Result<InsertReceipt, ServiceError> {
        validate_record(table, record)?;
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = tables.entry(table).or_default();
        entry.next_id += 1;
        let id = entry.next_id;
        entry.rows.push(StoredRecord {
            id,
            created_at: unix_millis(),
            values: record.clone(),
        });
        Ok(InsertReceipt {
            table,
            id,
        })
    }

    fn query_recent(
        &self,
        table: TableName,
        limit: u32,
    ) -> Result<Vec<StoredRecord>, ServiceError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let rows = tables.get(&table).map_or(&[] as &[StoredRecord], |entry| &entry.rows);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.iter().rev().take(limit).cloned().collect())
    }

    fn count_summary(&self, table: TableName) -> Result<TableSummary, ServiceError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let total = tables.get(&table).map_or(0, |entry| entry.rows.len());
        Ok(TableSummary {
            table,
            total_records: u64::try_from(total).unwrap_or(u64::MAX),
        })
    }
}
