// crates/data-console-store-sqlite/src/lib.rs
// ============================================================================
// Module: Data Console SQLite Store
// Description: Durable RecordStore backed by SQLite.
// Purpose: Persist append-only records with static per-table statements.
// Dependencies: data-console-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate implements a durable [`data_console_core::RecordStore`] using
//! `SQLite`. SQL text is fully static per whitelisted table; caller data is
//! only ever bound as parameters. Each call owns its own connection, so
//! concurrent callers never share connection state.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod store;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteJournalMode;
pub use store::SqliteRecordStore;
pub use store::SqliteRecordStoreError;
pub use store::SqliteStoreConfig;
pub use store::SqliteSyncMode;
