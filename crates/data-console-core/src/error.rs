// crates/data-console-core/src/error.rs
// ============================================================================
// Module: Service Error Taxonomy
// Description: Tagged failure type shared by every Data Console service.
// Purpose: Keep failure kinds explicit so the gateway never sees raw faults.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every service call returns `Result<T, ServiceError>`. The gateway consumes
//! the tagged variants explicitly and converts them into textual failure
//! replies; nothing in this taxonomy is fatal to the process.

use thiserror::Error;

/// Tagged failure returned by every Data Console service call.
///
/// # Invariants
/// - Variants are stable for failure classification in replies and audit.
/// - Messages are human-readable and safe to echo to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or disallowed input (table name, column, limit, empty field).
    #[error("{0}")]
    Validation(String),
    /// Referenced file or record is absent.
    #[error("{0}")]
    NotFound(String),
    /// Sandbox violation: traversal or resolved path outside the data root.
    #[error("{0}")]
    FileAccess(String),
    /// Storage backend failure (I/O, database engine).
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    /// Returns a stable kind label for failure replies and audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::FileAccess(_) => "file_access",
            Self::Storage(_) => "storage",
        }
    }
}
