// crates/data-console-core/src/files.rs
// ============================================================================
// Module: File Service
// Description: Sandboxed file listing and reading inside the data root.
// Purpose: Expose read-only file access through the path sandbox.
// Dependencies: data-console-core::sandbox, serde
// ============================================================================

//! ## Overview
//! Listing enumerates regular files directly under the data root; reading
//! resolves the filename through the sandbox first, so every access is
//! confined to the root. Both operations are read-only.

use std::fs;
use std::io;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ServiceError;
use crate::sandbox::DataRoot;
use crate::validate::validate_filename;

/// Filenames available under the data root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    /// Sorted filenames.
    pub files: Vec<String>,
}

/// Contents of a single file under the data root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Requested filename as supplied by the caller.
    pub filename: String,
    /// Complete file contents.
    pub content: String,
}

/// Lists the files available under the data root.
///
/// # Errors
///
/// Returns [`ServiceError::Storage`] when the directory cannot be read.
pub fn list_files(root: &DataRoot) -> Result<FileListing, ServiceError> {
    Ok(FileListing {
        files: root.list()?,
    })
}

/// Reads a file from the data root.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for malformed filenames,
/// [`ServiceError::FileAccess`] for sandbox violations,
/// [`ServiceError::NotFound`] when the file is absent, and
/// [`ServiceError::Storage`] for other read failures.
pub fn read_file(root: &DataRoot, filename: &str) -> Result<FileContent, ServiceError> {
    validate_filename(filename)?;
    let path = root.resolve(filename)?;
    if !path.is_file() {
        return Err(ServiceError::FileAccess(
            "requested path is not a regular file".to_string(),
        ));
    }
    let content = fs::read_to_string(&path).map_err(|err| map_read_error(&err))?;
    Ok(FileContent {
        filename: filename.to_string(),
        content,
    })
}

/// Maps read failures onto the service taxonomy.
fn map_read_error(err: &io::Error) -> ServiceError {
    if err.kind() == io::ErrorKind::NotFound {
        ServiceError::NotFound("File not found".to_string())
    } else {
        ServiceError::Storage(format!("failed to read file: {err}"))
    }
}

#[cfg(test)]
mod tests;
