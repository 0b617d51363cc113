// crates/data-console-core/src/sandbox.rs
// ============================================================================
// Module: Path Sandbox
// Description: Resolves filenames inside a fixed data-root directory.
// Purpose: Guarantee no file operation escapes the configured data root.
// Dependencies: data-console-core::error
// ============================================================================

//! ## Overview
//! The sandbox owns the single data-root directory fixed at process start.
//! Filenames are joined to the root and canonicalized before a containment
//! check on the canonical result, so traversal via `..`, symlinks, or
//! absolute-path injection fails regardless of how it is spelled. Resolution
//! is idempotent and never mutates the filesystem.

use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::error::ServiceError;

/// Failure message for the containment check.
const OUTSIDE_ROOT_MESSAGE: &str = "Access outside data directory is forbidden";
/// Failure message for the parent-directory fast reject.
const TRAVERSAL_MESSAGE: &str = "Directory traversal detected";

/// The data-root directory every file operation is confined to.
///
/// # Invariants
/// - `root` is canonical (absolute, symlinks resolved) from construction on.
/// - The root is fixed for the lifetime of the value; no runtime mutation.
#[derive(Debug, Clone)]
pub struct DataRoot {
    /// Canonicalized root directory path.
    root: PathBuf,
}

impl DataRoot {
    /// Opens a data root, canonicalizing the directory path.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::FileAccess`] when the path does not exist or
    /// is not a directory.
    pub fn open(path: &Path) -> Result<Self, ServiceError> {
        let root = fs::canonicalize(path).map_err(|err| {
            ServiceError::FileAccess(format!("data root unavailable: {err}"))
        })?;
        if !root.is_dir() {
            return Err(ServiceError::FileAccess(
                "data root must be a directory".to_string(),
            ));
        }
        Ok(Self {
            root,
        })
    }

    /// Returns the canonical root directory path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.root
    }

    /// Resolves a requested filename to a canonical path inside the root.
    ///
    /// The `..` fast reject runs before any filesystem access; the
    /// containment check runs on the canonicalized result, not the raw
    /// joined string, so encoded separators and symlink escapes fail too.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::FileAccess`] for traversal attempts or paths
    /// resolving outside the root, and [`ServiceError::NotFound`] when the
    /// requested file does not exist.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ServiceError> {
        let requested = Path::new(filename);
        if requested.components().any(|component| component == Component::ParentDir) {
            return Err(ServiceError::FileAccess(TRAVERSAL_MESSAGE.to_string()));
        }
        let joined = self.root.join(requested);
        let resolved = fs::canonicalize(&joined).map_err(|err| map_resolve_error(&err))?;
        if !resolved.starts_with(&self.root) {
            return Err(ServiceError::FileAccess(OUTSIDE_ROOT_MESSAGE.to_string()));
        }
        Ok(resolved)
    }

    /// Lists the regular files directly under the root, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>, ServiceError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|err| ServiceError::Storage(format!("failed to list data root: {err}")))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|err| ServiceError::Storage(format!("failed to list data root: {err}")))?;
            let file_type = entry
                .file_type()
                .map_err(|err| ServiceError::Storage(format!("failed to list data root: {err}")))?;
            if file_type.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Maps canonicalization failures onto the service taxonomy.
fn map_resolve_error(err: &io::Error) -> ServiceError {
    if err.kind() == io::ErrorKind::NotFound {
        ServiceError::NotFound("File not found".to_string())
    } else {
        ServiceError::FileAccess(OUTSIDE_ROOT_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests;
