// crates/data-console-core/src/files/tests.rs
// ============================================================================
// Module: File Service Tests
// Description: Listing and sandboxed read tests.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::fs;

use tempfile::TempDir;

use super::list_files;
use super::read_file;
use crate::error::ServiceError;
use crate::sandbox::DataRoot;

/// Builds a data root with a couple of files.
fn sample_root() -> (TempDir, DataRoot) {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("notes.txt"), "line one\nline two\n").expect("write");
    fs::write(dir.path().join("sample.csv"), "A,B\n1,2\n").expect("write");
    let root = DataRoot::open(dir.path()).expect("open root");
    (dir, root)
}

#[test]
fn listing_is_sorted() {
    let (_dir, root) = sample_root();
    let listing = list_files(&root).expect("list");
    assert_eq!(listing.files, vec!["notes.txt".to_string(), "sample.csv".to_string()]);
}

#[test]
fn read_returns_full_contents() {
    let (_dir, root) = sample_root();
    let content = read_file(&root, "notes.txt").expect("read");
    assert_eq!(content.filename, "notes.txt");
    assert_eq!(content.content, "line one\nline two\n");
}

#[test]
fn read_missing_file_is_not_found() {
    let (_dir, root) = sample_root();
    assert!(matches!(read_file(&root, "absent.txt"), Err(ServiceError::NotFound(_))));
}

#[test]
fn read_rejects_traversal() {
    let (_dir, root) = sample_root();
    assert!(matches!(
        read_file(&root, "../outside.txt"),
        Err(ServiceError::FileAccess(_))
    ));
}

#[test]
fn read_rejects_directories() {
    let (dir, root) = sample_root();
    fs::create_dir(dir.path().join("sub")).expect("mkdir");
    assert!(matches!(read_file(&root, "sub"), Err(ServiceError::FileAccess(_))));
}
