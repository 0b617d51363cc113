// crates/data-console-core/src/sandbox/tests.rs
// ============================================================================
// Module: Path Sandbox Tests
// Description: Containment tests for data-root resolution.
// Purpose: Validate every traversal representation fails closed.
// Dependencies: data-console-core, tempfile, proptest
// ============================================================================

//! ## Overview
//! Covers `..` fast rejects, absolute-path injection, symlink escape,
//! containment after canonicalization, and resolution idempotence.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;

use super::DataRoot;
use crate::error::ServiceError;

/// Builds a data root containing one known file.
fn root_with_file(name: &str, content: &str) -> (TempDir, DataRoot) {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(name), content).expect("write file");
    let root = DataRoot::open(dir.path()).expect("open root");
    (dir, root)
}

#[test]
fn resolves_plain_filename() {
    let (_dir, root) = root_with_file("notes.txt", "hello");
    let resolved = root.resolve("notes.txt").expect("resolve");
    assert!(resolved.starts_with(root.as_path()));
    assert!(resolved.ends_with("notes.txt"));
}

#[test]
fn resolve_is_idempotent() {
    let (_dir, root) = root_with_file("notes.txt", "hello");
    let first = root.resolve("notes.txt").expect("resolve");
    let second = root.resolve("notes.txt").expect("resolve");
    assert_eq!(first, second);
}

#[test]
fn rejects_parent_dir_segments() {
    let (_dir, root) = root_with_file("notes.txt", "hello");
    for candidate in [
        "../etc/passwd",
        "..",
        "a/../../b.txt",
        "nested/../../escape.txt",
        "./../notes.txt",
    ] {
        let err = root.resolve(candidate).expect_err("must fail");
        assert!(matches!(err, ServiceError::FileAccess(_)), "{candidate} -> {err:?}");
        assert_eq!(err.kind(), "file_access");
    }
}

#[test]
fn rejects_absolute_path_injection() {
    let (_dir, root) = root_with_file("notes.txt", "hello");
    let outside = TempDir::new().expect("tempdir");
    fs::write(outside.path().join("secret.txt"), "secret").expect("write file");
    let absolute = outside.path().join("secret.txt");
    let err = root.resolve(&absolute.display().to_string()).expect_err("must fail");
    assert!(matches!(err, ServiceError::FileAccess(_)));
}

#[cfg(unix)]
#[test]
fn rejects_symlink_escape() {
    let (dir, root) = root_with_file("notes.txt", "hello");
    let outside = TempDir::new().expect("tempdir");
    fs::write(outside.path().join("secret.txt"), "secret").expect("write file");
    std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("link.txt"))
        .expect("symlink");
    let err = root.resolve("link.txt").expect_err("must fail");
    assert!(matches!(err, ServiceError::FileAccess(_)));
}

#[test]
fn missing_file_is_not_found() {
    let (_dir, root) = root_with_file("notes.txt", "hello");
    let err = root.resolve("absent.txt").expect_err("must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn open_rejects_missing_root() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("nope");
    assert!(matches!(DataRoot::open(&missing), Err(ServiceError::FileAccess(_))));
}

#[test]
fn list_returns_sorted_files_only() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("b.txt"), "b").expect("write");
    fs::write(dir.path().join("a.txt"), "a").expect("write");
    fs::create_dir(dir.path().join("sub")).expect("mkdir");
    let root = DataRoot::open(dir.path()).expect("open root");
    assert_eq!(root.list().expect("list"), vec!["a.txt".to_string(), "b.txt".to_string()]);
}

proptest! {
    #[test]
    fn any_parent_dir_spelling_fails(prefix in "[a-z]{0,8}", suffix in "[a-z]{0,8}") {
        let (_dir, root) = root_with_file("notes.txt", "hello");
        let candidate = format!("{prefix}/../{suffix}");
        let err = root.resolve(&candidate).expect_err("must fail");
        prop_assert!(matches!(err, ServiceError::FileAccess(_)));
    }
}
