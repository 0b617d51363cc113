// crates/data-console-core/src/validate/tests.rs
// ============================================================================
// Module: Input Validator Tests
// Description: Boundary tests for tool parameter validation.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use super::validate_city;
use super::validate_column;
use super::validate_filename;
use super::validate_limit;
use crate::error::ServiceError;

#[test]
fn city_rejects_empty_and_whitespace() {
    assert!(matches!(validate_city(""), Err(ServiceError::Validation(_))));
    assert!(matches!(validate_city("   "), Err(ServiceError::Validation(_))));
}

#[test]
fn city_rejects_overlong() {
    let city = "x".repeat(101);
    assert!(matches!(validate_city(&city), Err(ServiceError::Validation(_))));
    assert!(validate_city(&"x".repeat(100)).is_ok());
}

#[test]
fn city_accepts_plain_names() {
    assert!(validate_city("Chennai").is_ok());
    assert!(validate_city("Rio de Janeiro").is_ok());
}

#[test]
fn filename_rejects_empty_and_overlong() {
    assert!(matches!(validate_filename(""), Err(ServiceError::Validation(_))));
    let name = "a".repeat(256);
    assert!(matches!(validate_filename(&name), Err(ServiceError::Validation(_))));
    assert!(validate_filename(&"a".repeat(255)).is_ok());
}

#[test]
fn column_rejects_empty() {
    assert!(matches!(validate_column(""), Err(ServiceError::Validation(_))));
    assert!(validate_column("Category").is_ok());
}

#[test]
fn limit_bounds_are_inclusive() {
    assert_eq!(validate_limit(1).unwrap(), 1);
    assert_eq!(validate_limit(100).unwrap(), 100);
    assert!(matches!(validate_limit(0), Err(ServiceError::Validation(_))));
    assert!(matches!(validate_limit(-5), Err(ServiceError::Validation(_))));
    assert!(matches!(validate_limit(101), Err(ServiceError::Validation(_))));
}
