// crates/data-console-core/src/tabular/tests.rs
// ============================================================================
// Module: Tabular Analyzer Tests
// Description: Parsing, summary, and numeric-aware filter tests.
// Purpose: Validate structural rejection and filter coercion semantics.
// Dependencies: data-console-core, tempfile
// ============================================================================

//! ## Overview
//! Exercises the delimited parser edge cases, the summary statistics, the
//! numeric-aware equality used by filtering, and idempotence of repeated
//! analysis over an unchanged file.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::fs;

use tempfile::TempDir;

use super::Dataset;
use super::filter_csv;
use super::summarize_csv;
use crate::error::ServiceError;
use crate::sandbox::DataRoot;

/// Sample file with three Food rows among ten.
const SALES_CSV: &str = "\
Item,Category,Amount
apple,Food,1.50
desk,Furniture,120
bread,Food,2.25
lamp,Furniture,40
monitor,Electronics,230
rice,Food,3.10
chair,Furniture,55
cable,Electronics,9
mouse,Electronics,19
stand,Furniture,25
";

/// Builds a data root containing one CSV file.
fn root_with_csv(content: &str) -> (TempDir, DataRoot) {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("sample.csv"), content).expect("write csv");
    let root = DataRoot::open(dir.path()).expect("open root");
    (dir, root)
}

#[test]
fn summarize_counts_rows_columns_and_missing() {
    let content = "A,B\n1,\n2,x\n3,\n4,y\n5,z\n";
    let (_dir, root) = root_with_csv(content);
    let summary = summarize_csv(&root, "sample.csv").expect("summary");
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.columns, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(summary.missing_values.get("A"), Some(&0));
    assert_eq!(summary.missing_values.get("B"), Some(&2));
}

#[test]
fn summarize_is_idempotent() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let first = summarize_csv(&root, "sample.csv").expect("summary");
    let second = summarize_csv(&root, "sample.csv").expect("summary");
    assert_eq!(first, second);
}

#[test]
fn parse_rejects_inconsistent_column_count() {
    let err = Dataset::parse("A,B\n1,2,3\n").expect_err("must fail");
    let ServiceError::Validation(message) = err else {
        panic!("expected validation error");
    };
    assert!(message.contains("row 2"), "{message}");
}

#[test]
fn parse_rejects_duplicate_headers() {
    assert!(matches!(
        Dataset::parse("A,A\n1,2\n"),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn parse_rejects_empty_content() {
    assert!(matches!(Dataset::parse(""), Err(ServiceError::Validation(_))));
}

#[test]
fn parse_rejects_unterminated_quote() {
    assert!(matches!(
        Dataset::parse("A,B\n\"open,2\n"),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn parse_handles_quotes_crlf_and_blank_lines() {
    let dataset =
        Dataset::parse("A,B\r\n\"x,y\",\"say \"\"hi\"\"\"\r\n\r\n1,2\r\n").expect("parse");
    assert_eq!(dataset.row_count(), 2);
    let result = dataset.filter("A", "x,y").expect("filter");
    assert_eq!(result.rows_found, 1);
    assert_eq!(
        result.preview[0].get("B"),
        Some(&serde_json::Value::String("say \"hi\"".to_string()))
    );
}

#[test]
fn filter_matches_category_food() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let result = filter_csv(&root, "sample.csv", "Category", "Food").expect("filter");
    assert_eq!(result.rows_found, 3);
    assert_eq!(result.preview.len(), 3);
    for row in &result.preview {
        assert_eq!(row.get("Category"), Some(&serde_json::Value::String("Food".to_string())));
    }
}

#[test]
fn filter_preview_caps_at_five_rows() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let result = filter_csv(&root, "sample.csv", "Item", "apple").expect("filter");
    assert_eq!(result.rows_found, 1);
    let mut many = String::from("Item,Category,Amount\n");
    for index in 0 .. 8 {
        many.push_str(&format!("thing{index},Bulk,{index}\n"));
    }
    let dataset = Dataset::parse(&many).expect("parse");
    let bulk = dataset.filter("Category", "Bulk").expect("filter");
    assert_eq!(bulk.rows_found, 8);
    assert_eq!(bulk.preview.len(), 5);
}

#[test]
fn filter_compares_numeric_columns_by_value() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let result = filter_csv(&root, "sample.csv", "Amount", "120").expect("filter");
    assert_eq!(result.rows_found, 1);
    let padded = filter_csv(&root, "sample.csv", "Amount", "120.0").expect("filter");
    assert_eq!(padded.rows_found, 1);
}

#[test]
fn filter_rejects_unknown_column() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let err = filter_csv(&root, "sample.csv", "Region", "North").expect_err("must fail");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn filter_is_idempotent() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let first = filter_csv(&root, "sample.csv", "Category", "Food").expect("filter");
    let second = filter_csv(&root, "sample.csv", "Category", "Food").expect("filter");
    assert_eq!(first, second);
}

#[test]
fn missing_file_is_not_found() {
    let (_dir, root) = root_with_csv(SALES_CSV);
    let err = summarize_csv(&root, "absent.csv").expect_err("must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
