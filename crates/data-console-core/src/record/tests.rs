// crates/data-console-core/src/record/tests.rs
// ============================================================================
// Module: Record Model Tests
// Description: Whitelist and schema-match tests for the record model.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::collections::BTreeMap;

use super::FieldValue;
use super::NewRecord;
use super::TableName;
use super::validate_record;
use crate::error::ServiceError;

/// Builds a valid weather_logs record.
fn weather_record() -> NewRecord {
    let mut record = BTreeMap::new();
    record.insert("city".to_string(), FieldValue::Text("Chennai".to_string()));
    record.insert("temperature".to_string(), FieldValue::Integer(34));
    record.insert("condition".to_string(), FieldValue::Text("Sunny".to_string()));
    record
}

#[test]
fn parse_round_trips_whitelisted_names() {
    for table in TableName::all() {
        assert_eq!(TableName::parse(table.as_str()), Some(*table));
    }
}

#[test]
fn parse_rejects_unknown_tables() {
    assert_eq!(TableName::parse("users"), None);
    assert_eq!(TableName::parse("weather_logs; DROP TABLE reports"), None);
    assert_eq!(TableName::parse(""), None);
    assert_eq!(TableName::parse("WEATHER_LOGS"), None);
}

#[test]
fn validate_accepts_exact_schema_match() {
    assert!(validate_record(TableName::WeatherLogs, &weather_record()).is_ok());
}

#[test]
fn validate_rejects_missing_column() {
    let mut record = weather_record();
    record.remove("condition");
    let err = validate_record(TableName::WeatherLogs, &record).expect_err("must fail");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn validate_rejects_unknown_column() {
    let mut record = weather_record();
    record.insert("id".to_string(), FieldValue::Integer(99));
    let err = validate_record(TableName::WeatherLogs, &record).expect_err("must fail");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn field_values_deserialize_from_scalars() {
    let record: NewRecord = serde_json::from_value(serde_json::json!({
        "city": "Chennai",
        "temperature": 34,
        "condition": "Sunny",
    }))
    .expect("decode");
    assert_eq!(record.get("temperature"), Some(&FieldValue::Integer(34)));
    assert_eq!(record.get("city"), Some(&FieldValue::Text("Chennai".to_string())));
}

#[test]
fn field_values_reject_nested_structures() {
    let result: Result<NewRecord, _> = serde_json::from_value(serde_json::json!({
        "city": {"name": "Chennai"},
        "temperature": 34,
        "condition": "Sunny",
    }));
    assert!(result.is_err());
}
