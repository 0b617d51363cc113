// crates/data-console-mcp/src/format/tests.rs
// ============================================================================
// Module: Response Formatter Tests
// Description: Markdown and JSON rendering tests per payload kind.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::collections::BTreeMap;

use data_console_core::CsvFilter;
use data_console_core::CsvSummary;
use data_console_core::FileContent;
use data_console_core::FileListing;
use data_console_core::InsertReceipt;
use data_console_core::TableSummary;
use data_console_core::WeatherReport;
use data_console_core::record::FieldValue;
use data_console_core::record::StoredRecord;
use data_console_core::record::TableName;
use data_console_core::weather::WeatherCondition;

use super::ReplyPayload;
use super::ResponseFormat;
use super::render;

/// Sample weather payload.
fn weather_payload() -> ReplyPayload {
    ReplyPayload::Weather(WeatherReport {
        city: "Chennai".to_string(),
        temperature_celsius: 34.25,
        humidity: 61,
        condition: WeatherCondition::Sunny,
    })
}

#[test]
fn weather_markdown_has_labeled_block() {
    let text = render(&weather_payload(), ResponseFormat::Markdown).expect("render");
    assert!(text.contains("# Weather for Chennai"));
    assert!(text.contains("**Temperature:** 34.25°C"));
    assert!(text.contains("**Condition:** Sunny"));
}

#[test]
fn weather_json_is_reparseable() {
    let text = render(&weather_payload(), ResponseFormat::Json).expect("render");
    let value: serde_json::Value = serde_json::from_str(&text).expect("reparse");
    assert_eq!(value["city"], "Chennai");
    assert_eq!(value["humidity"], 61);
}

#[test]
fn empty_file_list_has_placeholder() {
    let payload = ReplyPayload::FileList(FileListing {
        files: Vec::new(),
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("**No files found**"));
}

#[test]
fn file_list_markdown_itemizes_files() {
    let payload = ReplyPayload::FileList(FileListing {
        files: vec!["a.txt".to_string(), "b.csv".to_string()],
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("- a.txt"));
    assert!(text.contains("**Total:** 2 file(s)"));
}

#[test]
fn file_content_markdown_counts_lines_and_chars() {
    let payload = ReplyPayload::FileContent(FileContent {
        filename: "notes.txt".to_string(),
        content: "one\ntwo\n".to_string(),
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("# File: notes.txt"));
    assert!(text.contains("**Lines:** 2 | **Characters:** 8"));
    assert!(text.ends_with("one\ntwo\n"));
}

#[test]
fn csv_summary_markdown_lists_columns_and_missing() {
    let mut missing_values = BTreeMap::new();
    missing_values.insert("A".to_string(), 0);
    missing_values.insert("B".to_string(), 2);
    let payload = ReplyPayload::CsvSummary(CsvSummary {
        rows: 5,
        columns: vec!["A".to_string(), "B".to_string()],
        missing_values,
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("**Total Rows:** 5"));
    assert!(text.contains("## Columns (2)"));
    assert!(text.contains("- **B:** 2"));
}

#[test]
fn csv_filter_markdown_renders_preview_table() {
    let mut row = BTreeMap::new();
    row.insert("Category".to_string(), serde_json::Value::String("Food".to_string()));
    row.insert("Item".to_string(), serde_json::Value::String("apple".to_string()));
    let payload = ReplyPayload::CsvFilter(CsvFilter {
        rows_found: 3,
        preview: vec![row],
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("**Rows Found:** 3"));
    assert!(text.contains("| Category | Item |"));
    assert!(text.contains("| Food | apple |"));
}

#[test]
fn csv_filter_markdown_handles_no_matches() {
    let payload = ReplyPayload::CsvFilter(CsvFilter {
        rows_found: 0,
        preview: Vec::new(),
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("**No matching rows**"));
}

#[test]
fn db_records_markdown_uses_schema_column_order() {
    let mut values = BTreeMap::new();
    values.insert("city".to_string(), FieldValue::Text("Chennai".to_string()));
    values.insert("temperature".to_string(), FieldValue::Integer(34));
    values.insert("condition".to_string(), FieldValue::Text("Sunny".to_string()));
    let payload = ReplyPayload::DbRecords {
        table: TableName::WeatherLogs,
        records: vec![StoredRecord {
            id: 7,
            created_at: 1_700_000_000_000,
            values,
        }],
    };
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("| id | created_at | city | temperature | condition |"));
    assert!(text.contains("| 7 | 1700000000000 | Chennai | 34 | Sunny |"));
}

#[test]
fn db_records_json_round_trips() {
    let payload = ReplyPayload::DbRecords {
        table: TableName::Reports,
        records: Vec::new(),
    };
    let text = render(&payload, ResponseFormat::Json).expect("render");
    let value: serde_json::Value = serde_json::from_str(&text).expect("reparse");
    assert_eq!(value["table"], "reports");
    assert!(value["records"].as_array().expect("records").is_empty());
}

#[test]
fn db_summary_markdown_reports_total() {
    let payload = ReplyPayload::DbSummary(TableSummary {
        table: TableName::FileLogs,
        total_records: 42,
    });
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("# file_logs Summary"));
    assert!(text.contains("**Total Records:** 42"));
}

#[test]
fn inserted_markdown_echoes_data() {
    let mut data = BTreeMap::new();
    data.insert("report_name".to_string(), FieldValue::Text("q1".to_string()));
    data.insert("content".to_string(), FieldValue::Text("body".to_string()));
    let payload = ReplyPayload::Inserted {
        receipt: InsertReceipt {
            table: TableName::Reports,
            id: 3,
        },
        data,
    };
    let text = render(&payload, ResponseFormat::Markdown).expect("render");
    assert!(text.contains("Successfully inserted record 3 into reports"));
    assert!(text.contains("\"report_name\": \"q1\""));
}
