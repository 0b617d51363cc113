// crates/data-console-mcp/src/format.rs
// ============================================================================
// Module: Response Formatter
// Description: Renders service results as markdown or structured JSON.
// Purpose: Convert identical payloads into the caller-selected format.
// Dependencies: data-console-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Each service result kind renders in two modes: `json` is a lossless,
//! re-parseable serialization of the payload, `markdown` is a human-oriented
//! report specific to the kind. The formatter performs no validation; a
//! payload that cannot serialize is a programming error, not a recoverable
//! service failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use data_console_core::CsvFilter;
use data_console_core::CsvSummary;
use data_console_core::FileContent;
use data_console_core::FileListing;
use data_console_core::InsertReceipt;
use data_console_core::TableSummary;
use data_console_core::WeatherReport;
use data_console_core::record::NewRecord;
use data_console_core::record::StoredRecord;
use data_console_core::record::TableName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Format Selection
// ============================================================================

/// Output format options for tool replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Human-readable markdown report.
    #[default]
    Markdown,
    /// Machine-readable JSON serialization.
    Json,
}

/// Formatter failure.
///
/// # Invariants
/// - Only reachable through payload serialization bugs, never caller input.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Payload serialization failed.
    #[error("response serialization failed")]
    Serialization,
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Structured result payloads produced by the services.
#[derive(Debug, Clone)]
pub enum ReplyPayload {
    /// Synthetic weather report.
    Weather(WeatherReport),
    /// Data-root file listing.
    FileList(FileListing),
    /// File contents.
    FileContent(FileContent),
    /// CSV summary statistics.
    CsvSummary(CsvSummary),
    /// CSV filter result.
    CsvFilter(CsvFilter),
    /// Recent database records.
    DbRecords {
        /// Queried table.
        table: TableName,
        /// Records, newest first.
        records: Vec<StoredRecord>,
    },
    /// Table count summary.
    DbSummary(TableSummary),
    /// Insert confirmation echoing the submitted data.
    Inserted {
        /// Insert receipt with the assigned identifier.
        receipt: InsertReceipt,
        /// Echo of the submitted record.
        data: NewRecord,
    },
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a payload in the requested format.
///
/// # Errors
///
/// Returns [`FormatError::Serialization`] when JSON serialization fails;
/// this indicates a payload shape bug rather than bad caller input.
pub fn render(payload: &ReplyPayload, format: ResponseFormat) -> Result<String, FormatError> {
    match format {
        ResponseFormat::Json => render_json(payload),
        ResponseFormat::Markdown => Ok(render_markdown(payload)),
    }
}

/// Renders the lossless JSON form of a payload.
fn render_json(payload: &ReplyPayload) -> Result<String, FormatError> {
    let value = match payload {
        ReplyPayload::Weather(report) => {
            serde_json::to_value(report).map_err(|_| FormatError::Serialization)?
        }
        ReplyPayload::FileList(listing) => {
            serde_json::to_value(listing).map_err(|_| FormatError::Serialization)?
        }
        ReplyPayload::FileContent(content) => {
            serde_json::to_value(content).map_err(|_| FormatError::Serialization)?
        }
        ReplyPayload::CsvSummary(summary) => {
            serde_json::to_value(summary).map_err(|_| FormatError::Serialization)?
        }
        ReplyPayload::CsvFilter(filter) => {
            serde_json::to_value(filter).map_err(|_| FormatError::Serialization)?
        }
        ReplyPayload::DbRecords {
            table,
            records,
        } => json!({"table": table, "records": records}),
        ReplyPayload::DbSummary(summary) => {
            serde_json::to_value(summary).map_err(|_| FormatError::Serialization)?
        }
        ReplyPayload::Inserted {
            receipt,
            data,
        } => json!({"table": receipt.table, "id": receipt.id, "data": data}),
    };
    serde_json::to_string_pretty(&value).map_err(|_| FormatError::Serialization)
}

/// Renders the narrative markdown form of a payload.
fn render_markdown(payload: &ReplyPayload) -> String {
    match payload {
        ReplyPayload::Weather(report) => render_weather(report),
        ReplyPayload::FileList(listing) => render_file_list(listing),
        ReplyPayload::FileContent(content) => render_file_content(content),
        ReplyPayload::CsvSummary(summary) => render_csv_summary(summary),
        ReplyPayload::CsvFilter(filter) => render_csv_filter(filter),
        ReplyPayload::DbRecords {
            table,
            records,
        } => render_db_records(*table, records),
        ReplyPayload::DbSummary(summary) => render_db_summary(summary),
        ReplyPayload::Inserted {
            receipt,
            data,
        } => render_inserted(receipt, data),
    }
}

/// Renders a weather report block.
fn render_weather(report: &WeatherReport) -> String {
    format!(
        "# Weather for {}\n\n**Temperature:** {}°C\n**Humidity:** {}%\n**Condition:** {}\n",
        report.city,
        report.temperature_celsius,
        report.humidity,
        report.condition.as_str()
    )
}

/// Renders an itemized file listing.
fn render_file_list(listing: &FileListing) -> String {
    if listing.files.is_empty() {
        return "# Files in Data Directory\n\n**No files found**\n".to_string();
    }
    let mut out = String::from("# Files in Data Directory\n\n");
    for file in &listing.files {
        let _ = writeln!(out, "- {file}");
    }
    let _ = write!(out, "\n**Total:** {} file(s)\n", listing.files.len());
    out
}

/// Renders file contents with line and character counts.
fn render_file_content(content: &FileContent) -> String {
    let line_count = content.content.lines().count();
    let char_count = content.content.chars().count();
    format!(
        "# File: {}\n\n**Lines:** {line_count} | **Characters:** {char_count}\n\n---\n\n{}",
        content.filename, content.content
    )
}

/// Renders CSV summary statistics.
fn render_csv_summary(summary: &CsvSummary) -> String {
    let mut out = format!("# CSV File Summary\n\n**Total Rows:** {}\n\n", summary.rows);
    let _ = writeln!(out, "## Columns ({})", summary.columns.len());
    for column in &summary.columns {
        let _ = writeln!(out, "- {column}");
    }
    out.push_str("\n## Missing Values\n");
    for column in &summary.columns {
        let missing = summary.missing_values.get(column).copied().unwrap_or(0);
        let _ = writeln!(out, "- **{column}:** {missing}");
    }
    out
}

/// Renders CSV filter results with a preview table.
fn render_csv_filter(filter: &CsvFilter) -> String {
    let mut out = format!("# Filter Results\n\n**Rows Found:** {}\n", filter.rows_found);
    let Some(first) = filter.preview.first() else {
        out.push_str("\n**No matching rows**\n");
        return out;
    };
    out.push_str("\n## Preview (first 5 rows)\n\n");
    let headers: Vec<&String> = first.keys().collect();
    let _ = writeln!(
        out,
        "| {} |",
        headers.iter().map(|header| header.as_str()).collect::<Vec<_>>().join(" | ")
    );
    let _ = writeln!(out, "| {} |", vec!["---"; headers.len()].join(" | "));
    for row in &filter.preview {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| row.get(*header).map_or_else(String::new, json_cell))
            .collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

/// Renders recent database records as a table.
fn render_db_records(table: TableName, records: &[StoredRecord]) -> String {
    if records.is_empty() {
        return format!("# {table}\n\n**No records found**\n");
    }
    let mut out = format!("# {table} Records\n\n**Count:** {} record(s)\n\n", records.len());
    let mut headers = vec!["id", "created_at"];
    headers.extend_from_slice(table.columns());
    let _ = writeln!(out, "| {} |", headers.join(" | "));
    let _ = writeln!(out, "| {} |", vec!["---"; headers.len()].join(" | "));
    for record in records {
        let mut cells = vec![record.id.to_string(), record.created_at.to_string()];
        for column in table.columns() {
            let cell = record
                .values
                .get(*column)
                .and_then(|value| serde_json::to_value(value).ok())
                .map_or_else(String::new, |value| json_cell(&value));
            cells.push(cell);
        }
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

/// Renders a table count summary.
fn render_db_summary(summary: &TableSummary) -> String {
    format!(
        "# {} Summary\n\n**Total Records:** {}\n",
        summary.table, summary.total_records
    )
}

/// Renders an insert confirmation with the echoed record.
fn render_inserted(receipt: &InsertReceipt, data: &NewRecord) -> String {
    let echoed = serde_json::to_string_pretty(data)
        .unwrap_or_else(|_| "<unserializable record>".to_string());
    format!(
        "Successfully inserted record {} into {}\n\nData:\n{echoed}\n",
        receipt.id, receipt.table
    )
}

/// Renders a JSON scalar as a table cell.
fn json_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests;
