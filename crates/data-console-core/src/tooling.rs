// crates/data-console-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical MCP tool identifiers and definitions for Data Console.
// Purpose: Shared tool naming across the gateway, server, and CLI.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Canonical tool identifiers used by the Data Console MCP gateway. These
//! names and schemas are part of the external contract surface; the order is
//! preserved in tool listings to keep diffs stable. Append new tools at the
//! end.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

/// Canonical tool names for the Data Console MCP gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Generate a synthetic weather report for a city.
    GetWeather,
    /// List files available under the data root.
    ListFiles,
    /// Read a file from the data root.
    ReadFile,
    /// Summarize a CSV file (rows, columns, missing values).
    SummarizeCsv,
    /// Filter a CSV file by column equality.
    FilterCsv,
    /// Insert a record into a whitelisted table.
    InsertDatabaseRecord,
    /// Query the most recent records from a whitelisted table.
    QueryDatabaseRecords,
    /// Summarize the record count of a whitelisted table.
    GetDatabaseSummary,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetWeather => "get_weather",
            Self::ListFiles => "list_files",
            Self::ReadFile => "read_file",
            Self::SummarizeCsv => "summarize_csv",
            Self::FilterCsv => "filter_csv",
            Self::InsertDatabaseRecord => "insert_database_record",
            Self::QueryDatabaseRecords => "query_database_records",
            Self::GetDatabaseSummary => "get_database_summary",
        }
    }

    /// Returns all Data Console tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GetWeather,
            Self::ListFiles,
            Self::ReadFile,
            Self::SummarizeCsv,
            Self::FilterCsv,
            Self::InsertDatabaseRecord,
            Self::QueryDatabaseRecords,
            Self::GetDatabaseSummary,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get_weather" => Some(Self::GetWeather),
            "list_files" => Some(Self::ListFiles),
            "read_file" => Some(Self::ReadFile),
            "summarize_csv" => Some(Self::SummarizeCsv),
            "filter_csv" => Some(Self::FilterCsv),
            "insert_database_record" => Some(Self::InsertDatabaseRecord),
            "query_database_records" => Some(Self::QueryDatabaseRecords),
            "get_database_summary" => Some(Self::GetDatabaseSummary),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tool Definitions
// ============================================================================

/// Behavioral hints attached to a tool definition.
///
/// # Invariants
/// - `insert_database_record` is the only tool that is neither read-only nor
///   idempotent: repeated identical calls produce distinct new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// The tool does not modify any state.
    pub read_only: bool,
    /// Repeating the call with identical input has no additional effect.
    pub idempotent: bool,
}

/// Tool definition shape used by MCP tool listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    pub input_schema: Value,
    /// Behavioral hints for retry and caching decisions.
    pub annotations: ToolAnnotations,
}

/// Read-only, idempotent annotation set.
const READ_ONLY: ToolAnnotations = ToolAnnotations {
    read_only: true,
    idempotent: true,
};

/// Returns the canonical tool definitions in listing order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: ToolName::GetWeather,
            description: "Get synthetic weather (temperature, humidity, condition) for a city."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string", "minLength": 1, "maxLength": 100},
                    "response_format": response_format_schema(),
                },
                "required": ["city"],
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
        ToolDefinition {
            name: ToolName::ListFiles,
            description: "List the files available in the data directory.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "response_format": response_format_schema(),
                },
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
        ToolDefinition {
            name: ToolName::ReadFile,
            description: "Read the full contents of a file in the data directory.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": {"type": "string", "minLength": 1, "maxLength": 255},
                    "response_format": response_format_schema(),
                },
                "required": ["filename"],
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
        ToolDefinition {
            name: ToolName::SummarizeCsv,
            description: "Summarize a CSV file: row count, columns, missing values per column."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": {"type": "string", "minLength": 1, "maxLength": 255},
                    "response_format": response_format_schema(),
                },
                "required": ["filename"],
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
        ToolDefinition {
            name: ToolName::FilterCsv,
            description: "Filter a CSV file by column equality; returns count and a preview."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": {"type": "string", "minLength": 1, "maxLength": 255},
                    "column": {"type": "string", "minLength": 1, "maxLength": 100},
                    "value": {"type": "string"},
                    "response_format": response_format_schema(),
                },
                "required": ["filename", "column", "value"],
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
        ToolDefinition {
            name: ToolName::InsertDatabaseRecord,
            description: "Append a record to a whitelisted table; each call creates a new record."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table": table_schema(),
                    "data": {
                        "type": "object",
                        "additionalProperties": {
                            "type": ["string", "number", "boolean", "null"],
                        },
                    },
                },
                "required": ["table", "data"],
                "additionalProperties": false,
            }),
            annotations: ToolAnnotations {
                read_only: false,
                idempotent: false,
            },
        },
        ToolDefinition {
            name: ToolName::QueryDatabaseRecords,
            description: "Fetch the most recent records from a whitelisted table.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table": table_schema(),
                    "limit": {"type": "integer", "minimum": 1, "maximum": 100, "default": 10},
                    "response_format": response_format_schema(),
                },
                "required": ["table"],
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
        ToolDefinition {
            name: ToolName::GetDatabaseSummary,
            description: "Return the total record count for a whitelisted table.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table": table_schema(),
                },
                "required": ["table"],
                "additionalProperties": false,
            }),
            annotations: READ_ONLY,
        },
    ]
}

/// Builds the shared `response_format` parameter schema.
fn response_format_schema() -> Value {
    json!({"type": "string", "enum": ["markdown", "json"], "default": "markdown"})
}

/// Builds the shared whitelisted-table parameter schema.
fn table_schema() -> Value {
    json!({"type": "string", "enum": ["weather_logs", "file_logs", "reports"]})
}

#[cfg(test)]
mod tests;
