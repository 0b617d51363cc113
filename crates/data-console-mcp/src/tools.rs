// crates/data-console-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Tool routing for the Data Console MCP server.
// Purpose: Validate, dispatch, classify failures, and format every call.
// Dependencies: data-console-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The tool router is the single boundary between external callers and the
//! service layer. Each call runs validate, dispatch, format, reply in order;
//! a failure in any stage short-circuits into a uniform textual failure
//! reply that preserves the failure kind. Tool inputs are untrusted: request
//! payloads are decoded with unknown-field rejection, and table names pass
//! the whitelist before any storage call.
//!
//! ## Invariants
//! - Exactly one service is dispatched per call.
//! - Service errors never propagate past the router boundary.
//! - Responses are deterministic for identical inputs and store state,
//!   except for the intentionally randomized weather payload.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use data_console_core::DataRoot;
use data_console_core::ServiceError;
use data_console_core::SharedRecordStore;
use data_console_core::ToolDefinition;
use data_console_core::ToolName;
use data_console_core::files;
use data_console_core::record::INVALID_TABLE_MESSAGE;
use data_console_core::record::NewRecord;
use data_console_core::record::TableName;
use data_console_core::record::validate_record;
use data_console_core::tabular;
use data_console_core::tooling::tool_definitions;
use data_console_core::validate::validate_limit;
use data_console_core::weather;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::audit::RequestContext;
use crate::audit::ToolAuditEvent;
use crate::audit::ToolAuditSink;
use crate::audit::ToolOutcome;
use crate::format::ReplyPayload;
use crate::format::ResponseFormat;
use crate::format::render;

/// Default number of records returned by `query_database_records`.
const DEFAULT_QUERY_LIMIT: i64 = 10;

// ============================================================================
// SECTION: Errors and Replies
// ============================================================================

/// Protocol-level tool routing errors.
///
/// Service failures are not represented here; they become textual failure
/// replies instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("unknown tool")]
    UnknownTool,
}

/// Reply produced by a routed tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    /// Successful formatted reply text.
    Success(String),
    /// Uniform failure reply text carrying the failure kind.
    Failure {
        /// Stable failure kind label.
        kind: &'static str,
        /// Failure reply text, distinctly prefixed.
        text: String,
    },
}

impl ToolReply {
    /// Returns the reply text regardless of outcome.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text)
            | Self::Failure {
                text, ..
            } => text,
        }
    }

    /// Returns true when the reply reports success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Builds the uniform failure reply for a service error.
fn failure_reply(error: &ServiceError) -> ToolReply {
    ToolReply::Failure {
        kind: error.kind(),
        text: format!("Error ({}): {error}", error.kind()),
    }
}

// ============================================================================
// SECTION: Tool Requests
// ============================================================================

/// `get_weather` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeatherRequest {
    /// City to generate a report for.
    city: String,
    /// Requested output format.
    #[serde(default)]
    response_format: ResponseFormat,
}

/// `list_files` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListFilesRequest {
    /// Requested output format.
    #[serde(default)]
    response_format: ResponseFormat,
}

/// `read_file` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadFileRequest {
    /// File to read from the data root.
    filename: String,
    /// Requested output format.
    #[serde(default)]
    response_format: ResponseFormat,
}

/// `summarize_csv` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SummarizeCsvRequest {
    /// CSV file to analyze.
    filename: String,
    /// Requested output format.
    #[serde(default)]
    response_format: ResponseFormat,
}

/// `filter_csv` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterCsvRequest {
    /// CSV file to filter.
    filename: String,
    /// Column to filter on.
    column: String,
    /// Value to match; numeric columns compare by parsed value.
    value: String,
    /// Requested output format.
    #[serde(default)]
    response_format: ResponseFormat,
}

/// `insert_database_record` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InsertRecordRequest {
    /// Target table name; must be whitelisted.
    table: String,
    /// Column values for the new record.
    data: NewRecord,
}

/// `query_database_records` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryRecordsRequest {
    /// Table to query; must be whitelisted.
    table: String,
    /// Maximum number of records to return.
    #[serde(default = "default_query_limit")]
    limit: i64,
    /// Requested output format.
    #[serde(default)]
    response_format: ResponseFormat,
}

/// `get_database_summary` request payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabaseSummaryRequest {
    /// Table to summarize; must be whitelisted.
    table: String,
}

/// Returns the default query limit.
const fn default_query_limit() -> i64 {
    DEFAULT_QUERY_LIMIT
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for MCP requests.
#[derive(Clone)]
pub struct ToolRouter {
    /// Sandboxed data root for file and CSV tools.
    data_root: DataRoot,
    /// Shared record store for database tools.
    store: SharedRecordStore,
    /// Audit sink for tool call events.
    audit: Arc<dyn ToolAuditSink>,
}

impl ToolRouter {
    /// Creates a new tool router.
    #[must_use]
    pub fn new(data_root: DataRoot, store: SharedRecordStore, audit: Arc<dyn ToolAuditSink>) -> Self {
        Self {
            data_root,
            store,
            audit,
        }
    }

    /// Lists the MCP tools supported by this server.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Handles a tool call by name with a JSON payload.
    ///
    /// Service failures are converted into [`ToolReply::Failure`] and never
    /// escape the router; only an unrecognized tool name is a protocol
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] when the tool name is not in the
    /// catalogue.
    pub fn handle_tool_call(
        &self,
        context: &RequestContext,
        name: &str,
        payload: Value,
    ) -> Result<ToolReply, ToolError> {
        let started = Instant::now();
        let Some(tool) = ToolName::parse(name) else {
            self.record_audit(context, None, ToolOutcome::Error, Some("unknown_tool"), started);
            return Err(ToolError::UnknownTool);
        };
        let outcome = self.dispatch(tool, payload);
        let reply = match outcome {
            Ok(text) => ToolReply::Success(text),
            Err(error) => failure_reply(&error),
        };
        match &reply {
            ToolReply::Success(_) => {
                self.record_audit(context, Some(tool), ToolOutcome::Ok, None, started);
            }
            ToolReply::Failure {
                kind, ..
            } => {
                self.record_audit(context, Some(tool), ToolOutcome::Error, Some(kind), started);
            }
        }
        Ok(reply)
    }

    /// Dispatches a recognized tool to exactly one service.
    fn dispatch(&self, tool: ToolName, payload: Value) -> Result<String, ServiceError> {
        match tool {
            ToolName::GetWeather => self.handle_get_weather(payload),
            ToolName::ListFiles => self.handle_list_files(payload),
            ToolName::ReadFile => self.handle_read_file(payload),
            ToolName::SummarizeCsv => self.handle_summarize_csv(payload),
            ToolName::FilterCsv => self.handle_filter_csv(payload),
            ToolName::InsertDatabaseRecord => self.handle_insert_record(payload),
            ToolName::QueryDatabaseRecords => self.handle_query_records(payload),
            ToolName::GetDatabaseSummary => self.handle_database_summary(payload),
        }
    }

    /// Handles weather lookup requests.
    fn handle_get_weather(&self, payload: Value) -> Result<String, ServiceError> {
        let request: WeatherRequest = decode(payload)?;
        let report = weather::get_weather(&request.city)?;
        render_reply(&ReplyPayload::Weather(report), request.response_format)
    }

    /// Handles file listing requests.
    fn handle_list_files(&self, payload: Value) -> Result<String, ServiceError> {
        let request: ListFilesRequest = decode(payload)?;
        let listing = files::list_files(&self.data_root)?;
        render_reply(&ReplyPayload::FileList(listing), request.response_format)
    }

    /// Handles file read requests.
    fn handle_read_file(&self, payload: Value) -> Result<String, ServiceError> {
        let request: ReadFileRequest = decode(payload)?;
        let content = files::read_file(&self.data_root, &request.filename)?;
        render_reply(&ReplyPayload::FileContent(content), request.response_format)
    }

    /// Handles CSV summary requests.
    fn handle_summarize_csv(&self, payload: Value) -> Result<String, ServiceError> {
        let request: SummarizeCsvRequest = decode(payload)?;
        let summary = tabular::summarize_csv(&self.data_root, &request.filename)?;
        render_reply(&ReplyPayload::CsvSummary(summary), request.response_format)
    }

    /// Handles CSV filter requests.
    fn handle_filter_csv(&self, payload: Value) -> Result<String, ServiceError> {
        let request: FilterCsvRequest = decode(payload)?;
        let filter = tabular::filter_csv(
            &self.data_root,
            &request.filename,
            &request.column,
            &request.value,
        )?;
        render_reply(&ReplyPayload::CsvFilter(filter), request.response_format)
    }

    /// Handles record insert requests; the only non-idempotent tool.
    fn handle_insert_record(&self, payload: Value) -> Result<String, ServiceError> {
        let request: InsertRecordRequest = decode(payload)?;
        let table = parse_table(&request.table)?;
        validate_record(table, &request.data)?;
        let receipt = self.store.insert(table, &request.data)?;
        render_reply(
            &ReplyPayload::Inserted {
                receipt,
                data: request.data,
            },
            ResponseFormat::Markdown,
        )
    }

    /// Handles recent record query requests.
    fn handle_query_records(&self, payload: Value) -> Result<String, ServiceError> {
        let request: QueryRecordsRequest = decode(payload)?;
        let table = parse_table(&request.table)?;
        let limit = validate_limit(request.limit)?;
        let records = self.store.query_recent(table, limit)?;
        render_reply(
            &ReplyPayload::DbRecords {
                table,
                records,
            },
            request.response_format,
        )
    }

    /// Handles table summary requests.
    fn handle_database_summary(&self, payload: Value) -> Result<String, ServiceError> {
        let request: DatabaseSummaryRequest = decode(payload)?;
        let table = parse_table(&request.table)?;
        let summary = self.store.count_summary(table)?;
        render_reply(&ReplyPayload::DbSummary(summary), ResponseFormat::Json)
    }

    /// Emits a tool call audit event.
    fn record_audit(
        &self,
        context: &RequestContext,
        tool: Option<ToolName>,
        outcome: ToolOutcome,
        error_kind: Option<&'static str>,
        started: Instant,
    ) {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let event = ToolAuditEvent::tool_call(context, tool, outcome, error_kind, duration_ms);
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Decoding Helpers
// ============================================================================

/// Decodes a tool payload, rejecting unknown or malformed parameters.
fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ServiceError> {
    serde_json::from_value(payload)
        .map_err(|err| ServiceError::Validation(format!("invalid parameters: {err}")))
}

/// Parses a table name against the whitelist.
fn parse_table(name: &str) -> Result<TableName, ServiceError> {
    TableName::parse(name)
        .ok_or_else(|| ServiceError::Validation(INVALID_TABLE_MESSAGE.to_string()))
}

/// Renders a payload, mapping formatter bugs onto the storage kind.
fn render_reply(payload: &ReplyPayload, format: ResponseFormat) -> Result<String, ServiceError> {
    render(payload, format)
        .map_err(|err| ServiceError::Storage(err.to_string()))
}
