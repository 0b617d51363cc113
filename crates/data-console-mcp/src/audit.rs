// crates/data-console-mcp/src/audit.rs
// ============================================================================
// Module: Tool Call Audit Logging
// Description: Structured audit events for gateway tool dispatch.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: data-console-core, serde
// ============================================================================

//! ## Overview
//! Every tool call produces one audit event recording the tool, outcome,
//! failure kind, and timing. Payload contents are never logged. Sinks are
//! intentionally lightweight so deployments can route events to their
//! preferred logging pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use data_console_core::ToolName;
use serde::Serialize;

use crate::config::ServerTransport;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request metadata carried from the transport into the gateway.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transport used by the caller.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<IpAddr>,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a stdio request context.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer_ip: None,
            request_id: None,
        }
    }

    /// Builds an HTTP request context.
    #[must_use]
    pub const fn http(peer_ip: Option<IpAddr>) -> Self {
        Self {
            transport: ServerTransport::Http,
            peer_ip,
            request_id: None,
        }
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Tool call outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The call produced a success reply.
    Ok,
    /// The call produced a failure reply or protocol error.
    Error,
}

/// Tool call audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Tool name when recognized.
    pub tool: Option<ToolName>,
    /// Request outcome.
    pub outcome: ToolOutcome,
    /// Failure kind label when the call failed.
    pub error_kind: Option<&'static str>,
    /// Call duration in milliseconds.
    pub duration_ms: u64,
}

impl ToolAuditEvent {
    /// Builds a tool call event from request context and outcome data.
    #[must_use]
    pub fn tool_call(
        context: &RequestContext,
        tool: Option<ToolName>,
        outcome: ToolOutcome,
        error_kind: Option<&'static str>,
        duration_ms: u64,
    ) -> Self {
        Self {
            event: "tool_call",
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            request_id: context.request_id.clone(),
            transport: context.transport,
            peer_ip: context.peer_ip.map(|ip| ip.to_string()),
            tool,
            outcome,
            error_kind,
            duration_ms,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink interface for tool call events.
pub trait ToolAuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &ToolAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ToolAuditSink for StderrAuditSink {
    fn record(&self, event: &ToolAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ToolAuditSink for FileAuditSink {
    fn record(&self, event: &ToolAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that discards events.
pub struct NoopAuditSink;

impl ToolAuditSink for NoopAuditSink {
    fn record(&self, _event: &ToolAuditEvent) {}
}
