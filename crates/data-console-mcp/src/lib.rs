// crates/data-console-mcp/src/lib.rs
// ============================================================================
// Module: Data Console MCP
// Description: MCP server, tool gateway, and response formatting.
// Purpose: Expose the Data Console services as MCP tools over JSON-RPC.
// Dependencies: data-console-core, data-console-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! Data Console MCP exposes the sandboxed service layer through MCP tools.
//! Every call passes through the [`tools::ToolRouter`]: parameter validation,
//! dispatch to exactly one service, failure classification, and rendering
//! into the caller-selected response format.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod format;
pub mod server;
pub mod tools;

#[cfg(test)]
mod tests {
    //! Test-only lint relaxations for panic-based assertions and debug output.
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only output and panic-based assertions are permitted."
    )]
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestContext;
pub use audit::StderrAuditSink;
pub use audit::ToolAuditEvent;
pub use audit::ToolAuditSink;
pub use config::DataConsoleConfig;
pub use config::ServerTransport;
pub use format::ResponseFormat;
pub use server::McpServer;
pub use tools::ToolReply;
pub use tools::ToolRouter;
