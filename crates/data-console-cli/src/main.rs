// crates/data-console-cli/src/main.rs
// ============================================================================
// Module: Data Console CLI Entry Point
// Description: Command dispatcher for the Data Console MCP server.
// Purpose: Provide a safe, localized CLI for serving and tool inspection.
// Dependencies: clap, data-console-core, data-console-mcp, tokio
// ============================================================================

//! ## Overview
//! The Data Console CLI loads configuration, applies flag overrides, and
//! either serves MCP requests on the configured transport or prints the tool
//! catalogue. Errors are reported on stderr with a nonzero exit code; the
//! process never panics on bad input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use data_console_core::tooling::tool_definitions;
use data_console_mcp::DataConsoleConfig;
use data_console_mcp::McpServer;
use data_console_mcp::ServerTransport;
use data_console_mcp::config::ConfigError;
use data_console_mcp::server::McpServerError;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "data-console", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve MCP requests on the configured transport.
    Serve(ServeArgs),
    /// Print the tool catalogue.
    Tools(ToolsArgs),
}

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured transport.
    #[arg(long, value_enum, value_name = "TRANSPORT")]
    transport: Option<TransportArg>,
    /// Override the configured data root directory.
    #[arg(long, value_name = "PATH")]
    data_root: Option<PathBuf>,
    /// Override the configured HTTP bind address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Transport choices exposed on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TransportArg {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over HTTP.
    Http,
}

impl From<TransportArg> for ServerTransport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}

/// Arguments for the tools subcommand.
#[derive(Args, Debug)]
struct ToolsArgs {
    /// Emit the catalogue as JSON instead of a listing.
    #[arg(long)]
    json: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures surfaced to the user.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Server initialization or serving failed.
    #[error(transparent)]
    Server(#[from] McpServerError),
    /// Runtime or output I/O failed.
    #[error("io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "data-console: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed command.
fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Tools(args) => run_tools(&args),
    }
}

/// Loads configuration, applies overrides, and serves requests.
fn run_serve(args: &ServeArgs) -> Result<(), CliError> {
    let mut config = DataConsoleConfig::load(args.config.as_deref())?;
    if let Some(transport) = args.transport {
        config.server.transport = transport.into();
    }
    if let Some(data_root) = args.data_root.clone() {
        config.data_root = data_root;
    }
    if let Some(bind) = args.bind.clone() {
        config.server.bind = Some(bind);
    }
    config.validate()?;
    let server = McpServer::from_config(config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::Io(err.to_string()))?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Prints the tool catalogue.
fn run_tools(args: &ToolsArgs) -> Result<(), CliError> {
    let definitions = tool_definitions();
    let mut out = std::io::stdout();
    if args.json {
        let payload = serde_json::to_string_pretty(&definitions)
            .map_err(|err| CliError::Io(err.to_string()))?;
        writeln!(out, "{payload}").map_err(|err| CliError::Io(err.to_string()))?;
        return Ok(());
    }
    for definition in definitions {
        writeln!(out, "{}  {}", definition.name, definition.description)
            .map_err(|err| CliError::Io(err.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
