//! Toolset MCP Server
//!
//! # Usage
//!
//! ```bash
//! toolset-mcp [--toolsets rds,custom] [--config toolset-mcp.toml]
//! ```
//!
//! # Environment Variables
//!
//! - `MCP_TOOLSETS`: Comma-separated toolsets to enable (default: `default`)
//! - `TOOLSET_MCP_CONFIG`: Path to the configuration file
//! - `RUST_LOG`: Control log verbosity (default: `toolset_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use toolset_mcp::{ServerConfig, ToolsetMcpServer};

/// MCP server that exposes only the enabled toolsets
#[derive(Parser)]
#[command(name = "toolset-mcp")]
#[command(about = "MCP server that exposes only the enabled toolsets")]
#[command(version)]
struct Args {
    /// Comma-separated toolsets to enable, e.g. "rds,custom"
    #[arg(long, env = "MCP_TOOLSETS")]
    toolsets: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "TOOLSET_MCP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("toolset_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let selection = config.selection(args.toolsets.as_deref());

    tracing::info!(toolsets = ?selection.groups(), "Starting toolset-mcp server");

    let mut server = ToolsetMcpServer::with_builtin_tools(config)?;
    server.initialize(&selection)?;
    server.run().await?;

    Ok(())
}
