//! MCP server with toolset-gated tool registration
//!
//! Every tool the server knows about is declared into a
//! [`toolset_core::ToolsetManager`] at startup. Only the toolsets selected via
//! `--toolsets` (or `MCP_TOOLSETS`) are activated, and only activated tools
//! appear in `tools/list` or can be invoked through `tools/call`.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ ToolsetMcpServer ]
//!        |
//!        +--> [ McpToolHost ]      registered tools only
//!        +--> [ ToolsetManager ]   every declared tool, grouped
//! ```
//!
//! # Toolsets
//!
//! - `default` - `get_current_time`
//! - `rds` - `describe_db_instances`, `describe_db_instance_attribute`
//! - `custom` - `custom_echo`

pub mod builtin;
pub mod config;
pub mod error;
pub mod host;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use host::McpToolHost;
pub use server::ToolsetMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolHandler, ToolOperation, ToolResult, tool_operation};
