//! Error types for the MCP server

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error while declaring tools
    #[error("toolset error: {0}")]
    Toolset(#[from] toolset_core::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid tool arguments
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Server not initialized
    #[error("server not initialized")]
    NotInitialized,

    /// Toolsets were already activated for this server
    #[error("toolsets already activated")]
    AlreadyInitialized,

    /// Unknown tool requested
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Two enabled tools resolved to the same name
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Database instance not present in the inventory
    #[error("DB instance not found: {id} in region {region}")]
    InstanceNotFound { id: String, region: String },

    /// Configuration file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}
