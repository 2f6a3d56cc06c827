//! Server configuration
//!
//! Configuration is an optional TOML file:
//!
//! ```toml
//! toolsets = ["rds", "custom"]
//!
//! [server]
//! name = "toolset-mcp"
//!
//! # Move declared tools to other groups before activation
//! [groups]
//! get_current_time = "custom"
//!
//! [[rds.instances]]
//! id = "rm-bp1example"
//! region = "cn-hangzhou"
//! engine = "MySQL"
//! engine_version = "8.0"
//! class = "mysql.n2.medium.1"
//! status = "Running"
//! ```
//!
//! The toolset selection given on the command line (or via `MCP_TOOLSETS`)
//! takes precedence over `toolsets` from the file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use toolset_core::{NameGroupLoader, ToolsetSelection};

use crate::{Error, Result};

fn default_server_name() -> String {
    "toolset-mcp".to_string()
}

/// Server identity reported from `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// A database instance served by the rds tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInstance {
    pub id: String,
    pub region: String,
    pub engine: String,
    #[serde(default)]
    pub engine_version: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RdsSection {
    #[serde(default)]
    pub instances: Vec<DbInstance>,
}

/// Parsed configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Toolsets to enable when none are given on the command line
    #[serde(default)]
    pub toolsets: Option<Vec<String>>,

    #[serde(default)]
    pub server: ServerSection,

    /// Tool name -> group overrides, applied after the built-in assignments
    #[serde(default)]
    pub groups: BTreeMap<String, String>,

    #[serde(default)]
    pub rds: RdsSection,
}

impl ServerConfig {
    /// Parse configuration from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Self::parse(&content)
    }

    /// Resolve the toolset selection, preferring the command-line value
    pub fn selection(&self, cli: Option<&str>) -> ToolsetSelection {
        match (cli, &self.toolsets) {
            (Some(raw), _) => ToolsetSelection::from(raw),
            (None, Some(list)) => ToolsetSelection::List(list.clone()),
            (None, None) => ToolsetSelection::Default,
        }
    }

    /// Loader for the `[groups]` overrides
    pub fn group_overrides(&self) -> NameGroupLoader {
        self.groups.iter().map(|(tool, group)| (tool.as_str(), group.as_str())).collect()
    }
}
