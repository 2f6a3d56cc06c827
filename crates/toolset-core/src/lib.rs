//! Toolset management for tool hosts.
//!
//! This crate groups invocable operations ("tools") into named, mutually
//! exclusive toolsets and defers their registration with a host until an
//! explicit activation step picks which toolsets are live.
//!
//! # Lifecycle
//!
//! ```text
//! declare + add (default group)
//!        |
//!        v
//! GroupLoader::load_groups  -- set_group for recognized tools
//!        |
//!        v
//! enable(selected toolsets)
//!        |
//!        v
//! activate(host)            -- ToolHost::register for enabled tools only
//! ```
//!
//! # Example
//!
//! ```
//! use toolset_core::{Operation, RegistrationParams, ToolsetManager};
//!
//! let describe = Operation::new("describe_db_instances");
//! let echo = Operation::new("custom_echo");
//!
//! let mut manager = ToolsetManager::new();
//! manager.add(&describe, Some("rds"), RegistrationParams::default());
//! manager.add(&echo, None, RegistrationParams::default());
//! manager.set_group(&echo, "custom");
//! manager.enable(["rds"]);
//!
//! assert_eq!(manager.group_of(&echo), Some("custom"));
//! assert_eq!(manager.enabled_groups(), vec!["rds"]);
//! ```

pub mod error;
pub mod loader;
pub mod operation;
pub mod registry;
pub mod selection;

pub use error::{Error, Result};
pub use loader::{GroupLoader, NameGroupLoader, initialize_toolsets};
pub use operation::{DeclaredTools, Operation, OperationId};
pub use registry::{
    ActivatedTool, Activation, DEFAULT_GROUP, RegistrationParams, ToolHost, ToolRecord,
    ToolsetManager,
};
pub use selection::{ToolsetSelection, parse_toolsets};
