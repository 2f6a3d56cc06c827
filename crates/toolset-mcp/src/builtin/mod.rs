//! Built-in tools and their group assignments
//!
//! ## default
//! - `get_current_time` - Current local and UTC time
//!
//! ## rds
//! - `describe_db_instances` - List database instances in a region
//! - `describe_db_instance_attribute` - Details of one database instance
//!
//! ## custom
//! - `custom_echo` - Echo text back
//!
//! Every built-in is declared into the default group; [`BuiltinGroupLoader`]
//! moves the rds and custom tools into their groups at startup.

mod custom;
mod rds;
mod time;

use std::sync::Arc;

use toolset_core::{DeclaredTools, GroupLoader, NameGroupLoader, ToolsetManager};

pub use custom::CustomEcho;
pub use rds::{DescribeDbInstanceAttribute, DescribeDbInstances, InstanceInventory};
pub use time::GetCurrentTime;

use crate::config::ServerConfig;
use crate::tools::ToolHandler;

pub const RDS_GROUP: &str = "rds";
pub const CUSTOM_GROUP: &str = "custom";

/// Built-in handlers in declaration order
pub fn builtin_handlers(config: &ServerConfig) -> Vec<Arc<dyn ToolHandler>> {
    let inventory = Arc::new(InstanceInventory::new(config.rds.instances.clone()));
    vec![
        Arc::new(GetCurrentTime),
        Arc::new(DescribeDbInstances::new(Arc::clone(&inventory))),
        Arc::new(DescribeDbInstanceAttribute::new(inventory)),
        Arc::new(CustomEcho),
    ]
}

/// Assigns built-in tools to their groups, then applies configured overrides
#[derive(Debug, Clone, Default)]
pub struct BuiltinGroupLoader {
    overrides: NameGroupLoader,
}

impl BuiltinGroupLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: NameGroupLoader) -> Self {
        Self { overrides }
    }
}

impl GroupLoader<dyn ToolHandler> for BuiltinGroupLoader {
    fn load_groups(
        &self,
        manager: &mut ToolsetManager<dyn ToolHandler>,
        declared: &DeclaredTools<dyn ToolHandler>,
    ) {
        for name in ["describe_db_instances", "describe_db_instance_attribute"] {
            if let Some(operation) = declared.get(name) {
                manager.set_group(operation, RDS_GROUP);
            }
        }
        if let Some(operation) = declared.get("custom_echo") {
            manager.set_group(operation, CUSTOM_GROUP);
        }
        self.overrides.load_groups(manager, declared);
    }
}
