//! Database instance tools
//!
//! Both tools read from an [`InstanceInventory`] built from the
//! `[[rds.instances]]` entries of the configuration file.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::DbInstance;
use crate::tools::{ToolHandler, optional_str, required_str};
use crate::{Error, Result};

/// Known database instances
#[derive(Debug, Clone, Default)]
pub struct InstanceInventory {
    instances: Vec<DbInstance>,
}

impl InstanceInventory {
    pub fn new(instances: Vec<DbInstance>) -> Self {
        Self { instances }
    }

    /// Instances in `region`, optionally restricted to one engine (case-insensitive)
    pub fn in_region<'a>(
        &'a self,
        region: &'a str,
        engine: Option<&'a str>,
    ) -> impl Iterator<Item = &'a DbInstance> {
        self.instances.iter().filter(move |i| {
            i.region == region && engine.is_none_or(|e| i.engine.eq_ignore_ascii_case(e))
        })
    }

    pub fn find(&self, region: &str, id: &str) -> Option<&DbInstance> {
        self.instances
            .iter()
            .find(|i| i.region == region && i.id == id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Lists database instances in a region
pub struct DescribeDbInstances {
    inventory: Arc<InstanceInventory>,
}

impl DescribeDbInstances {
    pub fn new(inventory: Arc<InstanceInventory>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl ToolHandler for DescribeDbInstances {
    fn name(&self) -> &str {
        "describe_db_instances"
    }

    fn description(&self) -> &str {
        "List database instances in a region"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "region_id": {
                    "type": "string",
                    "description": "Region ID, e.g. cn-hangzhou"
                },
                "engine": {
                    "type": "string",
                    "description": "Only list instances of this engine"
                }
            },
            "required": ["region_id"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        let region = required_str(&arguments, "region_id")?;
        let engine = optional_str(&arguments, "engine");
        let items: Vec<&DbInstance> = self.inventory.in_region(region, engine).collect();
        Ok(json!({
            "region_id": region,
            "total_count": items.len(),
            "items": items,
        }))
    }
}

/// Describes one database instance
pub struct DescribeDbInstanceAttribute {
    inventory: Arc<InstanceInventory>,
}

impl DescribeDbInstanceAttribute {
    pub fn new(inventory: Arc<InstanceInventory>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl ToolHandler for DescribeDbInstanceAttribute {
    fn name(&self) -> &str {
        "describe_db_instance_attribute"
    }

    fn description(&self) -> &str {
        "Get the attributes of a database instance"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "region_id": {
                    "type": "string",
                    "description": "Region ID, e.g. cn-hangzhou"
                },
                "db_instance_id": {
                    "type": "string",
                    "description": "Database instance ID"
                }
            },
            "required": ["region_id", "db_instance_id"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        let region = required_str(&arguments, "region_id")?;
        let id = required_str(&arguments, "db_instance_id")?;
        let instance = self
            .inventory
            .find(region, id)
            .ok_or_else(|| Error::InstanceNotFound {
                id: id.to_string(),
                region: region.to_string(),
            })?;
        Ok(serde_json::to_value(instance)?)
    }
}
