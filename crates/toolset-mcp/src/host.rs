//! Tool host backing the MCP server
//!
//! [`McpToolHost`] is the registration target for toolset activation. Only
//! tools registered here are listed by `tools/list` or callable through
//! `tools/call`.
//!
//! Registration parameters follow the MCP tool decorator convention:
//! - `args[0]` (string) or `kwargs["name"]` overrides the handler's name
//! - `kwargs["description"]` overrides the handler's description
//! - `kwargs["annotations"]` is passed through to the tool definition

use std::collections::HashMap;

use serde_json::{Map, Value};
use toolset_core::ToolHost;

use crate::tools::{ToolDefinition, ToolHandler, ToolOperation};
use crate::{Error, Result};

/// A tool that was registered during activation
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    pub operation: ToolOperation,
}

/// Registered tools, in registration order
#[derive(Default)]
pub struct McpToolHost {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl McpToolHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Definitions of all registered tools
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|t| &t.definition)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.definition.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a registered tool by its registered name
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        tracing::info!(tool = %name, "Calling tool");
        tool.operation.call(arguments).await
    }
}

impl ToolHost<dyn ToolHandler> for McpToolHost {
    type Error = Error;

    fn register(
        &mut self,
        operation: &ToolOperation,
        args: &[Value],
        kwargs: &Map<String, Value>,
    ) -> Result<()> {
        let name = args
            .first()
            .and_then(Value::as_str)
            .or_else(|| kwargs.get("name").and_then(Value::as_str))
            .unwrap_or_else(|| operation.name())
            .to_string();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }

        let description = kwargs
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_else(|| operation.description())
            .to_string();

        let definition = ToolDefinition {
            name: name.clone(),
            description,
            input_schema: operation.input_schema(),
            annotations: kwargs.get("annotations").cloned(),
        };

        tracing::debug!(tool = %name, "Registered MCP tool");
        self.by_name.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            operation: operation.clone(),
        });
        Ok(())
    }
}
