//! MCP tool types
//!
//! A tool is any [`ToolHandler`]. Handlers are wrapped in a [`ToolOperation`]
//! so the toolset registry can track them by identity; the MCP-facing
//! [`ToolDefinition`] is only produced when a tool is registered with the
//! host during activation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolset_core::Operation;

use crate::{Error, Result};

/// An invocable tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Default tool name, used unless registration parameters override it
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for the tool arguments
    fn input_schema(&self) -> Value;
    async fn call(&self, arguments: Value) -> Result<Value>;
}

/// Registry handle for a tool handler
pub type ToolOperation = Operation<dyn ToolHandler>;

/// Wrap a handler in a fresh [`ToolOperation`].
pub fn tool_operation<H: ToolHandler + 'static>(handler: H) -> ToolOperation {
    let handler: Arc<dyn ToolHandler> = Arc::new(handler);
    Operation::from_arc(handler)
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Render a handler's return value; strings are passed through as-is
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self::text(text)),
            other => Ok(Self::text(serde_json::to_string_pretty(&other)?)),
        }
    }
}

/// Fetch a required string argument
pub fn required_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_arguments(format!("missing required string '{key}'")))
}

/// Fetch an optional string argument
pub fn optional_str<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}
