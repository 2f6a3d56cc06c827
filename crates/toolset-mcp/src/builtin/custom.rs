use async_trait::async_trait;
use serde_json::{Value, json};

use crate::Result;
use crate::tools::{ToolHandler, required_str};

/// Example custom tool that echoes its input
pub struct CustomEcho;

#[async_trait]
impl ToolHandler for CustomEcho {
    fn name(&self) -> &str {
        "custom_echo"
    }

    fn description(&self) -> &str {
        "Example custom tool that echoes the provided text"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text to echo"
                }
            },
            "required": ["text"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        let text = required_str(&arguments, "text")?;
        Ok(Value::String(format!("custom echo: {text}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_echo() {
        let value = CustomEcho.call(json!({"text": "hello"})).await.unwrap();
        assert_eq!(value, json!("custom echo: hello"));
    }

    #[tokio::test]
    async fn test_echo_requires_text() {
        let err = CustomEcho.call(json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
    }
}
