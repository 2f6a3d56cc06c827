use async_trait::async_trait;
use serde_json::{Value, json};

use crate::Result;
use crate::tools::ToolHandler;

/// Reports the server's current time
pub struct GetCurrentTime;

#[async_trait]
impl ToolHandler for GetCurrentTime {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the server's current local and UTC time"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn call(&self, _arguments: Value) -> Result<Value> {
        let local = chrono::Local::now();
        Ok(json!({
            "local": local.format("%Y-%m-%d %H:%M:%S").to_string(),
            "utc": local.with_timezone(&chrono::Utc).to_rfc3339(),
        }))
    }
}
