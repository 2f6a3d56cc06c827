//! MCP Protocol Compliance Integration Tests
//!
//! Drives the server through its public message interface: ID
//! preservation, error codes, and tool visibility per toolset.

use rstest::rstest;
use serde_json::{Value, json};
use toolset_core::{RegistrationParams, ToolsetSelection};
use toolset_mcp::{ServerConfig, ToolsetMcpServer};

const INVENTORY: &str = r#"
[[rds.instances]]
id = "rm-1"
region = "cn-hangzhou"
engine = "MySQL"
status = "Running"
"#;

fn setup_server(toolsets: &str) -> ToolsetMcpServer {
    let config = ServerConfig::parse(INVENTORY).unwrap();
    let mut server = ToolsetMcpServer::with_builtin_tools(config).unwrap();
    server.initialize(&ToolsetSelection::from(toolsets)).unwrap();
    server
}

async fn send(server: &ToolsetMcpServer, request: Value) -> Value {
    let response = server.handle_message(&request.to_string()).await.unwrap();
    serde_json::from_str(&response).unwrap()
}

async fn listed_names(server: &ToolsetMcpServer) -> Vec<String> {
    let response = send(server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;
    response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

// ==========================================================================
// JSON-RPC 2.0 ID Preservation
// ==========================================================================

#[rstest]
#[case(json!(42))]
#[case(json!("req-abc-123"))]
#[tokio::test]
async fn test_id_preserved_in_response(#[case] id: Value) {
    let server = setup_server("default");
    let response = send(&server, json!({"jsonrpc": "2.0", "id": id.clone(), "method": "initialize"})).await;
    assert_eq!(response["id"], id, "ID must be echoed back exactly");
    assert_eq!(response["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_id_preserved_in_error_response() {
    let server = setup_server("default");
    let response = send(
        &server,
        json!({"jsonrpc": "2.0", "id": "err-test", "method": "nonexistent/method"}),
    )
    .await;
    assert_eq!(response["id"], "err-test");
    assert_eq!(response["error"]["code"], -32601);
}

// ==========================================================================
// Toolset visibility
// ==========================================================================

#[rstest]
#[case("default", &["get_current_time"])]
#[case("rds", &["describe_db_instances", "describe_db_instance_attribute"])]
#[case("custom", &["custom_echo"])]
#[case("rds,custom", &["describe_db_instances", "describe_db_instance_attribute", "custom_echo"])]
#[case("rds,,custom,", &["describe_db_instances", "describe_db_instance_attribute", "custom_echo"])]
#[case("", &["get_current_time"])]
#[case("nope", &[])]
#[tokio::test]
async fn test_tools_list_reflects_toolsets(#[case] toolsets: &str, #[case] expected: &[&str]) {
    let server = setup_server(toolsets);
    assert_eq!(listed_names(&server).await, expected);
}

struct Shout;

#[async_trait::async_trait]
impl toolset_mcp::ToolHandler for Shout {
    fn name(&self) -> &str {
        "shout"
    }

    fn description(&self) -> &str {
        "Shout text"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn call(&self, arguments: Value) -> toolset_mcp::Result<Value> {
        let text = arguments["text"].as_str().unwrap_or_default();
        Ok(Value::String(text.to_uppercase()))
    }
}

#[tokio::test]
async fn test_user_declared_tool_in_own_group() {
    let mut server = ToolsetMcpServer::with_builtin_tools(ServerConfig::default()).unwrap();
    server
        .tool(
            Shout,
            Some("extras"),
            RegistrationParams::new().with_kwarg("description", "Loud echo"),
        )
        .unwrap();
    server.initialize(&ToolsetSelection::from("extras")).unwrap();

    let response = send(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;
    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "shout");
    assert_eq!(tools[0]["description"], "Loud echo");

    let response = send(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": {"name": "shout", "arguments": {"text": "hey"}}
        }),
    )
    .await;
    assert_eq!(response["result"]["content"][0]["text"], "HEY");
}

// ==========================================================================
// End-to-end tool execution
// ==========================================================================

#[tokio::test]
async fn test_describe_instances_end_to_end() {
    let server = setup_server("rds");
    let response = send(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/call",
            "params": {"name": "describe_db_instances", "arguments": {"region_id": "cn-hangzhou"}}
        }),
    )
    .await;

    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["total_count"], 1);
    assert_eq!(payload["items"][0]["id"], "rm-1");
}

#[tokio::test]
async fn test_missing_instance_is_tool_error() {
    let server = setup_server("rds");
    let response = send(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 8, "method": "tools/call",
            "params": {
                "name": "describe_db_instance_attribute",
                "arguments": {"region_id": "cn-hangzhou", "db_instance_id": "rm-404"}
            }
        }),
    )
    .await;
    assert_eq!(response["result"]["isError"], true);
    assert!(
        response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("rm-404")
    );
}

#[tokio::test]
async fn test_tool_outside_enabled_toolsets_is_not_callable() {
    let server = setup_server("rds");
    let response = send(
        &server,
        json!({
            "jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": {"name": "custom_echo", "arguments": {"text": "hi"}}
        }),
    )
    .await;
    assert_eq!(response["result"]["isError"], true);
}

#[tokio::test]
async fn test_config_group_override_moves_tool() {
    let config = ServerConfig::parse("[groups]\nget_current_time = \"custom\"\n").unwrap();
    let mut server = ToolsetMcpServer::with_builtin_tools(config).unwrap();
    server.initialize(&ToolsetSelection::from("custom")).unwrap();

    assert_eq!(listed_names(&server).await, vec!["get_current_time", "custom_echo"]);
}
