//! End-to-end startup scenarios
//!
//! Each test walks the full startup path: declare the built-in tools,
//! load groups, enable toolsets, activate against a host, and (where
//! relevant) serve requests.

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;
use toolset_core::{
    DeclaredTools, Operation, RegistrationParams, ToolsetManager, ToolsetSelection,
    initialize_toolsets,
};
use toolset_mcp::builtin::{BuiltinGroupLoader, builtin_handlers};
use toolset_mcp::{ServerConfig, ToolHandler, ToolsetMcpServer};
use toolset_test_utils::{HostRejected, RecordingHost};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Built-in tools declared into the default group, keyed by handler name
struct Startup {
    manager: ToolsetManager<dyn ToolHandler>,
    declared: DeclaredTools<dyn ToolHandler>,
}

impl Startup {
    fn new(config: &ServerConfig) -> Self {
        let mut manager = ToolsetManager::new();
        let mut declared = DeclaredTools::new();
        for handler in builtin_handlers(config) {
            let operation: Operation<dyn ToolHandler> = Operation::from_arc(Arc::clone(&handler));
            manager.add(&operation, None, RegistrationParams::default());
            declared.declare(handler.name(), &operation).unwrap();
        }
        Self { manager, declared }
    }

    fn id_of(&self, name: &str) -> toolset_core::OperationId {
        self.declared.get(name).unwrap().id()
    }
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("toolset-mcp.toml");
    fs::write(&path, content).unwrap();
    path
}

fn serve(server: &ToolsetMcpServer, input: &str) -> Vec<Value> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut output = Vec::new();
    runtime
        .block_on(server.run_with(input.as_bytes(), &mut output))
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// =============================================================================
// Activation against a recording host
// =============================================================================

#[test]
fn rds_selection_registers_exactly_the_rds_tools() {
    let config = ServerConfig::default();
    let mut startup = Startup::new(&config);
    let mut host = RecordingHost::new();

    let activation = initialize_toolsets(
        &mut startup.manager,
        &BuiltinGroupLoader::new(),
        &startup.declared,
        &ToolsetSelection::from("rds"),
        &mut host,
    )
    .unwrap();

    let expected = vec![
        startup.id_of("describe_db_instances"),
        startup.id_of("describe_db_instance_attribute"),
    ];
    assert_eq!(host.ids(), expected);
    assert_eq!(activation.ids(), expected);
    assert_eq!(startup.manager.enabled_groups(), vec!["rds"]);
    assert_eq!(
        startup.manager.registered_groups(),
        vec!["custom", "default", "rds"]
    );
}

#[test]
fn loader_moves_custom_echo_out_of_default() {
    let config = ServerConfig::default();
    let mut startup = Startup::new(&config);
    let mut host = RecordingHost::new();

    initialize_toolsets(
        &mut startup.manager,
        &BuiltinGroupLoader::new(),
        &startup.declared,
        &ToolsetSelection::Default,
        &mut host,
    )
    .unwrap();

    let echo = startup.declared.get("custom_echo").unwrap();
    assert_eq!(startup.manager.group_of(echo), Some("custom"));
    assert!(!startup.manager.members("default").contains(&echo));
    assert_eq!(host.ids(), vec![startup.id_of("get_current_time")]);
}

#[test]
fn malformed_selector_enables_named_groups() {
    let config = ServerConfig::default();
    let mut startup = Startup::new(&config);
    let mut host = RecordingHost::new();

    initialize_toolsets(
        &mut startup.manager,
        &BuiltinGroupLoader::new(),
        &startup.declared,
        &ToolsetSelection::from("rds,,custom,"),
        &mut host,
    )
    .unwrap();

    assert_eq!(startup.manager.enabled_groups(), vec!["custom", "rds"]);
    assert_eq!(host.calls().len(), 3);
}

#[test]
fn host_failure_stops_activation() {
    let config = ServerConfig::default();
    let mut startup = Startup::new(&config);
    let mut host = RecordingHost::failing_on(2);

    let err = initialize_toolsets(
        &mut startup.manager,
        &BuiltinGroupLoader::new(),
        &startup.declared,
        &ToolsetSelection::from("rds,custom"),
        &mut host,
    )
    .unwrap_err();

    assert_eq!(
        err,
        HostRejected {
            attempt: 2,
            id: startup.id_of("describe_db_instance_attribute"),
        }
    );
    assert_eq!(host.ids(), vec![startup.id_of("describe_db_instances")]);
}

#[test]
fn config_overrides_apply_after_builtin_assignments() {
    let config = ServerConfig::parse("[groups]\ncustom_echo = \"rds\"\nunknown_tool = \"rds\"\n")
        .unwrap();
    let mut startup = Startup::new(&config);
    let mut host = RecordingHost::new();

    initialize_toolsets(
        &mut startup.manager,
        &BuiltinGroupLoader::with_overrides(config.group_overrides()),
        &startup.declared,
        &ToolsetSelection::from("rds"),
        &mut host,
    )
    .unwrap();

    assert_eq!(host.calls().len(), 3);
    assert!(startup.manager.members("custom").is_empty());
}

// =============================================================================
// Server over stdio
// =============================================================================

#[test]
fn server_from_config_file_serves_selected_toolsets() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
toolsets = ["custom"]

[server]
name = "rds-assistant"
"#,
    );

    let config = ServerConfig::load(&path).unwrap();
    let selection = config.selection(None);
    let mut server = ToolsetMcpServer::with_builtin_tools(config).unwrap();
    server.initialize(&selection).unwrap();

    let responses = serve(
        &server,
        concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"custom_echo","arguments":{"text":"ping"}}}"#,
            "\n",
        ),
    );

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "rds-assistant");
    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "custom_echo");
    assert_eq!(responses[2]["result"]["content"][0]["text"], "custom echo: ping");
}

#[test]
fn command_line_selection_beats_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "toolsets = [\"custom\"]\n");

    let config = ServerConfig::load(&path).unwrap();
    let selection = config.selection(Some("rds"));
    let mut server = ToolsetMcpServer::with_builtin_tools(config).unwrap();
    let activation = server.initialize(&selection).unwrap();
    assert_eq!(activation.len(), 2);

    assert_eq!(
        server.host().names(),
        vec!["describe_db_instances", "describe_db_instance_attribute"]
    );
}
