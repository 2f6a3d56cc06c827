//! Integration tests for the toolset-mcp binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

const LIST: &str = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n";

/// Get a Command for the toolset-mcp binary
fn mcp_cmd() -> Command {
    let mut cmd = Command::cargo_bin("toolset-mcp").expect("Failed to find toolset-mcp binary");
    cmd.env_remove("MCP_TOOLSETS").env_remove("TOOLSET_MCP_CONFIG");
    cmd
}

#[test]
fn test_help_mentions_toolsets() {
    mcp_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--toolsets"))
        .stdout(predicate::str::contains("MCP_TOOLSETS"));
}

#[test]
fn test_default_toolset_lists_only_default_tools() {
    mcp_cmd()
        .write_stdin(LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("get_current_time"))
        .stdout(predicate::str::contains("custom_echo").not());
}

#[test]
fn test_toolsets_flag() {
    mcp_cmd()
        .args(["--toolsets", "custom"])
        .write_stdin(LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom_echo"))
        .stdout(predicate::str::contains("get_current_time").not());
}

#[test]
fn test_toolsets_env_var() {
    mcp_cmd()
        .env("MCP_TOOLSETS", "rds")
        .write_stdin(LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("describe_db_instances"))
        .stdout(predicate::str::contains("custom_echo").not());
}

#[test]
fn test_config_file_toolsets() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "toolsets = [\"custom\"]").unwrap();

    mcp_cmd()
        .arg("--config")
        .arg(file.path())
        .write_stdin(LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom_echo"));
}

#[test]
fn test_missing_config_file_fails() {
    mcp_cmd()
        .args(["--config", "/nonexistent/toolset-mcp.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/toolset-mcp.toml"));
}

#[test]
fn test_logs_go_to_stderr() {
    mcp_cmd()
        .write_stdin(LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting toolset-mcp").not())
        .stderr(predicate::str::contains("Starting toolset-mcp"));
}
