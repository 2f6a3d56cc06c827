//! MCP Server implementation
//!
//! The server owns the toolset registry. Tools are declared into it at
//! construction time, and [`ToolsetMcpServer::initialize`] activates the
//! selected toolsets exactly once. Only activated tools are visible to
//! clients.

use std::io::{BufRead, Write};

use serde_json::{Value, json};
use toolset_core::{
    Activation, DeclaredTools, GroupLoader, Operation, RegistrationParams, ToolsetManager,
    ToolsetSelection, initialize_toolsets,
};

use crate::builtin::{BuiltinGroupLoader, builtin_handlers};
use crate::config::ServerConfig;
use crate::host::McpToolHost;
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, METHOD_NOT_FOUND, PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolsCapability,
};
use crate::tools::{ToolHandler, ToolOperation, ToolResult, tool_operation};
use crate::{Error, Result};

/// MCP server backed by a toolset registry
///
/// # Example
///
/// ```ignore
/// use toolset_mcp::{ServerConfig, ToolsetMcpServer};
/// use toolset_core::ToolsetSelection;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut server = ToolsetMcpServer::with_builtin_tools(ServerConfig::default())?;
///     server.initialize(&ToolsetSelection::from("rds,custom"))?;
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct ToolsetMcpServer {
    config: ServerConfig,
    manager: ToolsetManager<dyn ToolHandler>,
    declared: DeclaredTools<dyn ToolHandler>,
    host: McpToolHost,
    activation: Option<Activation>,
}

impl ToolsetMcpServer {
    /// Create a server with no tools declared
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            manager: ToolsetManager::new(),
            declared: DeclaredTools::new(),
            host: McpToolHost::new(),
            activation: None,
        }
    }

    /// Create a server with every built-in tool declared into the default group
    pub fn with_builtin_tools(config: ServerConfig) -> Result<Self> {
        let handlers = builtin_handlers(&config);
        let mut server = Self::new(config);
        for handler in handlers {
            let operation = Operation::from_arc(handler);
            server.declare(&operation, None, RegistrationParams::default())?;
        }
        Ok(server)
    }

    /// Declare a handler and add it to `group` (or the default group)
    ///
    /// Returns the operation handle so callers can reassign it later.
    pub fn tool<H: ToolHandler + 'static>(
        &mut self,
        handler: H,
        group: Option<&str>,
        params: RegistrationParams,
    ) -> Result<ToolOperation> {
        let operation = tool_operation(handler);
        self.declare(&operation, group, params)?;
        Ok(operation)
    }

    /// Declare an existing operation under its handler name
    pub fn declare(
        &mut self,
        operation: &ToolOperation,
        group: Option<&str>,
        params: RegistrationParams,
    ) -> Result<()> {
        self.declared.declare(operation.name(), operation)?;
        self.manager.add(operation, group, params);
        Ok(())
    }

    /// Activate the selected toolsets using the built-in group loader
    pub fn initialize(&mut self, selection: &ToolsetSelection) -> Result<&Activation> {
        let loader = BuiltinGroupLoader::with_overrides(self.config.group_overrides());
        self.initialize_with(&loader, selection)
    }

    /// Activate the selected toolsets using a custom group loader
    ///
    /// Fails with [`Error::AlreadyInitialized`] on a second call. A host
    /// registration failure is returned as-is and leaves the server
    /// uninitialized.
    pub fn initialize_with<L>(
        &mut self,
        loader: &L,
        selection: &ToolsetSelection,
    ) -> Result<&Activation>
    where
        L: GroupLoader<dyn ToolHandler> + ?Sized,
    {
        if self.activation.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        tracing::info!(server = %self.config.server.name, "Initializing MCP server");

        let activation = initialize_toolsets(
            &mut self.manager,
            loader,
            &self.declared,
            selection,
            &mut self.host,
        )?;
        tracing::info!(
            tools = activation.len(),
            groups = ?self.manager.enabled_groups(),
            "Toolsets activated"
        );
        Ok(&*self.activation.insert(activation))
    }

    /// Run the MCP server over stdin/stdout
    pub async fn run(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_with(stdin.lock(), stdout.lock()).await
    }

    /// Serve line-delimited JSON-RPC messages from `reader` until EOF
    pub async fn run_with<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        tracing::info!("MCP server ready, listening on stdio");

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            match self.handle_message(&line).await {
                Ok(response) if !response.is_empty() => {
                    writeln!(writer, "{}", response)?;
                    writer.flush()?;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to handle message");
                    let error_response =
                        JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Internal error: {}", e));
                    writeln!(writer, "{}", serde_json::to_string(&error_response)?)?;
                    writer.flush()?;
                }
            }
        }

        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Returns the JSON-RPC response, or an empty string for notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = serde_json::from_str(message)?;

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if let Ok(params) = serde_json::from_value::<InitializeParams>(params) {
            if let Some(client) = params.client_info {
                tracing::info!(
                    client = %client.name,
                    version = %client.version,
                    protocol = ?params.protocol_version,
                    "Client connected"
                );
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.config.server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        if !self.is_initialized() {
            return Ok(not_initialized(id));
        }
        let tools: Vec<Value> = self
            .host
            .definitions()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?;
        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if !self.is_initialized() {
            return Ok(not_initialized(id));
        }
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        // Tool failures are reported in-band so the client can show them
        let result = match self.host.call(&params.name, params.arguments).await {
            Ok(value) => ToolResult::from_value(value)?,
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool call failed");
                ToolResult::error(e.to_string())
            }
        };
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn manager(&self) -> &ToolsetManager<dyn ToolHandler> {
        &self.manager
    }

    /// Mutable registry access; group changes only take effect before activation
    pub fn manager_mut(&mut self) -> &mut ToolsetManager<dyn ToolHandler> {
        &mut self.manager
    }

    pub fn declared(&self) -> &DeclaredTools<dyn ToolHandler> {
        &self.declared
    }

    pub fn host(&self) -> &McpToolHost {
        &self.host
    }

    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    /// Check if toolsets have been activated
    pub fn is_initialized(&self) -> bool {
        self.activation.is_some()
    }
}

fn not_initialized(id: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse::error(id, INTERNAL_ERROR, Error::NotInitialized.to_string())
}
