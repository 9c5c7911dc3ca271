//! MCP server serving a Rig `ToolSet` over stdio.

use crate::tools::AddWordTool;
use easyvocab_enrichment::Enricher;
use rig::completion::ToolDefinition;
use rig::tool::{ToolSet, ToolSetError};
use rmcp::RoleServer;
use rmcp::service::RequestContext;
use rmcp::{
    ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Content, ErrorData, JsonObject, ListToolsResult,
        PaginatedRequestParams, Tool as McpTool,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name the server reports to MCP clients.
pub const SERVER_NAME: &str = "easyvocab";

const INSTRUCTIONS: &str = "Call add_word with an English word or phrase to get its CEFR level, \
                            frequency data, translation and usage examples.";

/// MCP server handler exposing vocabulary tools.
pub struct VocabMcpHandler {
    toolset: ToolSet,
    /// The name of the server (e.g. "easyvocab").
    pub name: String,
    /// Pre-computed tool definitions.
    pub tool_definitions: Vec<McpTool>,
}

impl VocabMcpHandler {
    /// Creates a handler from a `ToolSet`, extracting its tool definitions.
    ///
    /// # Errors
    /// Returns `ToolSetError` if fetching tool definitions from the `ToolSet` fails.
    pub async fn from_toolset(toolset: ToolSet) -> Result<Self, ToolSetError> {
        let definitions = toolset.get_tool_definitions().await?;
        let tool_definitions = definitions.into_iter().map(Self::definition_to_mcp).collect();
        Ok(Self {
            toolset,
            name: SERVER_NAME.to_string(),
            tool_definitions,
        })
    }

    /// Creates a handler serving `add_word` over the given enricher.
    ///
    /// # Errors
    /// See [`Self::from_toolset`].
    pub async fn for_enricher(enricher: Arc<Enricher>) -> Result<Self, ToolSetError> {
        let mut toolset = ToolSet::default();
        toolset.add_tool(AddWordTool::new(enricher));
        Self::from_toolset(toolset).await
    }

    /// Overrides the reported server name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Converts a Rig `ToolDefinition` into an MCP tool definition.
    #[must_use]
    pub fn definition_to_mcp(definition: ToolDefinition) -> McpTool {
        let input_schema = if let Value::Object(map) = definition.parameters {
            Arc::new(map)
        } else {
            Arc::new(JsonObject::new())
        };

        McpTool {
            name: Cow::Owned(definition.name.clone()),
            title: Some(definition.name),
            description: Some(Cow::Owned(definition.description)),
            input_schema,
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        }
    }

    /// Runs a tool by name. Failures become error results, never protocol errors.
    pub async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        let args = arguments.map_or_else(
            || "{}".to_string(),
            |a| Value::Object(a.clone()).to_string(),
        );

        tracing::debug!(event = "tool_call", tool_name = %name, "tool_call");

        match self.toolset.call(name, args).await {
            Ok(output) => CallToolResult::success(vec![Content::text(output)]),
            Err(e) => {
                tracing::error!(
                    event = "tool_call_failed",
                    tool_name = %name,
                    error = %e,
                    "tool_call_failed"
                );
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }

    /// Describes how an MCP client should launch this binary.
    ///
    /// # Errors
    /// Returns an error if the current executable path cannot be determined.
    pub fn client_config(&self) -> Result<McpConfig, std::io::Error> {
        let exe = std::env::current_exe()?;
        Ok(McpConfig {
            name: self.name.clone(),
            command: exe.to_string_lossy().to_string(),
            args: vec!["serve".to_string()],
            env: BTreeMap::from([(
                "OPENROUTER_API_KEY".to_string(),
                "<your OpenRouter key>".to_string(),
            )]),
        })
    }

    /// Serves the MCP protocol over stdio until the client disconnects.
    ///
    /// Stdout carries the protocol, so logging must go to stderr.
    ///
    /// # Errors
    /// Returns an error if the server fails to initialize or if the connection is lost.
    pub async fn serve_stdio(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(
            event = "mcp_server_starting",
            name = %self.name,
            tools = self.tool_definitions.len(),
            "mcp_server_starting"
        );
        let (stdin, stdout) = rmcp::transport::io::stdio();
        let service = rmcp::ServiceExt::serve(self, (stdin, stdout)).await?;
        service.waiting().await?;
        Ok(())
    }
}

/// Launch configuration for registering the server with an MCP client.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct McpConfig {
    /// The name of the server (e.g. "easyvocab").
    pub name: String,
    /// The absolute path to the executable.
    pub command: String,
    /// Arguments to pass to the executable.
    pub args: Vec<String>,
    /// Environment variables for the server process.
    pub env: BTreeMap<String, String>,
}

impl McpConfig {
    /// The `mcpServers` JSON object understood by most MCP clients.
    #[must_use]
    pub fn to_mcp_servers_json(&self) -> Value {
        serde_json::json!({
            "mcpServers": {
                &self.name: {
                    "command": &self.command,
                    "args": &self.args,
                    "env": &self.env
                }
            }
        })
    }

    /// The `[mcp_servers.<name>]` TOML table form.
    #[must_use]
    pub fn to_toml(&self) -> String {
        use std::fmt::Write;

        let mut toml = format!(
            "[mcp_servers.{}]\ncommand = {:?}\nargs = {:?}\n",
            self.name, self.command, self.args
        );
        if !self.env.is_empty() {
            let _ = writeln!(toml, "\n[mcp_servers.{}.env]", self.name);
            for (k, v) in &self.env {
                let _ = writeln!(toml, "{k} = {v:?}");
            }
        }
        toml
    }
}

impl ServerHandler for VocabMcpHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2024_11_05,
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: rmcp::model::Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                website_url: None,
                icons: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: rmcp::model::InitializeRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<rmcp::model::InitializeResult, ErrorData> {
        Ok(self.get_info())
    }

    #[tracing::instrument(skip(self, _request, _context), fields(rpc.method = "list_tools"))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tool_definitions.clone(),
            next_cursor: None,
            meta: None,
        })
    }

    #[tracing::instrument(skip(self, request, _context), fields(rpc.method = "call_tool", tool.name = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.dispatch(&request.name, request.arguments.as_ref()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_to_mcp_keeps_schema_object() {
        let tool = VocabMcpHandler::definition_to_mcp(ToolDefinition {
            name: "add_word".to_string(),
            description: "Enrich a word".to_string(),
            parameters: json!({"type": "object", "properties": {"word": {"type": "string"}}}),
        });
        assert_eq!(tool.name, "add_word");
        assert_eq!(tool.input_schema["type"], "object");
        assert!(tool.input_schema.contains_key("properties"));
    }

    #[test]
    fn test_non_object_parameters_become_empty_schema() {
        let tool = VocabMcpHandler::definition_to_mcp(ToolDefinition {
            name: "x".to_string(),
            description: String::new(),
            parameters: Value::Null,
        });
        assert!(tool.input_schema.is_empty());
    }

    #[test]
    fn test_client_config_formats() {
        let config = McpConfig {
            name: "easyvocab".to_string(),
            command: "/usr/local/bin/easyvocab".to_string(),
            args: vec!["serve".to_string()],
            env: BTreeMap::from([("OPENROUTER_API_KEY".to_string(), "sk-or".to_string())]),
        };

        let json = config.to_mcp_servers_json();
        assert_eq!(json["mcpServers"]["easyvocab"]["command"], "/usr/local/bin/easyvocab");
        assert_eq!(json["mcpServers"]["easyvocab"]["args"][0], "serve");
        assert_eq!(json["mcpServers"]["easyvocab"]["env"]["OPENROUTER_API_KEY"], "sk-or");

        let toml = config.to_toml();
        assert!(toml.starts_with("[mcp_servers.easyvocab]\ncommand = \"/usr/local/bin/easyvocab\"\n"));
        assert!(toml.contains("args = [\"serve\"]"));
        assert!(toml.contains("[mcp_servers.easyvocab.env]\nOPENROUTER_API_KEY = \"sk-or\""));
    }
}
