//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool registry.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters and structured output structs (with JSON schemas)
//! - `execute()` method (core logic, also used by the REST routes)
//! - `call()` method (MCP handler registered in the ToolRegistry)
//!
//! The ToolRouter is built from the registry in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, ServerHandler, handler::server::tool::ToolRouter, model::*,
    tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{ToolContext, ToolRegistry, build_tool_router};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and serves the
/// tool registry over every transport.
#[derive(Clone)]
pub struct McpServer {
    /// Registry of every published tool.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server serving the tools over the given context.
    pub fn new(context: ToolContext) -> Self {
        let registry = Arc::new(ToolRegistry::new(Arc::new(context)));
        Self {
            tool_router: build_tool_router::<Self>(&registry),
            registry,
        }
    }

    /// Build the upstream clients from configuration and create the server.
    pub fn from_config(config: Config) -> super::Result<Self> {
        let context = ToolContext::from_config(Arc::new(config))?;
        Ok(Self::new(context))
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Config {
        self.registry.context_ref().config()
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config().server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config().server.version
    }

    /// Instructions sent to clients on initialize.
    pub fn instructions(&self) -> &str {
        &self.config().server.instructions
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                let mut tool = serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                });
                if let Some(output_schema) = t.output_schema {
                    tool["outputSchema"] = serde_json::Value::Object((*output_schema).clone());
                }
                tool
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, McpError> {
        self.registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
