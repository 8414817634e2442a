//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, built once at startup
//! - Dispatch for tool calls coming from the HTTP JSON-RPC transport
//! - Tool metadata for listing
//!
//! The rmcp router used by the STDIO transport is built from the same
//! entries (see `router.rs`), so both transports always expose the same set.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject, Tool},
};
use tracing::{debug, warn};

use super::ToolContext;
use super::definitions::{
    EstimateCostTool, ExecuteQueryTool, MultiplyTool, PokemonInfoTool, TableSchemaTool,
};

/// Future returned by every tool handler.
pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, McpError>>;

/// Signature shared by the `call()` function of every tool definition.
pub type ToolHandlerFn = fn(JsonObject, Arc<ToolContext>) -> ToolFuture;

/// One registered tool: its metadata and its handler.
#[derive(Clone)]
pub struct ToolEntry {
    pub tool: Tool,
    pub handler: ToolHandlerFn,
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    context: Arc<ToolContext>,
    entries: BTreeMap<&'static str, ToolEntry>,
}

impl ToolRegistry {
    /// Create the registry with every tool this server publishes.
    pub fn new(context: Arc<ToolContext>) -> Self {
        let mut registry = Self {
            context,
            entries: BTreeMap::new(),
        };
        registry.register(MultiplyTool::NAME, MultiplyTool::to_tool(), MultiplyTool::call);
        registry.register(PokemonInfoTool::NAME, PokemonInfoTool::to_tool(), PokemonInfoTool::call);
        registry.register(EstimateCostTool::NAME, EstimateCostTool::to_tool(), EstimateCostTool::call);
        registry.register(ExecuteQueryTool::NAME, ExecuteQueryTool::to_tool(), ExecuteQueryTool::call);
        registry.register(TableSchemaTool::NAME, TableSchemaTool::to_tool(), TableSchemaTool::call);
        registry
    }

    fn register(&mut self, name: &'static str, tool: Tool, handler: ToolHandlerFn) {
        debug!("Registering tool: {}", name);
        self.entries.insert(name, ToolEntry { tool, handler });
    }

    /// Shared dependencies passed to every handler.
    pub fn context(&self) -> Arc<ToolContext> {
        self.context.clone()
    }

    /// Borrow the shared context without cloning the `Arc`.
    pub fn context_ref(&self) -> &ToolContext {
        &self.context
    }

    /// Get all tool names, sorted.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.entries.values().map(|e| e.tool.clone()).collect()
    }

    /// Registered entries, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &ToolEntry> {
        self.entries.values()
    }

    /// Dispatch a tool call and return the serialized `CallToolResult`.
    ///
    /// Unknown tools and protocol-level failures (invalid arguments) are
    /// returned as `Err` with a message for the JSON-RPC error object.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, McpError> {
        let Some(entry) = self.entries.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(McpError::invalid_params(format!("Unknown tool: {name}"), None));
        };

        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            other => {
                return Err(McpError::invalid_params(
                    format!("Tool arguments must be an object, got {other}"),
                    None,
                ));
            }
        };

        let result = (entry.handler)(arguments, self.context()).await?;
        serde_json::to_value(result).map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}
