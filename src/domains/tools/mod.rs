//! Tools domain module.
//!
//! Tools are executable functions that clients call either through the
//! REST routes or through MCP (`tools/list`, `tools/call`).
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central tool registry, built once, and JSON-RPC dispatch
//! - `router.rs` - rmcp ToolRouter built from the registry (STDIO transport)
//! - `context.rs` - Shared upstream clients and configuration
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with params, output, `execute()`,
//!    `call()` and `to_tool()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `ToolRegistry::new`
//!
//! The router and both transports pick it up from the registry.

mod context;
pub mod definitions;
mod error;
mod registry;
pub mod router;
#[cfg(test)]
pub(crate) mod testing;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::{ToolEntry, ToolFuture, ToolHandlerFn, ToolRegistry};
pub use router::build_tool_router;
