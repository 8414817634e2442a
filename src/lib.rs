//! Tools Gateway Library
//!
//! A small HTTP service exposing three families of tools, each also
//! published to MCP clients with input and output schemas:
//!
//! - **calculator**: multiply two numbers
//! - **pokemon**: look up a Pokémon on PokeAPI
//! - **bigquery**: dry-run cost estimate, query execution, table schema
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and the
//!   transports (HTTP with REST + JSON-RPC, or STDIO)
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool definitions, registry and router
//!   - **upstream**: HTTP adapters for PokeAPI and the BigQuery REST API
//!
//! # Example
//!
//! ```rust,no_run
//! use tools_gateway::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::from_config(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
