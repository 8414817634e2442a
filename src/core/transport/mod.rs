//! Transport layer for the server.
//!
//! This module provides two transport implementations, selected at runtime
//! with `MCP_TRANSPORT`:
//! - **HTTP** (default): REST routes for every tool, plus JSON-RPC MCP over
//!   POST requests
//! - **STDIO**: Standard input/output MCP, for hosts that spawn the server
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the tool registry.

mod config;
mod error;
pub mod http;
pub mod rest;
mod service;
pub mod stdio;

pub use config::{HttpConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
