//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file: params, structured output,
//! `execute()`, the MCP `call()` handler and `to_tool()` metadata.

pub mod bigquery;
pub mod calculator;
pub mod common;
pub mod pokemon;

pub use bigquery::{
    BigQueryRequest, DryRunResult, EstimateCostTool, ExecuteQueryTool, QueryResult,
    TableSchemaRequest, TableSchemaResult, TableSchemaTool,
};
pub use calculator::{MultiplyParams, MultiplyResult, MultiplyTool};
pub use pokemon::{PokemonInfo, PokemonInfoTool, PokemonParams};
