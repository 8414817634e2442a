//! BigQuery tools: dry-run cost estimate, query execution, table schema.

mod common;
pub mod estimate_cost;
pub mod execute_query;
pub mod table_schema;

pub use common::BigQueryRequest;
pub use estimate_cost::{DryRunResult, EstimateCostTool};
pub use execute_query::{ExecuteQueryTool, QueryResult};
pub use table_schema::{ColumnSchema, TableSchemaRequest, TableSchemaResult, TableSchemaTool};
