//! BigQuery adapter.
//!
//! - `client.rs` - REST client implementing [`WarehouseApi`](super::WarehouseApi)
//! - `auth.rs` - static token or Application Default Credentials
//! - `model.rs` - wire types for the v2 REST API
//! - `rows.rs` - row materialization into JSON objects

mod auth;
mod client;
pub mod model;
pub mod rows;

use chrono::{DateTime, Utc};

pub use auth::{BIGQUERY_SCOPE, Credentials};
pub use client::BigQueryClient;
pub use model::TableFieldSchema;

/// Fully-qualified address of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// Table metadata as read from `tables.get`.
#[derive(Debug, Clone, Default)]
pub struct TableMetadata {
    /// Top-level schema fields in declared order.
    pub fields: Vec<TableFieldSchema>,
    pub num_rows: Option<u64>,
    pub num_bytes: Option<u64>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}
