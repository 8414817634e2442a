//! Table schema tool definition.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::FutureExt;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::tools::definitions::common::{parse_arguments, require_text, to_call_result};
use crate::domains::tools::{ToolContext, ToolError, ToolFuture};
use crate::domains::upstream::bigquery::TableFieldSchema;
use crate::domains::upstream::{TableMetadata, TableRef};

/// Address of the table to describe.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSchemaRequest {
    #[schemars(description = "Google Cloud project that owns the dataset")]
    pub project_id: String,
    #[schemars(description = "Dataset containing the table")]
    pub dataset_id: String,
    #[schemars(description = "Table name")]
    pub table_id: String,
}

impl TableSchemaRequest {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_text("project_id", &self.project_id)?;
        require_text("dataset_id", &self.dataset_id)?;
        require_text("table_id", &self.table_id)
    }

    fn table_ref(&self) -> TableRef {
        TableRef::new(
            self.project_id.trim(),
            self.dataset_id.trim(),
            self.table_id.trim(),
        )
    }
}

/// One top-level column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&TableFieldSchema> for ColumnSchema {
    fn from(field: &TableFieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            mode: field.mode(),
            description: field.description.clone(),
        }
    }
}

/// Column list plus table statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchemaResult {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    pub columns: Vec<ColumnSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// RFC 3339, UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// RFC 3339, UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl TableSchemaResult {
    fn new(table: TableRef, metadata: TableMetadata) -> Self {
        Self {
            project_id: table.project_id,
            dataset_id: table.dataset_id,
            table_id: table.table_id,
            columns: metadata.fields.iter().map(ColumnSchema::from).collect(),
            num_rows: metadata.num_rows,
            size_bytes: metadata.num_bytes,
            created: metadata.created.map(rfc3339),
            modified: metadata.modified.map(rfc3339),
        }
    }
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Table schema tool - describes a table's columns.
pub struct TableSchemaTool;

impl TableSchemaTool {
    pub const NAME: &'static str = "get_bigquery_table_schema";

    pub const DESCRIPTION: &'static str =
        "Devuelve el esquema (columnas, tipos y modos) y las estadísticas básicas de una tabla de BigQuery.";

    #[instrument(skip_all, fields(dataset = %request.dataset_id, table = %request.table_id))]
    pub async fn execute(
        request: &TableSchemaRequest,
        context: &ToolContext,
    ) -> Result<TableSchemaResult, ToolError> {
        request.validate()?;

        let table = request.table_ref();
        let metadata = context
            .warehouse()
            .table_metadata(&table)
            .await
            .map_err(ToolError::from_warehouse)?;

        info!("Table {} has {} columns", table, metadata.fields.len());
        Ok(TableSchemaResult::new(table, metadata))
    }

    pub fn call(arguments: JsonObject, context: Arc<ToolContext>) -> ToolFuture {
        async move {
            let request: TableSchemaRequest = parse_arguments(arguments)?;
            to_call_result(Self::execute(&request, &context).await)
        }
        .boxed()
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Arc::new(schema_for_type::<TableSchemaRequest>()),
            annotations: None,
            output_schema: Some(Arc::new(schema_for_type::<TableSchemaResult>())),
            icons: None,
            meta: None,
            title: None,
        }
    }
}
