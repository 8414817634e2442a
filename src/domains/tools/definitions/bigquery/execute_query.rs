//! Query execution tool definition.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::BigQueryRequest;
use crate::domains::tools::definitions::common::{parse_arguments, to_call_result};
use crate::domains::tools::{ToolContext, ToolError, ToolFuture};

/// Every row of a finished query, one object per row keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryResult {
    pub row_count: usize,
    pub results: Vec<Map<String, Value>>,
}

impl From<Vec<Map<String, Value>>> for QueryResult {
    fn from(results: Vec<Map<String, Value>>) -> Self {
        Self {
            row_count: results.len(),
            results,
        }
    }
}

/// Execute query tool - runs SQL and returns all rows.
pub struct ExecuteQueryTool;

impl ExecuteQueryTool {
    pub const NAME: &'static str = "execute_bigquery_query";

    pub const DESCRIPTION: &'static str = "Ejecuta una consulta SQL en BigQuery y devuelve todas las filas \
         resultantes. Úsala con cuidado: la consulta se factura según los bytes procesados.";

    #[instrument(skip_all)]
    pub async fn execute(request: &BigQueryRequest, context: &ToolContext) -> Result<QueryResult, ToolError> {
        request.validate()?;

        let rows = context
            .warehouse()
            .run_query(&request.query)
            .await
            .map_err(ToolError::from_warehouse)?;

        info!("Query returned {} rows", rows.len());
        Ok(rows.into())
    }

    pub fn call(arguments: JsonObject, context: Arc<ToolContext>) -> ToolFuture {
        async move {
            let request: BigQueryRequest = parse_arguments(arguments)?;
            to_call_result(Self::execute(&request, &context).await)
        }
        .boxed()
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Arc::new(schema_for_type::<BigQueryRequest>()),
            annotations: None,
            output_schema: Some(Arc::new(schema_for_type::<QueryResult>())),
            icons: None,
            meta: None,
            title: None,
        }
    }
}
