//! Dry-run cost estimate tool definition.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::BigQueryRequest;
use crate::domains::tools::definitions::common::{parse_arguments, round_to, to_call_result};
use crate::domains::tools::{ToolContext, ToolError, ToolFuture};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const BYTES_PER_TIB: f64 = BYTES_PER_GIB * 1024.0;

/// Bytes a query would scan and what that costs on-demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DryRunResult {
    pub bytes_processed: u64,
    /// Binary gigabytes, 4 decimals.
    pub gigabytes_processed: f64,
    /// Binary terabytes, 6 decimals.
    pub terabytes_processed: f64,
    /// Dollar amount such as `$6.0000`.
    pub cost_usd_estimate: String,
    pub message: String,
}

impl DryRunResult {
    /// Derive the sizes and cost from a byte count. The cost uses the
    /// unrounded terabyte figure.
    pub fn from_bytes(bytes: u64, usd_per_tib: f64) -> Self {
        let terabytes = bytes as f64 / BYTES_PER_TIB;
        Self {
            bytes_processed: bytes,
            gigabytes_processed: round_to(bytes as f64 / BYTES_PER_GIB, 4),
            terabytes_processed: round_to(terabytes, 6),
            cost_usd_estimate: format!("${:.4}", terabytes * usd_per_tib),
            message: "Estimación completada exitosamente.".to_string(),
        }
    }
}

/// Estimate cost tool - BigQuery dry run.
pub struct EstimateCostTool;

impl EstimateCostTool {
    pub const NAME: &'static str = "estimate_bigquery_cost";

    pub const DESCRIPTION: &'static str = "Estima el costo de una consulta SQL de BigQuery mediante un dry run, \
         sin ejecutarla. Devuelve los bytes que se procesarían y el costo aproximado en USD.";

    #[instrument(skip_all)]
    pub async fn execute(request: &BigQueryRequest, context: &ToolContext) -> Result<DryRunResult, ToolError> {
        request.validate()?;

        let bytes = context
            .warehouse()
            .dry_run(&request.query)
            .await
            .map_err(ToolError::from_warehouse)?;

        let result = DryRunResult::from_bytes(bytes, context.config().bigquery.usd_per_tib);
        info!(
            "Dry run: {} bytes, estimated cost {}",
            result.bytes_processed, result.cost_usd_estimate
        );
        Ok(result)
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
            output_schema: Some(Arc::new(schema_for_type::<DryRunResult>())),
            icons: None,
            meta: None,
            title: None,
        }
    }
}
