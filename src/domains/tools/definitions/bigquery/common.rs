//! Request model shared by the BigQuery query tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::require_text;

/// A single SQL statement in standard SQL. Forwarded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BigQueryRequest {
    #[schemars(description = "SQL query in BigQuery standard SQL")]
    pub query: String,
}

impl BigQueryRequest {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_text("query", &self.query)
    }
}
