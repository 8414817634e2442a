//! BigQuery v2 REST wire types.
//!
//! Only the fields this server reads or writes are modeled; unknown fields are
//! ignored on the way in. int64 values travel as JSON strings, as the API
//! encodes them.

use serde::{Deserialize, Serialize};

/// Body of `jobs.query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequestBody<'a> {
    pub query: &'a str,
    pub use_legacy_sql: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_query_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_options: Option<DataFormatOptions>,
}

/// `DataFormatOptions`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFormatOptions {
    pub use_int64_timestamp: bool,
}

/// Response of `jobs.query` and `jobs.getQueryResults`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResponse {
    pub job_reference: Option<JobReference>,
    pub job_complete: Option<bool>,
    pub schema: Option<TableSchema>,
    pub rows: Option<Vec<TableRow>>,
    pub page_token: Option<String>,
    pub total_rows: Option<String>,
    pub total_bytes_processed: Option<String>,
}

/// `JobReference`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// `TableSchema`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

/// `TableFieldSchema`.
#[derive(Debug, Clone, Deserialize)]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Sub-fields of RECORD/STRUCT columns.
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

impl TableFieldSchema {
    /// Field mode, upper-cased, defaulting to `NULLABLE`.
    pub fn mode(&self) -> String {
        self.mode
            .as_deref()
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| "NULLABLE".to_string())
    }

    pub fn is_repeated(&self) -> bool {
        self.mode() == "REPEATED"
    }

    pub fn is_record(&self) -> bool {
        matches!(
            self.field_type.to_ascii_uppercase().as_str(),
            "RECORD" | "STRUCT"
        )
    }
}

/// `TableRow`: one cell per schema field, in schema order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

/// `TableCell`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: serde_json::Value,
}

/// `Table` resource returned by `tables.get`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableResource {
    pub schema: Option<TableSchema>,
    pub num_rows: Option<String>,
    pub num_bytes: Option<String>,
    pub creation_time: Option<String>,
    pub last_modified_time: Option<String>,
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_dry_run_shape() {
        let body = QueryRequestBody {
            query: "SELECT 1",
            use_legacy_sql: false,
            dry_run: true,
            use_query_cache: Some(false),
            timeout_ms: None,
            location: None,
            format_options: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "query": "SELECT 1",
                "useLegacySql": false,
                "dryRun": true,
                "useQueryCache": false
            })
        );
    }

    #[test]
    fn test_field_mode_defaults_to_nullable() {
        let field: TableFieldSchema =
            serde_json::from_str(r#"{"name": "id", "type": "INTEGER"}"#).unwrap();
        assert_eq!(field.mode(), "NULLABLE");
        assert!(!field.is_repeated());
        assert!(!field.is_record());
    }

    #[test]
    fn test_query_response_ignores_unknown_fields() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"kind": "bigquery#queryResponse", "jobComplete": true, "totalBytesProcessed": "42", "cacheHit": false}"#,
        )
        .unwrap();
        assert_eq!(response.job_complete, Some(true));
        assert_eq!(response.total_bytes_processed.as_deref(), Some("42"));
        assert!(response.rows.is_none());
    }
}
