//! BigQuery REST v2 client.
//!
//! Covers the three calls the tools need: `jobs.query` (dry run and real
//! execution), `jobs.getQueryResults` (completion wait and pagination) and
//! `tables.get`. Query text is forwarded verbatim.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use super::auth::Credentials;
use super::model::{
    DataFormatOptions, ErrorEnvelope, JobReference, QueryRequestBody, QueryResponse,
    TableResource, TableSchema,
};
use super::rows::{parse_epoch_millis, row_to_object};
use super::{TableMetadata, TableRef};
use crate::core::config::BigQueryConfig;
use crate::domains::upstream::{UpstreamError, WarehouseApi};

/// How long the server may hold a `jobs.query` / `getQueryResults` call while
/// waiting for the job to finish. Incomplete jobs are polled again.
const WAIT_TIMEOUT_MS: u64 = 10_000;

/// BigQuery REST client. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct BigQueryClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    project_id: Option<String>,
    location: Option<String>,
}

impl BigQueryClient {
    /// Create a client from configuration.
    pub fn new(http: reqwest::Client, config: &BigQueryConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(config.api_url.trim_end_matches('/'))
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            credentials: Credentials::from_config(config.access_token.as_deref()),
            project_id: config.project_id.clone(),
            location: config.location.clone(),
        })
    }

    /// Build `{base}/seg1/seg2/...`, encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Project that runs the query jobs.
    async fn billing_project(&self) -> Result<String, UpstreamError> {
        if let Some(project) = &self.project_id {
            return Ok(project.clone());
        }
        self.credentials.project_id().await?.ok_or_else(|| {
            UpstreamError::credentials(
                "no BigQuery project configured; set MCP_BIGQUERY_PROJECT_ID or GOOGLE_CLOUD_PROJECT",
            )
        })
    }

    /// Authenticate, send, and decode; error statuses become `UpstreamError::Api`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, UpstreamError> {
        let token = self.credentials.bearer_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::invalid_response(e.to_string()))
    }

    async fn get_query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, UpstreamError> {
        let url = self.endpoint(&["projects", &job.project_id, "queries", &job.job_id])?;

        let mut params: Vec<(&str, String)> = vec![
            ("timeoutMs", WAIT_TIMEOUT_MS.to_string()),
            ("formatOptions.useInt64Timestamp", "true".to_string()),
        ];
        if let Some(location) = &job.location {
            params.push(("location", location.clone()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        debug!(job_id = %job.job_id, page_token, "GET query results");
        self.send(self.http.get(url).query(&params)).await
    }
}

#[async_trait]
impl WarehouseApi for BigQueryClient {
    #[instrument(skip_all)]
    async fn dry_run(&self, sql: &str) -> Result<u64, UpstreamError> {
        let project = self.billing_project().await?;
        let url = self.endpoint(&["projects", &project, "queries"])?;
        let body = QueryRequestBody {
            query: sql,
            use_legacy_sql: false,
            dry_run: true,
            use_query_cache: Some(false),
            timeout_ms: None,
            location: self.location.as_deref(),
            format_options: None,
        };

        let response: QueryResponse = self.send(self.http.post(url).json(&body)).await?;
        let bytes = response.total_bytes_processed.ok_or_else(|| {
            UpstreamError::invalid_response("dry run did not report totalBytesProcessed")
        })?;

        bytes
            .parse::<u64>()
            .map_err(|e| UpstreamError::invalid_response(format!("totalBytesProcessed {bytes:?}: {e}")))
    }

    #[instrument(skip_all)]
    async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>, UpstreamError> {
        let project = self.billing_project().await?;
        let url = self.endpoint(&["projects", &project, "queries"])?;
        let body = QueryRequestBody {
            query: sql,
            use_legacy_sql: false,
            dry_run: false,
            use_query_cache: None,
            timeout_ms: Some(WAIT_TIMEOUT_MS),
            location: self.location.as_deref(),
            format_options: Some(DataFormatOptions {
                use_int64_timestamp: true,
            }),
        };

        let mut page: QueryResponse = self.send(self.http.post(url).json(&body)).await?;
        let job = page
            .job_reference
            .take()
            .ok_or_else(|| UpstreamError::invalid_response("query response has no jobReference"))?;

        let mut schema: Option<TableSchema> = None;
        let mut rows = Vec::new();

        loop {
            let complete = page.job_complete.unwrap_or(false);

            let next_token = if complete {
                if let Some(s) = page.schema.take() {
                    schema = Some(s);
                }
                let fields = schema.as_ref().map(|s| s.fields.as_slice()).unwrap_or(&[]);
                for row in page.rows.take().unwrap_or_default() {
                    rows.push(row_to_object(fields, &row)?);
                }

                match page.page_token.take() {
                    Some(token) => Some(token),
                    None => break,
                }
            } else {
                debug!(job_id = %job.job_id, "Job still running, waiting");
                None
            };

            page = self.get_query_results(&job, next_token.as_deref()).await?;
        }

        info!(job_id = %job.job_id, rows = rows.len(), "Query job finished");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, UpstreamError> {
        let url = self.endpoint(&[
            "projects",
            &table.project_id,
            "datasets",
            &table.dataset_id,
            "tables",
            &table.table_id,
        ])?;

        let resource: TableResource = self.send(self.http.get(url)).await?;

        Ok(TableMetadata {
            fields: resource.schema.map(|s| s.fields).unwrap_or_default(),
            num_rows: resource.num_rows.as_deref().and_then(|n| n.parse().ok()),
            num_bytes: resource.num_bytes.as_deref().and_then(|n| n.parse().ok()),
            created: resource.creation_time.as_deref().and_then(parse_epoch_millis),
            modified: resource
                .last_modified_time
                .as_deref()
                .and_then(parse_epoch_millis),
        })
    }
}

/// Turn an error response into `UpstreamError::Api`, preferring the message
/// from the Google error envelope.
fn api_error(status: StatusCode, body: &str) -> UpstreamError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match body.trim() {
            "" => status.to_string(),
            text => format!("{status}: {text}"),
        });

    UpstreamError::Api {
        status: status.as_u16(),
        message,
    }
}
