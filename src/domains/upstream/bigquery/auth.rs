//! BigQuery credentials.
//!
//! Application Default Credentials are resolved on first use and shared for
//! the life of the process, so the server starts (and the other tools work)
//! without any Google credentials present.

use std::sync::Arc;

use gcp_auth::TokenProvider;
use tokio::sync::OnceCell;
use tracing::info;

use crate::domains::upstream::UpstreamError;

/// OAuth scope for the BigQuery API.
pub const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

/// Source of bearer tokens for BigQuery calls.
pub enum Credentials {
    /// A fixed access token supplied by configuration.
    Static(String),

    /// Application Default Credentials, resolved lazily.
    ApplicationDefault(OnceCell<Arc<dyn TokenProvider>>),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Credentials::Static([REDACTED])"),
            Self::ApplicationDefault(cell) => f
                .debug_struct("Credentials::ApplicationDefault")
                .field("resolved", &cell.initialized())
                .finish(),
        }
    }
}

impl Credentials {
    /// Static token when one is configured, ADC otherwise.
    pub fn from_config(access_token: Option<&str>) -> Self {
        match access_token {
            Some(token) if !token.trim().is_empty() => Self::Static(token.trim().to_string()),
            _ => Self::ApplicationDefault(OnceCell::new()),
        }
    }

    async fn provider(
        cell: &OnceCell<Arc<dyn TokenProvider>>,
    ) -> Result<&Arc<dyn TokenProvider>, UpstreamError> {
        cell.get_or_try_init(|| async {
            gcp_auth::provider()
                .await
                .inspect(|_| info!("Resolved Google Application Default Credentials"))
                .map_err(|e| UpstreamError::credentials(e.to_string()))
        })
        .await
    }

    /// A bearer token valid for the BigQuery scope.
    pub async fn bearer_token(&self) -> Result<String, UpstreamError> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ApplicationDefault(cell) => {
                let token = Self::provider(cell)
                    .await?
                    .token(&[BIGQUERY_SCOPE])
                    .await
                    .map_err(|e| UpstreamError::credentials(e.to_string()))?;
                Ok(token.as_str().to_string())
            }
        }
    }

    /// The project the credentials belong to, when they carry one.
    pub async fn project_id(&self) -> Result<Option<String>, UpstreamError> {
        match self {
            Self::Static(_) => Ok(None),
            Self::ApplicationDefault(cell) => {
                let project = Self::provider(cell)
                    .await?
                    .project_id()
                    .await
                    .map_err(|e| UpstreamError::credentials(e.to_string()))?;
                Ok(Some(project.to_string()))
            }
        }
    }
}
