//! Tool-specific error types.
//!
//! Every tool failure is one of these variants; the transports map them to an
//! HTTP status (REST) or to an MCP error / error result.

use thiserror::Error;

use crate::domains::upstream::UpstreamError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid arguments were provided to the tool.
    #[error("{0}")]
    InvalidArguments(String),

    /// The named resource does not exist upstream.
    #[error("{0}")]
    NotFound(String),

    /// The upstream service rejected the request as invalid.
    #[error("{0}")]
    Rejected(String),

    /// The upstream service failed with a status we do not translate.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Anything else: network failure, credentials, malformed responses.
    #[error("{0}")]
    Unexpected(String),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "unexpected" error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Two-tier translation used by the BigQuery tools: API rejections become
    /// client faults, everything else is unexpected.
    pub fn from_warehouse(err: UpstreamError) -> Self {
        if err.is_api_rejection() {
            Self::Rejected(format!("Error de BigQuery: {err}"))
        } else {
            Self::Unexpected(format!("Un error inesperado ocurrió: {err}"))
        }
    }

    /// HTTP status code for this error on the REST surface.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidArguments(_) => 422,
            Self::Rejected(_) => 400,
            Self::Upstream { .. } => 502,
            Self::Unexpected(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ToolError::invalid_arguments("bad").status_code(), 422);
        assert_eq!(ToolError::not_found("gone").status_code(), 404);
        assert_eq!(ToolError::Rejected("no".into()).status_code(), 400);
        assert_eq!(
            ToolError::Upstream { status: 503, message: "down".into() }.status_code(),
            502
        );
        assert_eq!(ToolError::unexpected("boom").status_code(), 500);
    }

    #[test]
    fn test_warehouse_rejection_is_client_fault() {
        let err = ToolError::from_warehouse(UpstreamError::Api {
            status: 403,
            message: "Access Denied: Project p".to_string(),
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Error de BigQuery: Access Denied: Project p");
    }

    #[test]
    fn test_warehouse_other_failure_is_unexpected() {
        let err = ToolError::from_warehouse(UpstreamError::credentials("no ADC found"));
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Un error inesperado ocurrió: "));
        assert!(err.to_string().contains("no ADC found"));
    }
}
