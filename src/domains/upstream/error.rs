//! Upstream adapter error types.

use thiserror::Error;

/// Errors raised while talking to an external service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The requested resource does not exist upstream (HTTP 404).
    #[error("resource not found upstream")]
    NotFound,

    /// The upstream answered with a non-success status and no usable error body.
    #[error("upstream responded with HTTP {status}")]
    Status { status: u16 },

    /// The upstream API rejected the call and explained why.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Credentials could not be resolved or a token could not be minted.
    #[error("credentials unavailable: {0}")]
    Credentials(String),

    /// Connection, TLS, or body transfer failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with something we could not interpret.
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    /// A configured base URL cannot be used to build request URLs.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    /// Create a new "invalid response" error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a new "credentials" error.
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Whether the upstream API itself rejected the request.
    pub fn is_api_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_upstream_message() {
        let err = UpstreamError::Api {
            status: 400,
            message: "Syntax error: Unexpected end of script".to_string(),
        };
        assert_eq!(err.to_string(), "Syntax error: Unexpected end of script");
        assert!(err.is_api_rejection());
    }

    #[test]
    fn test_other_errors_are_not_rejections() {
        assert!(!UpstreamError::NotFound.is_api_rejection());
        assert!(!UpstreamError::Status { status: 503 }.is_api_rejection());
        assert!(!UpstreamError::credentials("no ADC").is_api_rejection());
    }
}
