//! HTTP client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for HTTP client operations.
pub type Result<T> = std::result::Result<T, HttpClientError>;

/// HTTP client errors.
///
/// Every variant renders a human-readable message through `Display`, so
/// callers that only care about text can keep using `to_string()`. Callers
/// that need to branch should match on the variant instead.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The server answered 404 for the requested path.
    #[error("Resource not found at {path}")]
    NotFound {
        /// Request path (including any query string) that was attempted.
        path: String,
    },

    /// The server answered with a non-2xx status other than 404.
    #[error("HTTP error occurred: {status} - {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
    },

    /// A response body could not be decoded as JSON.
    #[error("Failed to decode the response as JSON.")]
    Decode,

    /// The exchange failed before a response could be classified.
    #[error("An unexpected error occurred: {0}")]
    Transport(String),

    /// The exchange exceeded the configured timeout.
    #[error("An unexpected error occurred: request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The method string is not a valid HTTP method token.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A header name or value could not be represented on the wire.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Params did not serialize to a JSON object.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Params were set but the method/content type cannot carry them.
    #[error("Params cannot be sent with {method} and content type {content_type:?}")]
    UnsupportedParams {
        /// Request method.
        method: String,
        /// Effective `Content-Type` header, if any.
        content_type: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpClientError {
    /// Check if this is a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if the failure happened on the network rather than in the response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Check if the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode)
    }

    /// Get the HTTP status code if this error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map a reqwest failure, attributing timeouts to the configured duration.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Transport(error_chain(&err))
        }
    }
}

/// Render an error together with its sources, e.g.
/// `error sending request: connection refused`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_text_fallback() {
        let err = HttpClientError::NotFound {
            path: "/v1/users/42".to_string(),
        };
        assert_eq!(err.to_string(), "Resource not found at /v1/users/42");

        let err = HttpClientError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error occurred: 500 - Internal Server Error"
        );

        assert_eq!(
            HttpClientError::Decode.to_string(),
            "Failed to decode the response as JSON."
        );

        let err = HttpClientError::Transport("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "An unexpected error occurred: connection refused"
        );
    }

    #[test]
    fn test_status_code() {
        let not_found = HttpClientError::NotFound {
            path: "/x".to_string(),
        };
        assert_eq!(not_found.status_code(), Some(404));
        assert!(not_found.is_not_found());

        let status = HttpClientError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(status.status_code(), Some(503));
        assert!(!status.is_transport());

        assert_eq!(HttpClientError::Decode.status_code(), None);
    }

    #[test]
    fn test_transport_kinds() {
        assert!(HttpClientError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(HttpClientError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(HttpClientError::Transport("dns".into()).is_transport());
        assert!(!HttpClientError::Transport("dns".into()).is_timeout());
        assert!(HttpClientError::Decode.is_decode());
    }

    #[test]
    fn test_error_chain_skips_repeated_text() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(error_chain(&io), "refused");
    }
}
