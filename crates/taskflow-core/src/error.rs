//! Error contract for remote API calls.
//!
//! The gateway is the only place HTTP and transport failures are classified.
//! Feature clients and callers see a single structured error type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categories of API errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Non-2xx HTTP status from the server
    HttpStatus,
    /// Connection or request timeout
    Timeout,
    /// Connection-level failure (DNS, TLS, refused, ...)
    Transport,
    /// Response body could not be decoded
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the remote API with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, preferring the server's own message.
    ///
    /// The message comes from the decoded body's `message` or `error` field
    /// when present, else a generic status-derived string.
    pub fn http_status(status: u16, status_text: &str, body: &serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .or_else(|| body.get("error").and_then(serde_json::Value::as_str))
            .map_or_else(
                || format!("HTTP Error {status}: {status_text}"),
                str::to_string,
            );
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            details: Some(body.to_string()),
        }
    }

    /// Creates a parse error for an undecodable response body.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Classifies a reqwest-level send failure.
    pub fn transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ApiErrorKind::Timeout, format!("Request timed out: {err}"))
        } else {
            Self::new(ApiErrorKind::Transport, format!("Request failed: {err}"))
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_prefers_message_field() {
        let body = serde_json::json!({"message": "Not found"});
        let err = ApiError::http_status(404, "Not Found", &body);
        assert_eq!(err.message, "Not found");
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
    }

    #[test]
    fn test_http_status_falls_back_to_error_field() {
        let body = serde_json::json!({"error": "project limit reached"});
        let err = ApiError::http_status(409, "Conflict", &body);
        assert_eq!(err.message, "project limit reached");
    }

    #[test]
    fn test_http_status_synthesizes_generic_message() {
        let body = serde_json::json!({"detail": "ignored"});
        let err = ApiError::http_status(403, "Forbidden", &body);
        assert_eq!(err.message, "HTTP Error 403: Forbidden");
        assert!(err.details.as_deref().unwrap().contains("ignored"));
    }
}
