use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::api_key::ApiKeyError;

/// Every way a single generation call can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ApiKeyError),

    #[error("Gemini API error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response contained no text (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    EmptyResponse { finish_reason: Option<String> },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Coarse failure class, used for logging and for picking the user-facing reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    QuotaExceeded,
    Authentication,
    #[serde(rename = "upstream_http")]
    Upstream,
    Network,
    MalformedResponse,
    EmptyResponse,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Upstream => "upstream_http",
            ErrorKind::Network => "network",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Configuration(_) => ErrorKind::Configuration,
            LlmError::Http { .. } if self.is_quota_exceeded() => ErrorKind::QuotaExceeded,
            LlmError::Http { .. } if self.is_auth_failure() => ErrorKind::Authentication,
            LlmError::Http { .. } => ErrorKind::Upstream,
            LlmError::Network(_) => ErrorKind::Network,
            LlmError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            LlmError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            LlmError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// 429, or Google's RESOURCE_EXHAUSTED status in the body
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            LlmError::Http { status, body } => {
                *status == 429 || body.contains("RESOURCE_EXHAUSTED") || body.contains("quota")
            }
            _ => false,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        match self {
            LlmError::Http { status, body } => {
                *status == 401
                    || *status == 403
                    || (*status == 400 && body.contains("API_KEY_INVALID"))
            }
            _ => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> LlmError {
        LlmError::Http {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_quota_detection() {
        assert_eq!(http(429, "").kind(), ErrorKind::QuotaExceeded);
        assert_eq!(
            http(400, r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#).kind(),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn test_auth_detection() {
        assert_eq!(http(403, "forbidden").kind(), ErrorKind::Authentication);
        assert_eq!(
            http(400, r#"{"error":{"details":[{"reason":"API_KEY_INVALID"}]}}"#).kind(),
            ErrorKind::Authentication
        );
    }

    #[test]
    fn test_other_kinds() {
        assert_eq!(http(500, "boom").kind(), ErrorKind::Upstream);
        assert_eq!(
            LlmError::Configuration(ApiKeyError::Missing).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            LlmError::Timeout(Duration::from_secs(30)).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            LlmError::EmptyResponse { finish_reason: Some("SAFETY".into()) }.kind(),
            ErrorKind::EmptyResponse
        );
    }

    #[test]
    fn test_empty_response_message() {
        let err = LlmError::EmptyResponse { finish_reason: None };
        assert_eq!(err.to_string(), "Response contained no text (finish reason: unknown)");
    }
}
