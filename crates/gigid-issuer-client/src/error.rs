//! Issuer client error types.

use crate::config::ConfigError;

/// Errors from issuer API calls.
///
/// Every variant is terminal for the call that produced it: the client never
/// retries. Callers that batch calls decide what a failure means for them.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    /// No response within the configured timeout.
    #[error("issuer did not answer {endpoint} within {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// The issuer returned a non-2xx status.
    #[error("issuer {endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// The issuer answered 2xx but did not report a usable success.
    #[error("issuer rejected {endpoint}: {message}")]
    Rejected { endpoint: String, message: String },
    /// A 2xx response body could not be decoded.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl IssuanceError {
    /// Human-readable reason, preferring the issuer's own message.
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status reported by the issuer, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_transport(endpoint: &str, timeout_secs: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
                timeout_secs,
            }
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }
}

/// Extract the issuer's `message` field from an error body, falling back to
/// the raw body text.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => format!("HTTP {status}"),
        None => body.to_string(),
    }
}
