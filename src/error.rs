//! Error types for the zdesk client.
//!
//! This module defines `ZendeskError`, the unified error type returned by the
//! registry, the transport and every resource client.
//!
//! # Security
//!
//! Credentials must never reach logs or error text. Use `sanitize_message()`
//! on anything built from a remote response before storing it in an error.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all zdesk operations.
///
/// Resource clients never inspect or recover from these; whatever the
/// transport produces is handed back to the caller unchanged.
#[derive(Error, Debug)]
pub enum ZendeskError {
    /// Configuration error: missing environment variables, an unknown
    /// endpoint group, or a resource name the registry does not know.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The structured error body (or the raw text wrapped in a JSON string).
        body: serde_json::Value,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation})")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// Rate limited by the server (HTTP 429).
    #[error("rate limited by server: {body}")]
    RateLimited {
        /// Delay requested through the `Retry-After` header, if any.
        retry_after: Option<Duration>,
        /// The scrubbed response body.
        body: serde_json::Value,
    },

    /// Server temporarily unavailable (HTTP 502/503/504).
    #[error("service temporarily unavailable ({status}): {body}")]
    ServiceUnavailable {
        /// The specific status code.
        status: reqwest::StatusCode,
        /// The scrubbed response body.
        body: serde_json::Value,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested resource does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The request that returned 404.
        path: String,
        /// The scrubbed response body (`null` when none was sent).
        body: serde_json::Value,
    },

    /// The credentials were rejected (401) or lack permission (403).
    #[error("authentication failed ({status}): {body}")]
    Authentication {
        /// 401 or 403.
        status: reqwest::StatusCode,
        /// The scrubbed response body.
        body: serde_json::Value,
    },

    /// Tool input validation failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ZendeskError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        ZendeskError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ZendeskError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ZendeskError::Validation(message.into())
    }

    /// Creates a not found error for a request path.
    pub fn not_found(path: impl Into<String>) -> Self {
        ZendeskError::NotFound {
            path: path.into(),
            body: serde_json::Value::Null,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        ZendeskError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Returns true for configuration errors raised before any request.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, ZendeskError::Config(_))
    }

    /// Returns the HTTP status carried by this error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ZendeskError::Api { status, .. }
            | ZendeskError::ServiceUnavailable { status, .. }
            | ZendeskError::Authentication { status, .. } => Some(*status),
            ZendeskError::RateLimited { .. } => Some(reqwest::StatusCode::TOO_MANY_REQUESTS),
            ZendeskError::NotFound { .. } => Some(reqwest::StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Returns the remote response body carried by this error.
    #[must_use]
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ZendeskError::Api { body, .. }
            | ZendeskError::RateLimited { body, .. }
            | ZendeskError::ServiceUnavailable { body, .. }
            | ZendeskError::NotFound { body, .. }
            | ZendeskError::Authentication { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Replaces every occurrence of `secret` in `message` with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }

    /// Display text of this error with every secret scrubbed.
    #[must_use]
    pub fn sanitized_display(&self, secrets: &[&str]) -> String {
        secrets
            .iter()
            .fold(self.to_string(), |msg, secret| Self::sanitize_message(&msg, secret))
    }
}
