//! HTTP transport for the Zendesk API.
//!
//! [`HttpTransport`] implements [`Transport`] on top of reqwest. It owns
//! authentication, URL resolution and the mapping of HTTP failures onto
//! [`ZendeskError`].
//!
//! # Failure handling
//!
//! Failures are classified and returned, never retried here:
//! - HTTP 401/403: `Authentication`
//! - HTTP 404: `NotFound`
//! - HTTP 429: `RateLimited`, with the `Retry-After` delay when sent
//! - HTTP 502/503/504: `ServiceUnavailable`
//! - any other non-2xx: `Api`
//!
//! Every variant built from a response keeps the parsed error body.
//!
//! # Security
//!
//! Credentials are never logged. Error bodies are scrubbed and truncated
//! before they are stored in an error.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::{Config, Credentials};
use crate::error::ZendeskError;
use crate::models::ApiErrorBody;
use crate::path::ApiPath;
use crate::registry::EndpointGroup;
use crate::transport::{ApiRequest, Target, Transport};

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("zdesk/", env!("CARGO_PKG_VERSION"));

/// Maximum length for error response bodies kept in errors.
const MAX_ERROR_BODY_LEN: usize = 500;

/// reqwest-backed transport bound to one endpoint group.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let transport = HttpTransport::new(&config)?;
/// let me = transport.get(ApiPath::new().lit("users").lit("me")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL of the endpoint group, without a trailing slash.
    base_url: String,

    /// Parsed form of `base_url` for host checks.
    base: Url,

    /// Group the base URL belongs to.
    group: EndpointGroup,

    /// SECURITY: Never log these.
    credentials: Credentials,

    /// `X-On-Behalf-Of` value.
    as_user: Option<String>,

    /// Per-request timeout, reported in `Timeout` errors.
    timeout: Duration,

    /// Whether to append `.json` to paths.
    dot_json: bool,
}

impl HttpTransport {
    /// Creates a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if no base URL can be derived, or
    /// `ZendeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ZendeskError> {
        let base_url = config.base_url()?;
        let base = Url::parse(&base_url)
            .map_err(|e| ZendeskError::invalid_config(format!("invalid base URL: {}", e)))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ZendeskError::HttpClient)?;

        tracing::debug!(
            base_url = %base_url,
            group = %config.endpoint_group,
            "HTTP transport ready"
        );

        Ok(Self {
            http,
            base_url,
            base,
            group: config.endpoint_group,
            credentials: config.credentials.clone(),
            as_user: config.as_user.clone(),
            timeout: config.timeout,
            dot_json: config.dot_json,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the secret for scrubbing error messages.
    ///
    /// This should ONLY be used for sanitization, never for logging.
    pub(crate) fn secret_for_sanitization(&self) -> &str {
        self.credentials.secret()
    }

    /// Checks that the API is reachable and the credentials work.
    ///
    /// Uses `users/me` on the core group; other groups have no cheap
    /// authenticated probe and are not checked.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the probe request.
    pub async fn test_connection(&self) -> Result<(), ZendeskError> {
        if self.group != EndpointGroup::Core {
            tracing::debug!(group = %self.group, "No connection probe for this group");
            return Ok(());
        }

        let me = self.get(ApiPath::new().lit("users").lit("me")).await?;
        let user_id = me.pointer("/user/id").and_then(Value::as_u64);
        match user_id {
            Some(id) => {
                tracing::info!(user_id = id, "Connection test successful");
                Ok(())
            }
            // An anonymous session answers 200 with a null user id.
            None => Err(ZendeskError::Authentication {
                status: StatusCode::UNAUTHORIZED,
                body: me,
            }),
        }
    }

    /// Resolves a target to an absolute URL.
    ///
    /// Absolute URLs must stay on the configured host so next-page links
    /// cannot redirect credentials elsewhere.
    fn resolve(&self, target: &Target) -> Result<String, ZendeskError> {
        match target {
            Target::Path(path) => Ok(format!(
                "{}/{}",
                self.base_url,
                path.render(self.dot_json)
            )),
            Target::Url(raw) => {
                let url = Url::parse(raw)
                    .map_err(|e| ZendeskError::validation(format!("invalid page URL: {}", e)))?;
                if url.host() != self.base.host()
                    || url.port_or_known_default() != self.base.port_or_known_default()
                {
                    return Err(ZendeskError::validation(format!(
                        "page URL host mismatch: expected {:?}, got {:?}",
                        self.base.host_str(),
                        url.host_str()
                    )));
                }
                Ok(url.into())
            }
        }
    }

    /// Adds authentication headers.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.credentials {
            Credentials::ApiToken { username, token } => {
                request.basic_auth(format!("{}/token", username), Some(token))
            }
            Credentials::Password { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::OAuth { token } => request.bearer_auth(token),
        };
        match &self.as_user {
            Some(user) => request.header("X-On-Behalf-Of", user),
            None => request,
        }
    }

    /// Performs one request without any retry.
    async fn execute(&self, request: ApiRequest) -> Result<Value, ZendeskError> {
        let url = self.resolve(&request.target)?;
        let operation = request.describe();

        tracing::debug!(
            method = %request.method,
            target = %operation,
            "Making Zendesk API request"
        );

        let mut builder = self
            .authorize(self.http.request(request.method.clone(), &url))
            .header("Accept", "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                return ZendeskError::timeout(self.timeout, operation.clone());
            }
            ZendeskError::Http(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response, &operation).await);
        }

        let body = response.text().await.map_err(ZendeskError::Http)?;

        tracing::trace!(body = %body, "Zendesk API response");

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        // Exports and a few legacy endpoints answer with plain text.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    /// Converts a non-success response into a `ZendeskError`.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        operation: &str,
    ) -> ZendeskError {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let body = ZendeskError::sanitize_message(&body, self.credentials.secret());
        let body = parse_error_body(truncate_body(body));

        if let Some(error) = ApiErrorBody::from_value(&body) {
            tracing::debug!(status = %status, error = %error.summary(), "Zendesk API error");
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::warn!(status = %status, "Zendesk rejected the request credentials");
                ZendeskError::Authentication { status, body }
            }
            StatusCode::NOT_FOUND => ZendeskError::NotFound {
                path: operation.to_string(),
                body,
            },
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!(retry_after = ?retry_after, "Rate limited by Zendesk");
                ZendeskError::RateLimited { retry_after, body }
            }
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                tracing::warn!(status = %status, "Zendesk temporarily unavailable");
                ZendeskError::ServiceUnavailable { status, body }
            }
            _ => ZendeskError::Api { status, body },
        }
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Value, ZendeskError>> + Send {
        self.execute(request)
    }
}

/// Parses an error body as JSON, keeping plain text as a string.
fn parse_error_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

/// Truncates at a char boundary and marks the cut.
fn truncate_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body;
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_transport(dot_json: bool) -> HttpTransport {
        let config = Config::new(
            "acme",
            Credentials::ApiToken {
                username: "agent@acme.com".to_string(),
                token: "test_token_123".to_string(),
            },
        )
        .unwrap()
        .with_dot_json(dot_json);
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_resolve_path() {
        let transport = test_transport(true);
        let target = Target::Path(ApiPath::new().lit("views").id(12345));
        assert_eq!(
            transport.resolve(&target).unwrap(),
            "https://acme.zendesk.com/api/v2/views/12345.json"
        );

        let transport = test_transport(false);
        assert_eq!(
            transport.resolve(&target).unwrap(),
            "https://acme.zendesk.com/api/v2/views/12345"
        );
    }

    #[test]
    fn test_resolve_same_host_url() {
        let transport = test_transport(true);
        let target = Target::Url("https://acme.zendesk.com/api/v2/views.json?page=2".to_string());
        assert_eq!(
            transport.resolve(&target).unwrap(),
            "https://acme.zendesk.com/api/v2/views.json?page=2"
        );
    }

    #[test]
    fn test_resolve_rejects_foreign_host() {
        let transport = test_transport(true);
        let target = Target::Url("https://evil.example.com/api/v2/views.json?page=2".to_string());
        let err = transport.resolve(&target).unwrap_err();
        assert!(matches!(err, ZendeskError::Validation(_)));
        assert!(err.to_string().contains("host mismatch"));
    }

    #[test]
    fn test_nps_without_endpoint_fails() {
        let config = Config::new(
            "acme",
            Credentials::OAuth {
                token: "oauth-abc".to_string(),
            },
        )
        .unwrap()
        .with_endpoint_group(EndpointGroup::Nps);
        let err = HttpTransport::new(&config).err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_truncate_body_respects_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY_LEN);
        let truncated = truncate_body(body);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() <= MAX_ERROR_BODY_LEN + "...[truncated]".len());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let transport = test_transport(true);
        let shown = format!("{:?}", transport);
        assert!(!shown.contains("test_token_123"));
        assert!(shown.contains("[REDACTED]"));
    }

    #[test]
    fn test_parse_error_body() {
        assert_eq!(parse_error_body(String::new()), Value::Null);
        assert_eq!(parse_error_body("oops".to_string()), Value::String("oops".to_string()));
        assert_eq!(
            parse_error_body(r#"{"error":"Forbidden"}"#.to_string()),
            serde_json::json!({"error": "Forbidden"})
        );
    }

    #[test]
    fn test_truncate_body_short_untouched() {
        assert_eq!(truncate_body("short".to_string()), "short");
    }
}
