//! Configuration management for the zdesk client.
//!
//! Configuration is loaded from environment variables (optionally via a
//! `.env` file) or built programmatically. Values are validated up front so
//! a bad setup fails before the first request.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ZendeskError;
use crate::registry::EndpointGroup;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How requests authenticate.
///
/// Secrets are never printed; `Debug` shows only the scheme and username.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Basic auth as `{username}/token:{token}`.
    ApiToken {
        /// Agent email address.
        username: String,
        /// API token.
        token: String,
    },
    /// Basic auth as `{username}:{password}`.
    Password {
        /// Agent email address.
        username: String,
        /// Account password.
        password: String,
    },
    /// `Authorization: Bearer {token}`.
    OAuth {
        /// OAuth access token.
        token: String,
    },
}

impl Credentials {
    /// The secret part of the credentials.
    pub fn secret(&self) -> &str {
        match self {
            Credentials::ApiToken { token, .. } => token,
            Credentials::Password { password, .. } => password,
            Credentials::OAuth { token } => token,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiToken { username, .. } => f
                .debug_struct("ApiToken")
                .field("username", username)
                .field("token", &"[REDACTED]")
                .finish(),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Credentials::OAuth { .. } => f
                .debug_struct("OAuth")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Configuration for one endpoint group of one account.
#[derive(Debug, Clone)]
pub struct Config {
    /// Account subdomain (`acme` for `acme.zendesk.com`).
    pub subdomain: Option<String>,

    /// Full base URL overriding the one derived from the subdomain.
    pub endpoint_uri: Option<String>,

    /// Endpoint group the client talks to.
    pub endpoint_group: EndpointGroup,

    /// Authentication.
    pub credentials: Credentials,

    /// Optional user ID or email to act on behalf of (`X-On-Behalf-Of`).
    pub as_user: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to append `.json` to request paths.
    pub dot_json: bool,
}

impl Config {
    /// Creates a configuration for an account subdomain on the core group.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if the subdomain or credentials are invalid.
    pub fn new(
        subdomain: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, ZendeskError> {
        let subdomain = Self::validate_subdomain(subdomain.into())?;
        Self::validate_credentials(&credentials)?;
        Ok(Self {
            subdomain: Some(subdomain),
            endpoint_uri: None,
            endpoint_group: EndpointGroup::Core,
            credentials,
            as_user: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dot_json: true,
        })
    }

    /// Switches the endpoint group.
    pub fn with_endpoint_group(mut self, group: EndpointGroup) -> Self {
        self.endpoint_group = group;
        self
    }

    /// Overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if the URL is not http(s).
    pub fn with_endpoint_uri(mut self, uri: impl Into<String>) -> Result<Self, ZendeskError> {
        self.endpoint_uri = Some(Self::validate_endpoint_uri(uri.into())?);
        Ok(self)
    }

    /// Acts on behalf of another user.
    pub fn with_as_user(mut self, user: impl Into<String>) -> Self {
        self.as_user = Some(user.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables the `.json` path suffix.
    pub fn with_dot_json(mut self, enabled: bool) -> Self {
        self.dot_json = enabled;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ZENDESK_SUBDOMAIN` or `ZENDESK_ENDPOINT_URI` (at least one)
    /// - `ZENDESK_ENDPOINT_GROUP`: `core` (default), `helpcenter`, `nps`, `services`, `voice`
    /// - `ZENDESK_OAUTH_TOKEN`, or `ZENDESK_USERNAME` with `ZENDESK_TOKEN` or `ZENDESK_PASSWORD`
    /// - `ZENDESK_AS_USER` (optional)
    /// - `ZENDESK_TIMEOUT_SECS` (optional)
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if a required variable is missing or a
    /// value fails validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, ZendeskError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ZendeskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let subdomain = get("ZENDESK_SUBDOMAIN")
            .map(Self::validate_subdomain)
            .transpose()?;
        let endpoint_uri = get("ZENDESK_ENDPOINT_URI")
            .map(Self::validate_endpoint_uri)
            .transpose()?;
        if subdomain.is_none() && endpoint_uri.is_none() {
            return Err(ZendeskError::missing_env("ZENDESK_SUBDOMAIN"));
        }

        let endpoint_group = match get("ZENDESK_ENDPOINT_GROUP") {
            Some(group) => group.parse::<EndpointGroup>()?,
            None => EndpointGroup::Core,
        };

        let credentials = if let Some(token) = get("ZENDESK_OAUTH_TOKEN") {
            Credentials::OAuth { token }
        } else {
            let username = get("ZENDESK_USERNAME")
                .ok_or_else(|| ZendeskError::missing_env("ZENDESK_USERNAME"))?;
            match (get("ZENDESK_TOKEN"), get("ZENDESK_PASSWORD")) {
                (Some(token), _) => Credentials::ApiToken { username, token },
                (None, Some(password)) => Credentials::Password { username, password },
                (None, None) => return Err(ZendeskError::missing_env("ZENDESK_TOKEN")),
            }
        };
        Self::validate_credentials(&credentials)?;

        let timeout = match get("ZENDESK_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse().map_err(|_| {
                    ZendeskError::invalid_config(
                        "ZENDESK_TIMEOUT_SECS must be a whole number of seconds",
                    )
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            subdomain,
            endpoint_uri,
            endpoint_group,
            credentials,
            as_user: get("ZENDESK_AS_USER"),
            timeout,
            dot_json: true,
        })
    }

    /// Base URL for the configured group, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` when neither an endpoint URI nor a
    /// default endpoint for the group is available.
    pub fn base_url(&self) -> Result<String, ZendeskError> {
        if let Some(uri) = &self.endpoint_uri {
            return Ok(uri.clone());
        }
        let subdomain = self
            .subdomain
            .as_deref()
            .ok_or_else(|| ZendeskError::missing_env("ZENDESK_SUBDOMAIN"))?;
        self.endpoint_group.base_url(subdomain)
    }

    /// Strings that must be scrubbed from logs and error messages.
    pub fn secrets(&self) -> Vec<&str> {
        vec![self.credentials.secret()]
    }

    /// Subdomains are a single DNS label.
    fn validate_subdomain(subdomain: String) -> Result<String, ZendeskError> {
        let subdomain = subdomain.trim().to_ascii_lowercase();
        let valid = !subdomain.is_empty()
            && subdomain
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !subdomain.starts_with('-')
            && !subdomain.ends_with('-');
        if !valid {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_SUBDOMAIN must be a bare subdomain such as 'acme', not a URL",
            ));
        }
        Ok(subdomain)
    }

    /// Validates and normalizes an endpoint URI.
    fn validate_endpoint_uri(uri: String) -> Result<String, ZendeskError> {
        let uri = uri.trim().trim_end_matches('/').to_string();
        if !uri.starts_with("http://") && !uri.starts_with("https://") {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_ENDPOINT_URI must start with http:// or https://",
            ));
        }
        url::Url::parse(&uri)
            .map_err(|e| ZendeskError::invalid_config(format!("ZENDESK_ENDPOINT_URI: {}", e)))?;
        Ok(uri)
    }

    /// Rejects placeholder secrets copied from documentation.
    fn validate_credentials(credentials: &Credentials) -> Result<(), ZendeskError> {
        let secret = credentials.secret().to_lowercase();
        let placeholder_patterns = [
            "your_token",
            "your_api_token",
            "placeholder",
            "changeme",
            "xxx",
        ];

        if placeholder_patterns
            .iter()
            .any(|pattern| secret.contains(*pattern))
        {
            return Err(ZendeskError::invalid_config(
                "Zendesk credentials appear to be a placeholder value",
            ));
        }
        Ok(())
    }
}
