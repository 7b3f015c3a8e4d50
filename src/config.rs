//! Connection settings for the notes backend.
//!
//! Settings are resolved once at startup into an [`ApiConfig`] value that is
//! passed to [`ApiClientBuilder`](crate::api::ApiClientBuilder). Nothing here
//! is global: two configs can coexist in one process.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "TAGSWEEP_API_URL";
/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "TAGSWEEP_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "TAGSWEEP_TIMEOUT_SECS";

/// Base URL of the Joplin-style web clipper service.
pub const DEFAULT_API_URL: &str = "http://localhost:41184";
/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Value shipped in sample `.env` files; never a real token.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_API_TOKEN";

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No token was supplied by flag or environment.
    #[error("API token is not set (use --token or {var})", var = TOKEN_VAR)]
    MissingToken,

    /// The token is still the sample placeholder.
    #[error("API token is still the placeholder '{}'", PLACEHOLDER_TOKEN)]
    PlaceholderToken,

    /// The base URL could not be parsed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The timeout was zero or not a number.
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Resolved backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    token: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Returns a builder seeded with nothing; unset fields fall back to the environment.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token appended to every request as the `token` query parameter.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for [`ApiConfig`].
///
/// # Examples
///
/// ```
/// use tagsweep::ApiConfig;
///
/// let config = ApiConfig::builder()
///     .base_url("http://localhost:41184/")
///     .token("abc123")
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.base_url(), "http://localhost:41184");
/// ```
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ApiConfigBuilder {
    /// Creates a new `ApiConfigBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL, overriding `TAGSWEEP_API_URL`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API token, overriding `TAGSWEEP_TOKEN`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout, overriding `TAGSWEEP_TIMEOUT_SECS`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves and validates the configuration.
    ///
    /// # Environment Variables
    ///
    /// Each field not set on the builder is read from its environment
    /// variable (`TAGSWEEP_API_URL`, `TAGSWEEP_TOKEN`,
    /// `TAGSWEEP_TIMEOUT_SECS`). URL and timeout then fall back to
    /// [`DEFAULT_API_URL`] and [`DEFAULT_TIMEOUT`]; the token has no default.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the token is missing or still the
    /// placeholder, the URL does not parse, or the timeout is not a positive
    /// integer.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let token = match self.token {
            Some(token) => token,
            None => std::env::var(TOKEN_VAR).unwrap_or_default(),
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if token == PLACEHOLDER_TOKEN {
            return Err(ConfigError::PlaceholderToken);
        }

        let timeout = match self.timeout {
            Some(timeout) if timeout.is_zero() => {
                return Err(ConfigError::InvalidTimeout("0".to_string()));
            }
            Some(timeout) => timeout,
            None => match std::env::var(TIMEOUT_VAR) {
                Ok(raw) => parse_timeout(&raw)?,
                Err(_) => DEFAULT_TIMEOUT,
            },
        };

        Ok(ApiConfig {
            base_url,
            token,
            timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
