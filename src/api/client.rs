//! Blocking HTTP client for the notes backend.
//!
//! Every request carries the configured token as a `token` query parameter
//! and is bounded by the configured timeout.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;

/// Connect timeout; the overall request timeout comes from [`ApiConfig`].
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when talking to the notes backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-related errors (connection refused, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP error: status {status} for {endpoint}")]
    Http { status: u16, endpoint: String },

    /// Response body was not the expected JSON
    #[error("Could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns the HTTP status if the backend answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend reported 409 Conflict.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT.as_u16())
    }

    /// Wraps a transport error, dropping the request URL since it carries the token.
    fn from_reqwest(error: reqwest::Error) -> Self {
        let error = error.without_url();
        if error.is_timeout() {
            ApiError::Timeout(error)
        } else {
            ApiError::Network(error)
        }
    }
}

/// Trait for notes backend operations.
///
/// Endpoints are paths relative to the base URL, optionally with a query
/// string (`/notes?page=2&fields=id,title,body`). Implementations return the
/// raw response body of a successful call and map everything else to
/// [`ApiError`].
///
/// This trait enables mocking in unit tests.
pub trait NotesApi: Send + Sync {
    /// Issues a GET request.
    fn get(&self, endpoint: &str) -> Result<String, ApiError>;

    /// Issues a POST request with a JSON body.
    fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<String, ApiError>;
}

/// Builder for constructing `ApiClient` instances.
///
/// # Examples
///
/// ```
/// use tagsweep::{ApiClientBuilder, ApiConfig};
///
/// let config = ApiConfig::builder()
///     .base_url("http://localhost:41184")
///     .token("abc123")
///     .build()
///     .expect("valid config");
///
/// let client = ApiClientBuilder::new(config)
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:41184");
/// ```
#[derive(Debug)]
pub struct ApiClientBuilder {
    config: ApiConfig,
}

impl ApiClientBuilder {
    /// Creates a builder for the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Builds the `ApiClient`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL does not parse and
    /// `ApiError::Network` if the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        reqwest::Url::parse(self.config.base_url())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.config.base_url(), e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout())
            .connect_timeout(CONNECT_TIMEOUT.min(self.config.timeout()))
            .build()
            .map_err(ApiError::Network)?;

        Ok(ApiClient {
            client,
            config: self.config,
        })
    }
}

/// Synchronous HTTP client for the notes backend.
///
/// Construct it with [`ApiClientBuilder`].
pub struct ApiClient {
    client: reqwest::blocking::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url(), endpoint)
    }

    /// Sends a prepared request and returns the body of a 2xx response.
    fn execute(
        &self,
        request: reqwest::blocking::RequestBuilder,
        endpoint: &str,
    ) -> Result<String, ApiError> {
        let response = request
            .query(&[("token", self.config.token())])
            .send()
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "backend responded");
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        response.text().map_err(ApiError::from_reqwest)
    }
}

impl NotesApi for ApiClient {
    fn get(&self, endpoint: &str) -> Result<String, ApiError> {
        self.execute(self.client.get(self.url(endpoint)), endpoint)
    }

    fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<String, ApiError> {
        self.execute(self.client.post(self.url(endpoint)).json(body), endpoint)
    }
}
