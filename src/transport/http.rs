//! HTTP transport backed by `reqwest`.
//!
//! [`HttpConfig`] is the transport prototype: it holds the template
//! configuration and implements [`TransportFactory`], building a fresh,
//! independent [`HttpTransport`] (with its own `reqwest::Client`) for every
//! pool slot.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use hal_navigator::HttpConfig;
//!
//! let config = HttpConfig::new()
//!     .with_request_timeout(Duration::from_secs(10))
//!     .with_error_for_status();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};

use super::client::{Payload, Transport, TransportFactory};

// ============================================================================
// Constants
// ============================================================================

/// Default `Accept` header sent with every request.
pub const DEFAULT_ACCEPT: &str = "application/hal+json, application/json";

/// Default maximum number of redirects followed.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default `User-Agent` header.
const DEFAULT_USER_AGENT: &str = concat!("hal-navigator/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HttpConfig
// ============================================================================

/// Template configuration for [`HttpTransport`] instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Follow redirects (up to `max_redirects`).
    pub follow_redirects: bool,

    /// Maximum redirect hops when following.
    pub max_redirects: usize,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,

    /// `Accept` header value.
    pub accept: String,

    /// `User-Agent` header value.
    pub user_agent: String,

    /// Turn 4xx/5xx responses into [`Error::Http`].
    pub error_for_status: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            request_timeout: None,
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            error_for_status: false,
        }
    }
}

// ============================================================================
// HttpConfig - Builder Methods
// ============================================================================

impl HttpConfig {
    /// Creates a configuration with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables redirect following.
    #[inline]
    #[must_use]
    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Sets the maximum redirect hops.
    #[inline]
    #[must_use]
    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Sets the per-request timeout.
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the `Accept` header.
    #[inline]
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Sets the `User-Agent` header.
    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Fails requests whose response status is 4xx or 5xx.
    #[inline]
    #[must_use]
    pub fn with_error_for_status(mut self) -> Self {
        self.error_for_status = true;
        self
    }
}

// ============================================================================
// HttpConfig - Client Construction
// ============================================================================

impl HttpConfig {
    /// Builds a new `reqwest::Client` from this configuration.
    fn build_client(&self) -> Result<Client> {
        let accept = HeaderValue::from_str(&self.accept)
            .map_err(|e| Error::config(format!("Invalid Accept header: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, accept);

        let redirect = if self.follow_redirects {
            Policy::limited(self.max_redirects)
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .redirect(redirect)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers);

        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

impl TransportFactory for HttpConfig {
    fn create(&self) -> Result<Box<dyn Transport>> {
        let transport = HttpTransport::new(self.clone())?;
        debug!(
            follow_redirects = self.follow_redirects,
            "Created HTTP transport"
        );
        Ok(Box::new(transport))
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// HTTP transport instance owning its own `reqwest::Client`.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Creates a transport from `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if a header value is invalid
    /// - [`Error::Http`] if the client cannot be built (e.g. TLS backend)
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Returns the configuration this transport was built from.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Reads the body, honoring `error_for_status`.
    async fn read_body(&self, response: Response) -> Result<Bytes> {
        let response = if self.config.error_for_status {
            response.error_for_status()?
        } else {
            response
        };

        let status = response.status();
        let body = response.bytes().await?;
        trace!(status = status.as_u16(), len = body.len(), "Response body read");
        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Bytes> {
        debug!(url = %url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        self.read_body(response).await
    }

    async fn post(&self, url: &Url, payload: &Payload) -> Result<Bytes> {
        debug!(url = %url, len = payload.body().len(), "POST");
        let mut request = self.client.post(url.clone()).body(payload.body().clone());

        if let Some(content_type) = payload.content_type() {
            request = request.header(CONTENT_TYPE, content_type);
        }

        let response = request.send().await?;
        self.read_body(response).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert!(config.follow_redirects);
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.accept, DEFAULT_ACCEPT);
        assert!(!config.error_for_status);
    }

    #[test]
    fn test_builder_methods() {
        let config = HttpConfig::new()
            .without_redirects()
            .with_max_redirects(3)
            .with_request_timeout(Duration::from_secs(5))
            .with_accept("application/hal+json")
            .with_user_agent("test-agent")
            .with_error_for_status();

        assert!(!config.follow_redirects);
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.accept, "application/hal+json");
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.error_for_status);
    }

    #[test]
    fn test_factory_creates_transport() {
        let config = HttpConfig::new();
        assert!(config.create().is_ok());
    }

    #[test]
    fn test_invalid_accept_header_is_config_error() {
        let config = HttpConfig::new().with_accept("bad\nvalue");
        let err = HttpTransport::new(config).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = HttpTransport::new(HttpConfig::new()).expect("transport");
        let url = Url::parse("http://127.0.0.1:1/").expect("url");

        let err = transport.get(&url).await.unwrap_err();
        assert!(err.is_transport_error());
    }
}
