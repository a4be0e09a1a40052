//! Transport collaborator contract.
//!
//! A [`Transport`] performs the two HTTP calls the navigator needs. A
//! [`TransportFactory`] is the prototype: it produces fresh, independent
//! transports sharing one configuration, and is what the
//! [`ConnectionPool`](super::ConnectionPool) uses to populate itself.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use url::Url;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Content type used by [`Payload::json`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// Transport
// ============================================================================

/// A single HTTP client instance.
///
/// Implementations must follow redirects. A transport checked out of the
/// pool is used by exactly one in-flight fetch at a time.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET and returns the raw response body.
    async fn get(&self, url: &Url) -> Result<Bytes>;

    /// Issues a POST with `payload` and returns the raw response body.
    async fn post(&self, url: &Url, payload: &Payload) -> Result<Bytes>;
}

// ============================================================================
// TransportFactory
// ============================================================================

/// Capability to produce a new transport from a template configuration.
pub trait TransportFactory: Send + Sync {
    /// Creates an independent transport instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    fn create(&self) -> Result<Box<dyn Transport>>;
}

// ============================================================================
// Payload
// ============================================================================

/// Request body for [`Transport::post`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Payload {
    body: Bytes,
    content_type: Option<String>,
}

impl Payload {
    /// Serializes `value` as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self {
            body: Bytes::from(body),
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
        })
    }

    /// Wraps raw bytes without a content type.
    #[inline]
    #[must_use]
    pub fn bytes(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            content_type: None,
        }
    }

    /// Wraps a text body as `text/plain`.
    #[inline]
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: Bytes::from(body.into()),
            content_type: Some("text/plain; charset=utf-8".to_string()),
        }
    }

    /// Sets the content type.
    #[inline]
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the body bytes.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the content type, if any.
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("len", &self.body.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_json_payload() {
        let payload = Payload::json(&json!({"name": "widget"})).expect("serialize");
        assert_eq!(payload.content_type(), Some(JSON_CONTENT_TYPE));
        assert_eq!(payload.body().as_ref(), br#"{"name":"widget"}"#);
    }

    #[test]
    fn test_bytes_payload_has_no_content_type() {
        let payload = Payload::bytes(vec![1u8, 2, 3]);
        assert_eq!(payload.content_type(), None);
        assert_eq!(payload.body().len(), 3);
    }

    #[test]
    fn test_with_content_type_overrides() {
        let payload = Payload::text("hi").with_content_type("application/hal+json");
        assert_eq!(payload.content_type(), Some("application/hal+json"));
    }

    #[test]
    fn test_debug_hides_body() {
        let payload = Payload::text("secret");
        let shown = format!("{payload:?}");
        assert!(!shown.contains("secret"));
        assert!(shown.contains("len: 6"));
    }
}
