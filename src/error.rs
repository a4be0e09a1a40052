//! Error types for the HAL navigator.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use hal_navigator::{Node, Result};
//!
//! async fn example() -> Result<()> {
//!     let root = Node::new("https://api.example.com/")?.fetch();
//!     let orders = root.follow_first("orders").await?.fetch();
//!     let _body = orders.body().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Construction | [`Error::Config`], [`Error::InvalidUrl`] |
//! | Transport | [`Error::Http`], [`Error::Transport`], [`Error::PoolExhausted`], [`Error::TaskFailed`] |
//! | Decode | [`Error::Json`], [`Error::Hal`] |
//! | Usage | [`Error::NotFetched`] |
//! | Navigation | [`Error::RelationNotFound`] |
//!
//! Errors are [`Clone`]: a failed fetch is observed by every node sharing it,
//! and each observer receives its own copy of the same terminal error.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;
use std::sync::Arc;

use thiserror::Error;
use url::ParseError as UrlParseError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug, Clone)]
pub enum Error {
    // ========================================================================
    // Construction Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when a node or pool is built from an invalid configuration,
    /// e.g. a node with neither a URL nor a pending fetch.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// URL could not be parsed or joined.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: UrlParseError,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// HTTP client error (connect, TLS, redirect, timeout, status).
    #[error("HTTP error: {0}")]
    Http(Arc<reqwest::Error>),

    /// Transport failure reported by a non-HTTP transport implementation.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// Target URL of the failed call.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// No pooled transport became available in time.
    ///
    /// Returned when checkout waits longer than the pool's timeout.
    #[error("Connection pool exhausted: {capacity} in use after {timeout_ms}ms")]
    PoolExhausted {
        /// Pool capacity.
        capacity: usize,
        /// Milliseconds waited before giving up.
        timeout_ms: u64,
    },

    /// Fetch work panicked.
    #[error("Fetch task failed: {message}")]
    TaskFailed {
        /// Description of the task failure.
        message: String,
    },

    // ========================================================================
    // Decode Errors
    // ========================================================================
    /// Response body is not valid JSON.
    #[error("JSON error: {0}")]
    Json(Arc<serde_json::Error>),

    /// Response body is JSON but not a usable HAL document.
    #[error("HAL error: {message}")]
    Hal {
        /// Description of the structural problem.
        message: String,
    },

    // ========================================================================
    // Usage Errors
    // ========================================================================
    /// Body requested from a node that was never fetched.
    ///
    /// Call [`Node::fetch`](crate::Node::fetch) or
    /// [`Node::write`](crate::Node::write) first.
    #[error("Node has no fetch bound; call fetch() or write() first")]
    NotFetched,

    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// No link with the requested relation.
    #[error("Relation not found: {relation}")]
    RelationNotFound {
        /// The relation that had no match.
        relation: String,
    },
}

// ============================================================================
// Conversions
// ============================================================================

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    #[inline]
    pub fn invalid_url(url: impl Into<String>, source: UrlParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a pool exhausted error.
    #[inline]
    pub fn pool_exhausted(capacity: usize, timeout_ms: u64) -> Self {
        Self::PoolExhausted {
            capacity,
            timeout_ms,
        }
    }

    /// Creates a task failed error.
    #[inline]
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }

    /// Creates a HAL structure error.
    #[inline]
    pub fn hal(message: impl Into<String>) -> Self {
        Self::Hal {
            message: message.into(),
        }
    }

    /// Creates a relation not found error.
    #[inline]
    pub fn relation_not_found(relation: impl Into<String>) -> Self {
        Self::RelationNotFound {
            relation: relation.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::PoolExhausted { .. } => true,
            Self::Http(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the failure happened while talking to the server.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Transport { .. }
                | Self::PoolExhausted { .. }
                | Self::TaskFailed { .. }
        )
    }

    /// Returns `true` if the body could not be decoded.
    #[inline]
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Hal { .. })
    }

    /// Returns `true` if a relation lookup failed.
    #[inline]
    #[must_use]
    pub fn is_navigation_error(&self) -> bool {
        matches!(self, Self::RelationNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
