//! Builder pattern for node configuration.
//!
//! Provides a fluent API for configuring and creating root [`Node`]s.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use hal_navigator::{HttpConfig, Node, PoolOptions, Scheduler};
//!
//! # fn example() -> hal_navigator::Result<()> {
//! let root = Node::builder()
//!     .url("https://api.example.com/")
//!     .transport(HttpConfig::new().with_request_timeout(Duration::from_secs(10)))
//!     .pool_options(PoolOptions::new().with_capacity(4))
//!     .scheduler(Scheduler::immediate())
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{DeferredFetch, Scheduler};
use crate::transport::{ConnectionPool, HttpConfig, PoolOptions, TransportFactory};

use super::core::{Node, Target};

// ============================================================================
// NodeBuilder
// ============================================================================

/// Builder for configuring a [`Node`].
///
/// Use [`Node::builder()`] to create a new builder. Exactly one of
/// [`url`](Self::url) or [`pending`](Self::pending) must be set.
#[derive(Default, Clone)]
pub struct NodeBuilder {
    /// Resource URL (unparsed).
    url: Option<String>,
    /// Already started fetch.
    pending: Option<DeferredFetch>,
    /// Base for relative links of a pending node.
    base_url: Option<Url>,
    /// Transport prototype for a new pool.
    transport: Option<Arc<dyn TransportFactory>>,
    /// Existing pool to share.
    pool: Option<Arc<ConnectionPool>>,
    /// Options for a new pool.
    pool_options: PoolOptions,
    /// Execution strategy.
    scheduler: Option<Scheduler>,
}

// ============================================================================
// NodeBuilder Implementation
// ============================================================================

impl NodeBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource URL.
    ///
    /// Parsed by [`build`](Self::build).
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Adopts an already started fetch.
    #[inline]
    #[must_use]
    pub fn pending(mut self, fetch: DeferredFetch) -> Self {
        self.pending = Some(fetch);
        self
    }

    /// Sets the base URL for relative links of a pending node.
    ///
    /// Ignored when a URL is set: the URL itself is the base.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the transport prototype used to populate a new pool.
    ///
    /// Defaults to [`HttpConfig::default()`]. Ignored when
    /// [`pool`](Self::pool) is set.
    #[inline]
    #[must_use]
    pub fn transport(mut self, factory: impl TransportFactory + 'static) -> Self {
        self.transport = Some(Arc::new(factory));
        self
    }

    /// Shares an existing pool.
    #[inline]
    #[must_use]
    pub fn pool(mut self, pool: Arc<ConnectionPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets capacity and checkout timeout for a new pool.
    ///
    /// Ignored when [`pool`](Self::pool) is set.
    #[inline]
    #[must_use]
    pub fn pool_options(mut self, options: PoolOptions) -> Self {
        self.pool_options = options;
        self
    }

    /// Sets the scheduler. Defaults to [`Scheduler::Immediate`].
    #[inline]
    #[must_use]
    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Builds the node with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if neither or both of url/pending are set
    /// - [`Error::InvalidUrl`] if the URL cannot be parsed
    pub fn build(self) -> Result<Node> {
        let target = self.validate_target()?;

        let pool = match self.pool {
            Some(pool) => pool,
            None => {
                let factory: Arc<dyn TransportFactory> = match self.transport {
                    Some(factory) => factory,
                    None => Arc::new(HttpConfig::default()),
                };
                ConnectionPool::from_factory(factory, self.pool_options)
            }
        };

        let scheduler = self.scheduler.unwrap_or_default();

        let node = Node::from_target(target, pool, scheduler);
        debug!(?node, "Node built");
        Ok(node)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl NodeBuilder {
    /// Validates that exactly one of url/pending is set.
    fn validate_target(&self) -> Result<Target> {
        match (&self.url, &self.pending) {
            (Some(url), None) => {
                let parsed = Url::parse(url).map_err(|e| Error::invalid_url(url, e))?;
                Ok(Target::Url {
                    url: parsed,
                    pending: OnceLock::new(),
                })
            }
            (None, Some(fetch)) => Ok(Target::Pending {
                fetch: fetch.clone(),
                base_url: self.base_url.clone(),
            }),
            (None, None) => Err(Error::config(
                "Node needs a URL or a pending fetch. Use .url() or .pending() to set one.\n\
                 Example: Node::builder().url(\"https://api.example.com/\")",
            )),
            (Some(_), Some(_)) => Err(Error::config(
                "Node takes a URL or a pending fetch, not both.",
            )),
        }
    }
}

impl fmt::Debug for NodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("url", &self.url)
            .field("pending", &self.pending)
            .field("base_url", &self.base_url)
            .field("has_transport", &self.transport.is_some())
            .field("pool", &self.pool)
            .field("pool_options", &self.pool_options)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::testing::StubTransport;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = NodeBuilder::new();
        assert!(builder.url.is_none());
        assert!(builder.pending.is_none());
        assert!(builder.transport.is_none());
        assert_eq!(builder.pool_options, PoolOptions::default());
    }

    #[test]
    fn test_url_sets_value() {
        let builder = NodeBuilder::new().url("http://api.test/");
        assert_eq!(builder.url.as_deref(), Some("http://api.test/"));
    }

    #[test]
    fn test_build_fails_without_url_or_pending() {
        let err = NodeBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("URL or a pending fetch"));
    }

    #[test]
    fn test_build_fails_with_both() {
        let fetch = DeferredFetch::start(&Scheduler::immediate(), async {
            Ok(bytes::Bytes::new())
        });
        let err = NodeBuilder::new()
            .url("http://api.test/")
            .pending(fetch)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_build_fails_with_invalid_url() {
        let err = NodeBuilder::new().url("::nope").build().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn test_build_applies_pool_options() {
        let node = NodeBuilder::new()
            .url("http://api.test/")
            .transport(StubTransport::new())
            .pool_options(
                PoolOptions::new()
                    .with_capacity(3)
                    .with_checkout_timeout(Duration::from_secs(5)),
            )
            .build()
            .expect("node");

        assert_eq!(node.pool().capacity(), 3);
        assert_eq!(node.pool().checkout_timeout(), Duration::from_secs(5));
        assert!(node.scheduler().is_immediate());
    }

    #[test]
    fn test_shared_pool_wins() {
        let pool = ConnectionPool::new(StubTransport::new(), PoolOptions::new().with_capacity(2));
        let node = NodeBuilder::new()
            .url("http://api.test/")
            .pool(Arc::clone(&pool))
            .pool_options(PoolOptions::new().with_capacity(9))
            .build()
            .expect("node");

        assert!(Arc::ptr_eq(node.pool(), &pool));
    }

    #[test]
    fn test_pending_node_uses_base_url() {
        let fetch = DeferredFetch::start(&Scheduler::immediate(), async {
            Ok(bytes::Bytes::new())
        });
        let base = Url::parse("http://api.test/root/").expect("base");
        let node = NodeBuilder::new()
            .pending(fetch)
            .base_url(base.clone())
            .build()
            .expect("node");

        assert_eq!(node.url(), None);
        assert_eq!(node.base_url(), Some(&base));
    }

    #[test]
    fn test_builder_is_clone_and_debug() {
        let builder = NodeBuilder::new().url("http://api.test/");
        let cloned = builder.clone();
        assert_eq!(builder.url, cloned.url);
        assert!(format!("{cloned:?}").contains("api.test"));
    }
}
