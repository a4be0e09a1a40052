//! Node struct, fetch binding and body access.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{DeferredFetch, Scheduler};
use crate::hal::Representation;
use crate::transport::{ConnectionPool, Payload};

use super::builder::NodeBuilder;

// ============================================================================
// Types
// ============================================================================

/// What a node points at.
pub(crate) enum Target {
    /// A resource identified by URL; the fetch is bound on first use.
    Url {
        url: Url,
        pending: OnceLock<DeferredFetch>,
    },
    /// A fetch that was already started elsewhere.
    Pending {
        fetch: DeferredFetch,
        base_url: Option<Url>,
    },
}

/// Internal shared state for a node.
pub(crate) struct NodeInner {
    /// URL or adopted fetch.
    pub target: Target,

    /// Pool shared by every node of a navigation chain.
    pub pool: Arc<ConnectionPool>,

    /// Scheduler shared by every node of a navigation chain.
    pub scheduler: Scheduler,

    /// Parsed body, decoded once.
    pub representation: OnceCell<Result<Arc<Representation>>>,
}

// ============================================================================
// Node
// ============================================================================

/// Handle to a hypermedia resource that may or may not have been fetched.
///
/// Nodes are cheap to clone; clones share the bound fetch and the decoded
/// body.
///
/// # Example
///
/// ```ignore
/// let root = Node::new("https://api.example.com/")?;
///
/// // No I/O yet
/// let fetched = root.fetch();
///
/// // First suspension point: request goes out, body is decoded
/// for order in fetched.follow_all("orders").await? {
///     let order = order.fetch().body().await?;
///     println!("{:?}", order.property("total"));
/// }
/// ```
#[derive(Clone)]
pub struct Node {
    /// Shared inner state.
    pub(crate) inner: Arc<NodeInner>,
}

// ============================================================================
// Node - Constructors
// ============================================================================

impl Node {
    /// Creates a node for `url` with default transport, pool and scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `url` cannot be parsed.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        NodeBuilder::new().url(url.as_ref()).build()
    }

    /// Creates a configuration builder for a node.
    #[inline]
    #[must_use]
    pub fn builder() -> NodeBuilder {
        NodeBuilder::new()
    }

    /// Assembles a node from validated parts.
    pub(crate) fn from_target(
        target: Target,
        pool: Arc<ConnectionPool>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                target,
                pool,
                scheduler,
                representation: OnceCell::new(),
            }),
        }
    }

    /// Creates an un-fetched node for `url` on this node's pool and scheduler.
    pub(crate) fn derive_url(&self, url: Url) -> Self {
        Self::from_target(
            Target::Url {
                url,
                pending: OnceLock::new(),
            },
            Arc::clone(&self.inner.pool),
            self.inner.scheduler.clone(),
        )
    }

    /// Creates a node sharing `fetch` on this node's pool and scheduler.
    fn derive_pending(&self, fetch: DeferredFetch) -> Self {
        Self::from_target(
            Target::Pending {
                fetch,
                base_url: self.base_url().cloned(),
            },
            Arc::clone(&self.inner.pool),
            self.inner.scheduler.clone(),
        )
    }
}

// ============================================================================
// Node - Accessors
// ============================================================================

impl Node {
    /// Returns the URL this node was created for.
    ///
    /// `None` for nodes built around an existing fetch.
    #[inline]
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match &self.inner.target {
            Target::Url { url, .. } => Some(url),
            Target::Pending { .. } => None,
        }
    }

    /// Returns the URL relative links resolve against.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        match &self.inner.target {
            Target::Url { url, .. } => Some(url),
            Target::Pending { base_url, .. } => base_url.as_ref(),
        }
    }

    /// Returns the bound fetch, if any.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<&DeferredFetch> {
        match &self.inner.target {
            Target::Url { pending, .. } => pending.get(),
            Target::Pending { fetch, .. } => Some(fetch),
        }
    }

    /// Returns `true` once a fetch is bound to this node.
    #[inline]
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        self.pending().is_some()
    }

    /// Returns the connection pool shared along this navigation chain.
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.inner.pool
    }

    /// Returns the scheduler shared along this navigation chain.
    #[inline]
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }
}

// ============================================================================
// Node - Fetch
// ============================================================================

impl Node {
    /// Binds a GET of this node's URL and returns a node sharing it.
    ///
    /// Never blocks. The request is issued at most once per node no matter
    /// how often this is called; if a fetch is already bound (by an earlier
    /// `fetch()` or `write()`), the returned node shares that one.
    pub fn fetch(&self) -> Node {
        let fetch = self.bind(|url| {
            DeferredFetch::get(
                &self.inner.scheduler,
                Arc::clone(&self.inner.pool),
                url.clone(),
            )
        });
        self.derive_pending(fetch)
    }

    /// Binds a POST of `payload` to this node's URL and returns a node
    /// sharing it.
    ///
    /// Same one-shot contract as [`fetch`](Self::fetch): if a fetch is
    /// already bound, `payload` is discarded and no request is issued.
    pub fn write(&self, payload: Payload) -> Node {
        let fetch = self.bind(|url| {
            DeferredFetch::post(
                &self.inner.scheduler,
                Arc::clone(&self.inner.pool),
                url.clone(),
                payload,
            )
        });
        self.derive_pending(fetch)
    }

    /// Returns the bound fetch, starting one with `start` if there is none.
    ///
    /// The check-and-set is atomic: concurrent callers never start two.
    fn bind(&self, start: impl FnOnce(&Url) -> DeferredFetch) -> DeferredFetch {
        match &self.inner.target {
            Target::Url { url, pending } => pending
                .get_or_init(|| {
                    let fetch = start(url);
                    debug!(fetch_id = %fetch.id(), url = %url, "Fetch bound to node");
                    fetch
                })
                .clone(),
            Target::Pending { fetch, .. } => {
                trace!(fetch_id = %fetch.id(), "Node already bound");
                fetch.clone()
            }
        }
    }
}

// ============================================================================
// Node - Body
// ============================================================================

impl Node {
    /// Waits for the bound fetch and returns the decoded body.
    ///
    /// Decoding happens once; later calls return the same
    /// [`Representation`]. Failures are permanent for this node.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFetched`] if neither `fetch()` nor `write()` was called
    /// - The fetch's transport, pool or task error
    /// - [`Error::Json`] / [`Error::Hal`] if the body is not a HAL document
    pub async fn body(&self) -> Result<Arc<Representation>> {
        let fetch = self.pending().cloned().ok_or(Error::NotFetched)?;
        let base_url = self.base_url().cloned();

        self.inner
            .representation
            .get_or_init(|| decode(fetch, base_url))
            .await
            .clone()
    }

    /// Waits for the bound fetch and returns the undecoded body.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFetched`] if neither `fetch()` nor `write()` was called
    /// - The fetch's transport, pool or task error
    pub async fn raw(&self) -> Result<Bytes> {
        let fetch = self.pending().ok_or(Error::NotFetched)?;
        fetch.value().await
    }
}

/// Resolves `fetch` and parses its body.
async fn decode(fetch: DeferredFetch, base_url: Option<Url>) -> Result<Arc<Representation>> {
    let body = fetch.value().await?;
    let representation = Representation::parse(&body, base_url.as_ref())?;

    debug!(
        fetch_id = %fetch.id(),
        links = representation.all_links().len(),
        "Body decoded"
    );

    Ok(Arc::new(representation))
}

// ============================================================================
// Node - Display
// ============================================================================

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("url", &self.url().map(Url::as_str))
            .field("base_url", &self.base_url().map(Url::as_str))
            .field("fetch", &self.pending())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
