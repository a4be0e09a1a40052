//! One-shot, memoized asynchronous fetch.
//!
//! A [`DeferredFetch`] wraps a single HTTP call. Cloning it shares the same
//! computation: the work runs at most once, and every observer of
//! [`DeferredFetch::value`] receives the same body or the same error.
//!
//! Once started, the work is driven by its own runtime task. Dropping an
//! awaiting caller never parks a half-finished request (and the pooled
//! transport it holds).

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Result;
use crate::identifiers::FetchId;
use crate::transport::{ConnectionPool, Payload};

use super::scheduler::{Scheduler, catch_panics};

// ============================================================================
// Types
// ============================================================================

/// Shared handle to the scheduled work.
type SharedBody = Shared<BoxFuture<'static, Result<Bytes>>>;

// ============================================================================
// DeferredFetch
// ============================================================================

/// Handle to an in-flight or completed fetch.
///
/// Terminal state (value or error) is permanent. There is no cancellation:
/// dropping every handle of a started fetch lets it run to completion.
#[derive(Clone)]
pub struct DeferredFetch {
    id: FetchId,
    shared: SharedBody,
    /// Set once a runtime task drives `shared`.
    driven: Arc<AtomicBool>,
}

// ============================================================================
// DeferredFetch - Constructors
// ============================================================================

impl DeferredFetch {
    /// Starts `work` on `scheduler`.
    ///
    /// Under [`Scheduler::Runtime`] the work is spawned right away; under
    /// [`Scheduler::Immediate`] it starts when the value is first awaited.
    /// A panic in `work` resolves as [`Error::TaskFailed`](crate::Error::TaskFailed).
    pub fn start<F>(scheduler: &Scheduler, work: F) -> Self
    where
        F: Future<Output = Result<Bytes>> + Send + 'static,
    {
        Self::start_with_id(FetchId::next(), scheduler, work)
    }

    /// Starts a GET of `url` through `pool`.
    pub fn get(scheduler: &Scheduler, pool: Arc<ConnectionPool>, url: Url) -> Self {
        let id = FetchId::next();
        debug!(fetch_id = %id, url = %url, "Scheduling GET");

        Self::start_with_id(id, scheduler, async move {
            let result = pool.with(async |transport| transport.get(&url).await).await;
            log_outcome(id, &url, &result);
            result
        })
    }

    /// Starts a POST of `payload` to `url` through `pool`.
    pub fn post(
        scheduler: &Scheduler,
        pool: Arc<ConnectionPool>,
        url: Url,
        payload: Payload,
    ) -> Self {
        let id = FetchId::next();
        debug!(fetch_id = %id, url = %url, "Scheduling POST");

        Self::start_with_id(id, scheduler, async move {
            let result = pool
                .with(async |transport| transport.post(&url, &payload).await)
                .await;
            log_outcome(id, &url, &result);
            result
        })
    }

    fn start_with_id<F>(id: FetchId, scheduler: &Scheduler, work: F) -> Self
    where
        F: Future<Output = Result<Bytes>> + Send + 'static,
    {
        let fetch = Self {
            id,
            shared: catch_panics(work.boxed()).shared(),
            driven: Arc::new(AtomicBool::new(false)),
        };

        if let Some(handle) = scheduler.eager_handle() {
            fetch.drive(handle);
        }
        fetch
    }

    /// Spawns the task that runs the work to completion, once.
    fn drive(&self, handle: &Handle) {
        if self.driven.swap(true, Ordering::AcqRel) {
            return;
        }
        trace!(fetch_id = %self.id, "Driving fetch on runtime");
        handle.spawn(self.shared.clone());
    }
}

// ============================================================================
// DeferredFetch - Public API
// ============================================================================

impl DeferredFetch {
    /// Returns this fetch's identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> FetchId {
        self.id
    }

    /// Waits for the fetch to resolve.
    ///
    /// # Errors
    ///
    /// Returns the fetch's terminal error: transport failure, pool
    /// exhaustion, or a failed task.
    pub async fn value(&self) -> Result<Bytes> {
        // Outside a runtime the awaiting caller polls the work itself.
        if let Ok(handle) = Handle::try_current() {
            self.drive(&handle);
        }
        self.shared.clone().await
    }

    /// Returns the outcome if the fetch has already resolved.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<Result<Bytes>> {
        self.shared.peek().cloned()
    }

    /// Returns `true` once the fetch has a terminal state.
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.shared.peek().is_some()
    }
}

impl fmt::Debug for DeferredFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.shared.peek() {
            None => "pending",
            Some(Ok(_)) => "resolved",
            Some(Err(_)) => "failed",
        };

        f.debug_struct("DeferredFetch")
            .field("id", &self.id)
            .field("state", &state)
            .finish()
    }
}

fn log_outcome(id: FetchId, url: &Url, result: &Result<Bytes>) {
    match result {
        Ok(body) => debug!(fetch_id = %id, url = %url, len = body.len(), "Fetch resolved"),
        Err(e) => warn!(fetch_id = %id, url = %url, error = %e, "Fetch failed"),
    }
}

// ============================================================================
// Tests
// ============================================================================
