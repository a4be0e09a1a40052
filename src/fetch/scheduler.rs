//! Pluggable execution strategy for deferred fetches.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::runtime::Handle;

use crate::error::{Error, Result};

// ============================================================================
// Scheduler
// ============================================================================

/// When a [`DeferredFetch`](super::DeferredFetch) starts its work.
///
/// - [`Scheduler::Immediate`] starts the work when the fetch's value is
///   first awaited. Nothing happens before that.
/// - [`Scheduler::Runtime`] spawns the work onto a tokio runtime as soon as
///   the fetch is created, so it progresses in parallel with the caller.
///
/// Once started, the work runs to completion on a runtime task under either
/// variant, whether or not anyone is still awaiting it. Nodes behave
/// identically; only the moment the request goes out differs.
#[derive(Debug, Clone, Default)]
pub enum Scheduler {
    /// Start on first await.
    #[default]
    Immediate,

    /// Spawn onto the given runtime at creation.
    Runtime(Handle),
}

impl Scheduler {
    /// Creates a scheduler starting work on first await.
    #[inline]
    #[must_use]
    pub fn immediate() -> Self {
        Self::Immediate
    }

    /// Creates a scheduler spawning onto `handle`.
    #[inline]
    #[must_use]
    pub fn runtime(handle: Handle) -> Self {
        Self::Runtime(handle)
    }

    /// Spawns onto the current runtime, or starts on first await outside
    /// of one.
    #[must_use]
    pub fn current() -> Self {
        Handle::try_current()
            .map(Self::Runtime)
            .unwrap_or(Self::Immediate)
    }

    /// Returns `true` for [`Scheduler::Immediate`].
    #[inline]
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate)
    }

    /// Runtime that drives work from the moment it is created.
    #[inline]
    pub(crate) fn eager_handle(&self) -> Option<&Handle> {
        match self {
            Self::Immediate => None,
            Self::Runtime(handle) => Some(handle),
        }
    }
}

// ============================================================================
// Panic Isolation
// ============================================================================

/// Resolves a panic inside `work` as [`Error::TaskFailed`].
pub(crate) fn catch_panics<T>(
    work: BoxFuture<'static, Result<T>>,
) -> BoxFuture<'static, Result<T>>
where
    T: Send + 'static,
{
    AssertUnwindSafe(work)
        .catch_unwind()
        .map(|outcome| match outcome {
            Ok(result) => result,
            Err(panic) => Err(Error::task_failed(panic_message(panic.as_ref()))),
        })
        .boxed()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("task panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("task panicked: {message}")
    } else {
        "task panicked".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
