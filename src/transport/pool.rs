//! Bounded pool of transport instances.
//!
//! Caps the number of concurrent outbound calls across every node derived
//! from a common root. Instances are created lazily from the transport
//! prototype, up to capacity, and reused after checkin.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │              ConnectionPool               │
//! │  permits: Semaphore(capacity)             │
//! │  idle:    [Transport, Transport, ...]     │
//! │  factory: TransportFactory (prototype)    │
//! └───────────────────────────────────────────┘
//!        checkout ▲                │ drop(PooledTransport)
//!                 │                ▼
//!            DeferredFetch work (one call each)
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

use super::client::{Transport, TransportFactory};

// ============================================================================
// Constants
// ============================================================================

/// Default number of transports in a pool.
pub const DEFAULT_POOL_CAPACITY: usize = 10;

/// Default time a checkout waits for a free transport.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// PoolOptions
// ============================================================================

/// Fixed pool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum number of transports checked out at once.
    pub capacity: usize,

    /// Maximum wait for a free transport.
    pub checkout_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }
}

impl PoolOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the checkout timeout.
    #[inline]
    #[must_use]
    pub fn with_checkout_timeout(mut self, checkout_timeout: Duration) -> Self {
        self.checkout_timeout = checkout_timeout;
        self
    }
}

// ============================================================================
// ConnectionPool
// ============================================================================

/// Bounded set of reusable transports with blocking checkout.
///
/// # Example
///
/// ```ignore
/// let pool = ConnectionPool::new(HttpConfig::new(), PoolOptions::default());
///
/// let transport = pool.checkout().await?;
/// let body = transport.get(&url).await?;
/// drop(transport); // checkin
/// ```
pub struct ConnectionPool {
    /// Prototype used to create transports on demand.
    factory: Arc<dyn TransportFactory>,

    /// Capacity after clamping.
    capacity: usize,

    /// Checkout wait limit.
    checkout_timeout: Duration,

    /// One permit per slot.
    permits: Arc<Semaphore>,

    /// Transports that have been checked in.
    idle: Mutex<Vec<Box<dyn Transport>>>,

    /// Number of transports created so far.
    created: AtomicUsize,
}

// ============================================================================
// ConnectionPool - Constructor
// ============================================================================

impl ConnectionPool {
    /// Creates a pool backed by `factory`.
    ///
    /// Nothing is created up front. A capacity of zero is treated as one.
    pub fn new(factory: impl TransportFactory + 'static, options: PoolOptions) -> Arc<Self> {
        Self::from_factory(Arc::new(factory), options)
    }

    /// Creates a pool from an already shared factory.
    pub fn from_factory(factory: Arc<dyn TransportFactory>, options: PoolOptions) -> Arc<Self> {
        let capacity = options.capacity.max(1);

        debug!(
            capacity,
            timeout_ms = options.checkout_timeout.as_millis() as u64,
            "ConnectionPool created"
        );

        Arc::new(Self {
            factory,
            capacity,
            checkout_timeout: options.checkout_timeout,
            permits: Arc::new(Semaphore::new(capacity)),
            idle: Mutex::new(Vec::with_capacity(capacity)),
            created: AtomicUsize::new(0),
        })
    }
}

// ============================================================================
// ConnectionPool - Public API
// ============================================================================

impl ConnectionPool {
    /// Returns the pool capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the checkout timeout.
    #[inline]
    #[must_use]
    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }

    /// Returns the number of slots not currently checked out.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Returns the number of transports created so far.
    #[inline]
    #[must_use]
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Returns the number of idle transports ready for reuse.
    #[inline]
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Checks out a transport, waiting up to the checkout timeout.
    ///
    /// The transport is returned to the pool when the guard is dropped.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolExhausted`] if no slot frees up in time
    /// - Any error from the factory when a new transport must be created
    pub async fn checkout(self: &Arc<Self>) -> Result<PooledTransport> {
        let acquire = Arc::clone(&self.permits).acquire_owned();

        let permit = match timeout(self.checkout_timeout, acquire).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(Error::config("Connection pool closed")),
            Err(_) => {
                let timeout_ms = self.checkout_timeout.as_millis() as u64;
                warn!(capacity = self.capacity, timeout_ms, "Pool checkout timed out");
                return Err(Error::pool_exhausted(self.capacity, timeout_ms));
            }
        };

        let reused = self.idle.lock().pop();

        let transport = match reused {
            Some(transport) => {
                trace!("Reusing idle transport");
                transport
            }
            None => {
                // Permit is released by drop if creation fails.
                let transport = self.factory.create()?;
                let created = self.created.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(created, capacity = self.capacity, "Transport added to pool");
                transport
            }
        };

        Ok(PooledTransport {
            transport: Some(transport),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    /// Runs `f` with a checked-out transport, then checks it back in.
    ///
    /// The transport is returned whether `f` succeeds or fails.
    ///
    /// # Errors
    ///
    /// Returns checkout errors or the error produced by `f`.
    pub async fn with<T>(
        self: &Arc<Self>,
        f: impl AsyncFnOnce(&dyn Transport) -> Result<T>,
    ) -> Result<T> {
        let transport = self.checkout().await?;
        f(&*transport).await
    }

    /// Puts a transport back on the idle stack.
    fn checkin(&self, transport: Box<dyn Transport>) {
        let mut idle = self.idle.lock();
        idle.push(transport);
        trace!(idle = idle.len(), "Transport checked in");
    }
}

impl fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .field("created", &self.created())
            .field("checkout_timeout", &self.checkout_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PooledTransport
// ============================================================================

/// A transport checked out of a [`ConnectionPool`].
///
/// Dereferences to [`Transport`]. Dropping the guard checks the transport
/// back in and frees the slot; this never blocks.
pub struct PooledTransport {
    transport: Option<Box<dyn Transport>>,
    pool: Arc<ConnectionPool>,
    _permit: OwnedSemaphorePermit,
}

impl PooledTransport {
    /// Returns the transport to the pool.
    #[inline]
    pub fn checkin(self) {
        drop(self);
    }
}

impl Deref for PooledTransport {
    type Target = dyn Transport;

    fn deref(&self) -> &Self::Target {
        self.transport
            .as_deref()
            .expect("transport is present until the guard drops")
    }
}

impl Drop for PooledTransport {
    fn drop(&mut self) {
        // Idle entry is pushed before the permit field is released.
        if let Some(transport) = self.transport.take() {
            self.pool.checkin(transport);
        }
    }
}

impl fmt::Debug for PooledTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledTransport")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
