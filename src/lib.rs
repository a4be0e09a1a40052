//! HAL Navigator - Lazy, pooled HAL+JSON hypermedia client.
//!
//! This library navigates HAL+JSON APIs by following typed relations
//! between resources, without eagerly fetching every resource on the way.
//!
//! # Architecture
//!
//! - **Node**: handle to a resource, identified by a URL or by a pending fetch
//! - **DeferredFetch**: one-shot, memoized asynchronous HTTP call
//! - **ConnectionPool**: bounds concurrent calls across a navigation chain
//! - **Representation**: decoded HAL document with a link-set query
//!
//! Key design principles:
//!
//! - `fetch()` / `write()` never block; `body()` is the only suspension point
//! - At most one request per node, however many callers observe it
//! - Scheduler and pool are injected and passed down, never global
//! - Missing relations are errors, not empty nodes
//!
//! # Quick Start
//!
//! ```no_run
//! use hal_navigator::{Node, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let root = Node::new("https://api.example.com/")?.fetch();
//!
//!     // First request goes out here
//!     let orders = root.follow_first("orders").await?.fetch();
//!
//!     for order in orders.follow_all("item").await? {
//!         let order = order.fetch().body().await?;
//!         println!("total: {:?}", order.property("total"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`node`] | [`Node`] and [`NodeBuilder`] |
//! | [`fetch`] | [`DeferredFetch`] and [`Scheduler`] |
//! | [`hal`] | [`Representation`] and [`Link`] |
//! | [`transport`] | [`Transport`] traits, HTTP transport, [`ConnectionPool`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Deferred fetches and their scheduler.
pub mod fetch;

/// HAL+JSON decoding and link extraction.
pub mod hal;

/// Type-safe identifiers.
pub mod identifiers;

/// Navigation nodes.
///
/// - [`Node`] - handle to a resource, fetched or not
/// - [`NodeBuilder`] - construction-time configuration
pub mod node;

/// HTTP transport layer.
///
/// Transport traits, the `reqwest`-backed transport, and the bounded pool.
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Node types
pub use node::{Node, NodeBuilder};

// Fetch types
pub use fetch::{DeferredFetch, Scheduler};

// HAL types
pub use hal::{Link, LinkObject, Representation};

// Transport types
pub use transport::{
    ConnectionPool, HttpConfig, HttpTransport, Payload, PoolOptions, PooledTransport, Transport,
    TransportFactory,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::FetchId;
