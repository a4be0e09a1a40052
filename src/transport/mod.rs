//! HTTP transport layer.
//!
//! This module supplies the transports a fetch runs on and the pool that
//! bounds how many run at once.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  create()  ┌────────────────┐  checkout  ┌───────────────┐
//! │  HttpConfig  │───────────►│ ConnectionPool │───────────►│ DeferredFetch │
//! │ (prototype)  │            │ (N transports) │◄───────────│  (one call)   │
//! └──────────────┘            └────────────────┘   checkin  └───────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `client` | `Transport` / `TransportFactory` traits and `Payload` |
//! | `http` | `reqwest`-backed transport and its prototype configuration |
//! | `pool` | Bounded, lazily populated transport pool |

// ============================================================================
// Submodules
// ============================================================================

/// Transport collaborator traits.
pub mod client;

/// `reqwest`-backed HTTP transport.
pub mod http;

/// Bounded transport pool.
pub mod pool;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{Payload, Transport, TransportFactory};
pub use http::{HttpConfig, HttpTransport};
pub use pool::{ConnectionPool, PoolOptions, PooledTransport};
