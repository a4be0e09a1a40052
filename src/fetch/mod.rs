//! Deferred, memoized fetches.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `deferred` | One-shot shared fetch of a response body |
//! | `scheduler` | Start-on-await or runtime-spawned execution |

// ============================================================================
// Submodules
// ============================================================================

/// One-shot shared fetch.
pub mod deferred;

/// Execution strategy.
pub mod scheduler;

// ============================================================================
// Re-exports
// ============================================================================

pub use deferred::DeferredFetch;
pub use scheduler::Scheduler;
