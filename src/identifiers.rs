//! Type-safe identifiers.
//!
//! Newtype wrappers keep identifiers from being mixed with other strings
//! or UUIDs at compile time.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use uuid::Uuid;

// ============================================================================
// FetchId
// ============================================================================

/// Identifier of a single [`DeferredFetch`](crate::fetch::DeferredFetch).
///
/// Every node sharing a fetch reports the same id, which makes it possible
/// to correlate log lines across a navigation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchId(Uuid);

impl FetchId {
    /// Generates a new random fetch ID.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FetchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// ============================================================================
// Tests
// ============================================================================
