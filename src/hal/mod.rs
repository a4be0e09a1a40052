//! HAL+JSON decoding and link extraction.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `link` | Link objects and target resolution |
//! | `representation` | Parsed document with relation queries |

// ============================================================================
// Submodules
// ============================================================================

/// Link objects.
pub mod link;

/// Parsed HAL documents.
pub mod representation;

// ============================================================================
// Re-exports
// ============================================================================

pub use link::{Link, LinkObject};
pub use representation::Representation;
