//! Navigation nodes.
//!
//! Each [`Node`] is a handle to a hypermedia resource, fetched or not.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Node struct, fetch/write binding, body access |
//! | `builder` | Construction-time configuration and validation |
//! | `navigation` | Relation lookup, `follow_all`, `follow_first` |
//!
//! # Example
//!
//! ```ignore
//! let root = Node::new("https://api.example.com/")?.fetch();
//!
//! // Follow one relation
//! let next = root.follow_first("next").await?.fetch();
//!
//! // Follow every match
//! for item in next.follow_all("item").await? {
//!     println!("{:?}", item.url());
//! }
//!
//! // Write
//! let created = root.write(Payload::json(&order)?);
//! let receipt = created.body().await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod builder;
mod core;
mod navigation;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::NodeBuilder;
pub use self::core::Node;
