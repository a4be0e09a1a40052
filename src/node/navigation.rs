//! Relation lookup and link following.

use tracing::debug;

use crate::error::{Error, Result};
use crate::hal::Link;

use super::Node;

// ============================================================================
// Node - Navigation
// ============================================================================

impl Node {
    /// Returns the links whose relation equals `relation`, in document order.
    ///
    /// Waits for the body.
    ///
    /// # Errors
    ///
    /// Returns any error from [`body`](Self::body).
    pub async fn links(&self, relation: &str) -> Result<Vec<Link>> {
        let body = self.body().await?;
        Ok(body
            .links_for_relation(relation)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns every link of the body, in document order.
    ///
    /// # Errors
    ///
    /// Returns any error from [`body`](Self::body).
    pub async fn all_links(&self) -> Result<Vec<Link>> {
        let body = self.body().await?;
        Ok(body.all_links().to_vec())
    }

    /// Returns one un-fetched node per `relation` link, in document order.
    ///
    /// Returns an empty list when nothing matches.
    ///
    /// # Errors
    ///
    /// - Any error from [`body`](Self::body)
    /// - [`Error::InvalidUrl`] if a link target cannot be resolved
    pub async fn follow_all(&self, relation: &str) -> Result<Vec<Node>> {
        let links = self.links(relation).await?;

        let nodes = links
            .iter()
            .map(|link| link.target_url().map(|url| self.derive_url(url)))
            .collect::<Result<Vec<_>>>()?;

        debug!(relation, count = nodes.len(), "Followed all links");
        Ok(nodes)
    }

    /// Returns an un-fetched node for the first `relation` link.
    ///
    /// # Errors
    ///
    /// - Any error from [`body`](Self::body)
    /// - [`Error::RelationNotFound`] if no link has `relation`
    /// - [`Error::InvalidUrl`] if the link target cannot be resolved
    pub async fn follow_first(&self, relation: &str) -> Result<Node> {
        let body = self.body().await?;

        let link = body
            .links_for_relation(relation)
            .into_iter()
            .next()
            .ok_or_else(|| Error::relation_not_found(relation))?;

        let url = link.target_url()?;
        debug!(relation, url = %url, "Followed first link");
        Ok(self.derive_url(url))
    }
}

// ============================================================================
// Tests
// ============================================================================
