//! Parsed view of a HAL+JSON document.
//!
//! The link set is built once at parse time:
//!
//! 1. every entry of `_links`, in document order (arrays in array order),
//!    skipping `curies`;
//! 2. every resource under `_embedded` that carries a `_links.self.href`,
//!    under its embedded relation name.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, Result};

use super::link::{Link, LinkObject};

// ============================================================================
// Constants
// ============================================================================

/// Reserved member holding links.
pub const LINKS_KEY: &str = "_links";

/// Reserved member holding embedded resources.
pub const EMBEDDED_KEY: &str = "_embedded";

/// Relation holding CURIE definitions rather than navigable links.
const CURIES_REL: &str = "curies";

/// Relation of a resource's own URL.
const SELF_REL: &str = "self";

// ============================================================================
// Representation
// ============================================================================

/// A decoded HAL document with a queryable link set.
#[derive(Debug, Clone)]
pub struct Representation {
    document: Value,
    links: Vec<Link>,
    index: FxHashMap<String, Vec<usize>>,
    base_url: Option<Url>,
}

// ============================================================================
// Representation - Constructors
// ============================================================================

impl Representation {
    /// Decodes `body` as a HAL document.
    ///
    /// Relative hrefs resolve against `base`, or against the document's
    /// absolute `self` href when no base is given.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if `body` is not JSON
    /// - [`Error::Hal`] if the document is not an object or a link is malformed
    pub fn parse(body: &[u8], base: Option<&Url>) -> Result<Self> {
        let document: Value = serde_json::from_slice(body)?;
        Self::from_document(document, base)
    }

    /// Builds a representation from an already decoded document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hal`] if the document is not an object or a link is
    /// malformed.
    pub fn from_document(document: Value, base: Option<&Url>) -> Result<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| Error::hal("HAL document must be a JSON object"))?;

        let base_url = match base {
            Some(base) => Some(base.clone()),
            None => self_href(object).and_then(|href| Url::parse(href).ok()),
        };

        let mut links = Vec::new();
        collect_links(object, base_url.as_ref(), &mut links)?;
        collect_embedded(object, base_url.as_ref(), &mut links)?;

        let mut index: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (position, link) in links.iter().enumerate() {
            index
                .entry(link.relation().to_string())
                .or_default()
                .push(position);
        }

        Ok(Self {
            document,
            links,
            index,
            base_url,
        })
    }
}

// ============================================================================
// Representation - Link Queries
// ============================================================================

impl Representation {
    /// Returns links whose relation equals `relation`, in document order.
    #[must_use]
    pub fn links_for_relation(&self, relation: &str) -> Vec<&Link> {
        self.index
            .get(relation)
            .map(|positions| positions.iter().map(|&i| &self.links[i]).collect())
            .unwrap_or_default()
    }

    /// Returns every link in document order.
    #[inline]
    #[must_use]
    pub fn all_links(&self) -> &[Link] {
        &self.links
    }

    /// Returns distinct relation names in order of first appearance.
    #[must_use]
    pub fn relations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for link in &self.links {
            if !seen.contains(&link.relation()) {
                seen.push(link.relation());
            }
        }
        seen
    }

    /// Returns `true` if at least one link has `relation`.
    #[inline]
    #[must_use]
    pub fn has_relation(&self, relation: &str) -> bool {
        self.index.contains_key(relation)
    }

    /// Returns the first `self` link from `_links`.
    #[must_use]
    pub fn self_link(&self) -> Option<&Link> {
        self.links_for_relation(SELF_REL)
            .into_iter()
            .find(|link| !link.is_embedded())
    }
}

// ============================================================================
// Representation - Document Access
// ============================================================================

impl Representation {
    /// Returns a non-reserved top-level member.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        if name == LINKS_KEY || name == EMBEDDED_KEY {
            return None;
        }
        self.document.get(name)
    }

    /// Returns the names of non-reserved top-level members.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.document
            .as_object()
            .map(|object| {
                object
                    .keys()
                    .map(String::as_str)
                    .filter(|key| *key != LINKS_KEY && *key != EMBEDDED_KEY)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the whole decoded document.
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Returns the URL relative hrefs resolve against.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }
}

// ============================================================================
// Parsing Helpers
// ============================================================================

/// Reads `_links.self.href` from a resource object.
fn self_href(object: &Map<String, Value>) -> Option<&str> {
    let self_link = object.get(LINKS_KEY)?.get(SELF_REL)?;
    let self_link = match self_link {
        Value::Array(items) => items.first()?,
        other => other,
    };
    self_link.get("href")?.as_str()
}

fn collect_links(
    object: &Map<String, Value>,
    base: Option<&Url>,
    out: &mut Vec<Link>,
) -> Result<()> {
    let Some(section) = object.get(LINKS_KEY) else {
        return Ok(());
    };

    let section = section
        .as_object()
        .ok_or_else(|| Error::hal("'_links' must be an object"))?;

    for (relation, value) in section {
        if relation == CURIES_REL {
            continue;
        }

        for item in one_or_many(value) {
            let link_object: LinkObject = serde_json::from_value(item.clone())
                .map_err(|e| Error::hal(format!("Invalid link for relation '{relation}': {e}")))?;
            out.push(Link::new(relation.as_str(), link_object, base.cloned()));
        }
    }

    Ok(())
}

fn collect_embedded(
    object: &Map<String, Value>,
    base: Option<&Url>,
    out: &mut Vec<Link>,
) -> Result<()> {
    let Some(section) = object.get(EMBEDDED_KEY) else {
        return Ok(());
    };

    let section = section
        .as_object()
        .ok_or_else(|| Error::hal("'_embedded' must be an object"))?;

    for (relation, value) in section {
        for resource in one_or_many(value) {
            if let Some(href) = resource.as_object().and_then(self_href) {
                out.push(Link::embedded(relation.as_str(), href.to_string(), base.cloned()));
            }
        }
    }

    Ok(())
}

/// Treats a single value and an array uniformly.
fn one_or_many(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

// ============================================================================
// Tests
// ============================================================================
