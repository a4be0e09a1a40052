//! HAL link objects.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// LinkObject
// ============================================================================

/// A link object as it appears on the wire.
///
/// # Format
///
/// ```json
/// { "href": "/orders/1", "templated": false, "title": "Order 1" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkObject {
    /// Target URI or URI template.
    pub href: String,

    /// Whether `href` is a URI template.
    #[serde(default)]
    pub templated: bool,

    /// Media type hint.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Secondary key for selecting between links of one relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ============================================================================
// Link
// ============================================================================

/// A relation paired with its link object.
///
/// `relation` is the literal key from the document; matching against it is
/// exact string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    relation: String,
    object: LinkObject,
    base: Option<Url>,
    embedded: bool,
}

impl Link {
    /// Creates a link for `relation`.
    #[must_use]
    pub fn new(relation: impl Into<String>, object: LinkObject, base: Option<Url>) -> Self {
        Self {
            relation: relation.into(),
            object,
            base,
            embedded: false,
        }
    }

    /// Creates a link derived from an embedded resource's `self` href.
    #[must_use]
    pub(crate) fn embedded(relation: impl Into<String>, href: String, base: Option<Url>) -> Self {
        let object = LinkObject {
            href,
            templated: false,
            media_type: None,
            name: None,
            title: None,
        };

        Self {
            embedded: true,
            ..Self::new(relation, object, base)
        }
    }

    /// Returns the relation name.
    #[inline]
    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the raw `href`.
    #[inline]
    #[must_use]
    pub fn href(&self) -> &str {
        &self.object.href
    }

    /// Returns `true` if `href` is a URI template.
    #[inline]
    #[must_use]
    pub fn is_templated(&self) -> bool {
        self.object.templated
    }

    /// Returns `true` if this link came from `_embedded`.
    #[inline]
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Returns the link's `name`.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.object.name.as_deref()
    }

    /// Returns the link's `title`.
    #[inline]
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.object.title.as_deref()
    }

    /// Returns the link object.
    #[inline]
    #[must_use]
    pub fn object(&self) -> &LinkObject {
        &self.object
    }

    /// Resolves `href` to an absolute URL.
    ///
    /// Relative hrefs are joined onto the document's base URL. Templated
    /// hrefs are resolved literally, without expansion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the href is relative with no base,
    /// or cannot be parsed.
    pub fn target_url(&self) -> Result<Url> {
        let href = self.href();
        let parsed = match &self.base {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        parsed.map_err(|e| Error::invalid_url(href, e))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn object(href: &str) -> LinkObject {
        serde_json::from_value(serde_json::json!({ "href": href })).expect("link object")
    }

    #[test]
    fn test_deserialize_full_link_object() {
        let json = r#"{"href":"/orders{?page}","templated":true,"type":"application/hal+json","name":"o","title":"Orders"}"#;
        let object: LinkObject = serde_json::from_str(json).expect("parse");

        assert_eq!(object.href, "/orders{?page}");
        assert!(object.templated);
        assert_eq!(object.media_type.as_deref(), Some("application/hal+json"));
        assert_eq!(object.name.as_deref(), Some("o"));
        assert_eq!(object.title.as_deref(), Some("Orders"));
    }

    #[test]
    fn test_href_is_required() {
        let result = serde_json::from_str::<LinkObject>(r#"{"title":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_relative_target_joins_base() {
        let base = Url::parse("http://api.test/orders/").expect("base");
        let link = Link::new("item", object("1"), Some(base));
        assert_eq!(link.target_url().expect("url").as_str(), "http://api.test/orders/1");
    }

    #[test]
    fn test_absolute_target_ignores_base() {
        let base = Url::parse("http://api.test/").expect("base");
        let link = Link::new("next", object("https://other.test/x"), Some(base));
        assert_eq!(link.target_url().expect("url").as_str(), "https://other.test/x");
    }

    #[test]
    fn test_relative_target_without_base_fails() {
        let link = Link::new("next", object("/x"), None);
        assert!(matches!(link.target_url(), Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_embedded_link_flags() {
        let link = Link::embedded("item", "http://api.test/a".to_string(), None);
        assert!(link.is_embedded());
        assert!(!link.is_templated());
        assert_eq!(link.relation(), "item");
    }
}
