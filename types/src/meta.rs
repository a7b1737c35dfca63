//! Literal page metadata.
//!
//! Title, description and social-preview fields are carried verbatim. The
//! only consumer inside Folio is the terminal window title; the rest exists
//! so the content document stays a complete description of the page.

use serde::Deserialize;

use crate::ContentError;

/// Whether a tag is addressed by `name=` or by `property=` (Open Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Name,
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaTag {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    property: Option<String>,
    content: String,
}

impl MetaTag {
    #[must_use]
    pub fn name(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(key.into()),
            property: None,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn property(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: None,
            property: Some(key.into()),
            content: content.into(),
        }
    }

    /// The addressing kind and key, or `None` when the tag names neither or both.
    #[must_use]
    pub fn key(&self) -> Option<(MetaKind, &str)> {
        match (self.name.as_deref(), self.property.as_deref()) {
            (Some(name), None) => Some((MetaKind::Name, name)),
            (None, Some(property)) => Some((MetaKind::Property, property)),
            _ => None,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<MetaTag>,
}

impl PageMeta {
    /// Look up the content of a tag by key, regardless of its kind.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key().is_some_and(|(_, k)| k == key))
            .map(MetaTag::content)
    }

    pub(crate) fn validate(&self) -> Result<(), ContentError> {
        if self.title.trim().is_empty() {
            return Err(ContentError::MissingField("meta.title"));
        }
        for (index, tag) in self.tags.iter().enumerate() {
            if tag.key().is_none() {
                return Err(ContentError::AmbiguousMetaTag { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MetaKind, MetaTag, PageMeta};
    use crate::ContentError;

    #[test]
    fn lookup_spans_name_and_property_tags() {
        let meta = PageMeta {
            title: "Portfolio".into(),
            tags: vec![
                MetaTag::name("description", "About me"),
                MetaTag::property("og:type", "website"),
            ],
        };
        assert_eq!(meta.get("description"), Some("About me"));
        assert_eq!(meta.get("og:type"), Some("website"));
        assert_eq!(meta.get("og:url"), None);
        assert_eq!(meta.tags[1].key(), Some((MetaKind::Property, "og:type")));
    }

    #[test]
    fn tag_with_both_keys_is_rejected() {
        let meta: PageMeta = toml::from_str(
            r#"
            title = "Portfolio"
            [[tags]]
            name = "a"
            property = "b"
            content = "c"
            "#,
        )
        .expect("parses");
        assert!(matches!(
            meta.validate(),
            Err(ContentError::AmbiguousMetaTag { index: 0 })
        ));
    }

    #[test]
    fn blank_title_is_rejected() {
        let meta = PageMeta {
            title: "  ".into(),
            tags: Vec::new(),
        };
        assert!(matches!(
            meta.validate(),
            Err(ContentError::MissingField("meta.title"))
        ));
    }
}
