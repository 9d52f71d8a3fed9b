//! Atom entry and feed projections

use crate::resource::ResourceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Link relations used by the AtomPub surface
pub mod rel {
    pub const EDIT: &str = "edit";
    pub const EDIT_MEDIA: &str = "edit-media";
    pub const RELATED: &str = "related";
    pub const ALTERNATE: &str = "alternate";

    /// Whether a relation is one of the navigational links the read adapter
    /// synthesizes (and the write adapter therefore ignores)
    pub fn is_navigational(rel: &str) -> bool {
        matches!(rel, EDIT | EDIT_MEDIA | RELATED)
    }
}

/// Content type of an entry title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextKind {
    #[default]
    Text,
    Html,
    Xhtml,
}

impl TextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKind::Text => "text",
            TextKind::Html => "html",
            TextKind::Xhtml => "xhtml",
        }
    }

    /// Lenient parse; anything unrecognized is plain text
    pub fn parse(value: &str) -> Self {
        match value {
            "html" => TextKind::Html,
            "xhtml" => TextKind::Xhtml,
            _ => TextKind::Text,
        }
    }
}

/// An author or contributor reference on an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomPersonRef {
    pub name: String,
    pub email: Option<String>,
    pub uri: Option<String>,
}

impl AtomPersonRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            uri: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// A link on an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomLink {
    pub rel: String,
    pub href: String,
    pub mime_type: Option<String>,
    pub title: Option<String>,
}

impl AtomLink {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            mime_type: None,
            title: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The three exclusive content representations, in precedence order:
/// attached binary media, an explicit content URL, inline text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryContent {
    Media { mime_type: String, src: String },
    Url(String),
    Text(String),
}

/// A transient Atom projection of one resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtomEntry {
    /// Resource id, rendered as `urn:{id}` on the wire
    pub id: Option<ResourceId>,
    pub title: Option<String>,
    pub title_type: TextKind,
    pub summary: Option<String>,
    pub rights: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub content: Option<EntryContent>,
    pub authors: Vec<AtomPersonRef>,
    pub contributors: Vec<AtomPersonRef>,
    pub links: Vec<AtomLink>,
    pub source: Option<String>,
}

impl AtomEntry {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn link(&self, rel: &str) -> Option<&AtomLink> {
        self.links.iter().find(|l| l.rel == rel)
    }
}

/// A transient Atom projection of one collection page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomFeed {
    pub id: String,
    pub title: String,
    pub updated: DateTime<Utc>,
    pub entries: Vec<AtomEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_kind_lenient_parse() {
        assert_eq!(TextKind::parse("html"), TextKind::Html);
        assert_eq!(TextKind::parse("xhtml"), TextKind::Xhtml);
        assert_eq!(TextKind::parse("text"), TextKind::Text);
        assert_eq!(TextKind::parse("application/weird"), TextKind::Text);
    }

    #[test]
    fn test_navigational_relations() {
        assert!(rel::is_navigational(rel::EDIT));
        assert!(rel::is_navigational(rel::EDIT_MEDIA));
        assert!(rel::is_navigational(rel::RELATED));
        assert!(!rel::is_navigational(rel::ALTERNATE));
        assert!(!rel::is_navigational("via"));
    }

    #[test]
    fn test_link_lookup() {
        let mut entry = AtomEntry::titled("Work");
        entry
            .links
            .push(AtomLink::new(rel::EDIT, "http://repo/Publication/1"));
        assert!(entry.link(rel::EDIT).is_some());
        assert!(entry.link(rel::EDIT_MEDIA).is_none());
    }
}
