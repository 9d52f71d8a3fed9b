//! Resources, relationships and the fixed relation vocabulary

use super::types::ResourceId;
use super::value::ScalarValue;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed relation names of the scholarly schema
pub mod relations {
    /// Containment: the relation the ORE aggregation walks
    pub const CONTAINS: &str = "ScholarlyWorkContains";
    pub const AUTHORED_BY: &str = "ScholarlyWorkAuthoredBy";
    pub const CONTRIBUTED_BY: &str = "ScholarlyWorkContributedBy";
    pub const HAS_FILE: &str = "ScholarlyWorkHasFile";
    pub const IS_CITED_BY: &str = "ScholarlyWorkIsCitedBy";
    pub const HAS_VERSION: &str = "ScholarlyWorkHasVersion";
    pub const HAS_REPRESENTATION: &str = "ScholarlyWorkHasRepresentation";
    pub const ITEM_ADDED_BY: &str = "ScholarlyWorkItemIsAddedBy";

    /// Relation-name suffixes serialized as direct RDF predicates rather
    /// than generic `ore:aggregates` edges. This is a closed set; it is not
    /// derivable from any other property of the relation.
    pub const SPECIAL_SUFFIXES: [&str; 4] =
        ["IsCitedBy", "HasVersion", "HasRepresentation", "ItemIsAddedBy"];

    /// Case-insensitive suffix match against the special set; returns the
    /// canonical suffix used for term lookup.
    pub fn special_suffix(relation: &str) -> Option<&'static str> {
        let lower = relation.to_ascii_lowercase();
        SPECIAL_SUFFIXES
            .iter()
            .find(|suffix| lower.ends_with(&suffix.to_ascii_lowercase()))
            .copied()
    }

    pub fn is_containment(relation: &str) -> bool {
        relation == CONTAINS
    }
}

/// Well-known scalar property names
pub mod properties {
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Description";
    pub const COPYRIGHT: &str = "Copyright";
    pub const DATE_PUBLISHED: &str = "DatePublished";
    pub const MIME_TYPE: &str = "MimeType";
    pub const FILE_EXTENSION: &str = "FileExtension";
    pub const SIZE: &str = "Size";
    pub const FIRST_NAME: &str = "FirstName";
    pub const MIDDLE_NAME: &str = "MiddleName";
    pub const LAST_NAME: &str = "LastName";
    pub const EMAIL: &str = "Email";
    pub const URI: &str = "Uri";
}

/// Extension-property names used by the Atom entry mapping
pub mod extensions {
    /// Content-type hint for a non-plain-text entry title
    pub const TITLE_CONTENT_TYPE: &str = "TitleContentType";
    /// Entry summary (no first-class resource field)
    pub const SUMMARY: &str = "Summary";
    /// Out-of-line content URL, overridden by attached binary media
    pub const CONTENT_URL: &str = "ContentUrl";
    /// Repeatable free-form link payloads
    pub const LINK: &str = "Link";
    pub const SOURCE: &str = "Source";
}

/// A resource-attached name/value pair carrying metadata with no dedicated
/// first-class field; names may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionProperty {
    pub name: String,
    pub value: String,
}

/// A typed relationship between two resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: ResourceId,
    pub subject: ResourceId,
    pub predicate: String,
    pub object: ResourceId,
}

/// One resource in the repository graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    /// Concrete type name, resolvable through the type registry
    pub type_name: String,
    /// Scalar property values keyed by declared property name, in
    /// declaration-stable order
    pub properties: IndexMap<String, ScalarValue>,
    /// Repeatable extension properties
    pub extensions: Vec<ExtensionProperty>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub created_by: String,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Resource {
    pub fn new(type_name: impl Into<String>, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ResourceId::generate(),
            type_name: type_name.into(),
            properties: IndexMap::new(),
            extensions: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            created_by: created_by.into(),
            date_added: now,
            date_modified: now,
        }
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn clear_property(&mut self, name: &str) {
        self.properties.shift_remove(name);
    }

    pub fn property(&self, name: &str) -> Option<&ScalarValue> {
        self.properties.get(name).filter(|v| !v.is_null())
    }

    pub fn title(&self) -> Option<&str> {
        self.property(properties::TITLE).and_then(|v| v.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.property(properties::DESCRIPTION)
            .and_then(|v| v.as_str())
    }

    /// First value of the named extension property
    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// All values of the named extension property, in insertion order
    pub fn extensions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.extensions
            .iter()
            .filter(move |e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Replace the single value of the named extension property
    pub fn set_extension(&mut self, name: &str, value: impl Into<String>) {
        self.clear_extensions(name);
        self.extensions.push(ExtensionProperty {
            name: name.to_string(),
            value: value.into(),
        });
    }

    /// Append one value of a repeatable extension property
    pub fn add_extension(&mut self, name: &str, value: impl Into<String>) {
        self.extensions.push(ExtensionProperty {
            name: name.to_string(),
            value: value.into(),
        });
    }

    pub fn clear_extensions(&mut self, name: &str) {
        self.extensions.retain(|e| e.name != name);
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.date_modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_suffix_case_insensitive() {
        assert_eq!(
            relations::special_suffix("ScholarlyWorkIsCitedBy"),
            Some("IsCitedBy")
        );
        assert_eq!(
            relations::special_suffix("scholarlyworkhasversion"),
            Some("HasVersion")
        );
        assert_eq!(relations::special_suffix(relations::CONTAINS), None);
        assert_eq!(relations::special_suffix(relations::AUTHORED_BY), None);
    }

    #[test]
    fn test_null_property_hidden() {
        let mut work = Resource::new("Publication", "admin");
        work.set_property(properties::TITLE, "On Aggregations");
        work.set_property(properties::DESCRIPTION, ScalarValue::Null);

        assert_eq!(work.title(), Some("On Aggregations"));
        assert!(work.property(properties::DESCRIPTION).is_none());
    }

    #[test]
    fn test_repeatable_extensions() {
        let mut work = Resource::new("Publication", "admin");
        work.add_extension(extensions::LINK, "first");
        work.add_extension(extensions::LINK, "second");
        work.set_extension(extensions::SUMMARY, "short");
        work.set_extension(extensions::SUMMARY, "replaced");

        let links: Vec<_> = work.extensions_named(extensions::LINK).collect();
        assert_eq!(links, vec!["first", "second"]);
        assert_eq!(work.extension(extensions::SUMMARY), Some("replaced"));
        assert_eq!(work.extensions_named(extensions::SUMMARY).count(), 1);
    }

    #[test]
    fn test_resource_serde_roundtrip() {
        let mut work = Resource::new("Publication", "admin");
        work.set_property(properties::TITLE, "On Aggregations");
        work.set_property("PageCount", 320i32);
        work.add_extension(extensions::LINK, "payload");
        work.tags.push("graphs".to_string());

        let json = serde_json::to_string(&work).unwrap();
        let back: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, work);
        // Property order survives the round trip.
        let names: Vec<_> = back.properties.keys().collect();
        assert_eq!(names, vec!["Title", "PageCount"]);
    }

    #[test]
    fn test_touch_advances_modified() {
        let mut work = Resource::new("Publication", "admin");
        let before = work.date_modified;
        std::thread::sleep(std::time::Duration::from_millis(5));
        work.touch();
        assert!(work.date_modified > before);
        assert!(work.date_added < work.date_modified);
    }
}
