//! Resource identifiers and the declared type system
//!
//! The type registry is the §6-style type resolver: it exposes each type's
//! base-type chain, scalar-property declarations and navigation-property
//! declarations, and answers assignability questions for collection
//! resolution and tagging support.

use crate::error::{RepositoryError, RepositoryResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque external identifier of a resource (a UUID on the wire)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Mint a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse an external identifier; a malformed id is an argument error
    pub fn parse(value: &str) -> RepositoryResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|e| RepositoryError::invalid_argument("id", e.to_string()))
    }

    /// `urn:{id}` form embedded in Atom entry ids
    pub fn as_urn(&self) -> String {
        format!("urn:{}", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared type of a scalar property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    String,
    Int16,
    Int32,
    Int64,
    Decimal,
    Boolean,
    DateTime,
}

impl ScalarType {
    /// XSD datatype IRI used when the property is serialized as a typed
    /// RDF literal
    pub fn xsd_datatype(&self) -> &'static str {
        match self {
            ScalarType::String => "http://www.w3.org/2001/XMLSchema#string",
            ScalarType::Int16 => "http://www.w3.org/2001/XMLSchema#short",
            ScalarType::Int32 => "http://www.w3.org/2001/XMLSchema#integer",
            ScalarType::Int64 => "http://www.w3.org/2001/XMLSchema#long",
            ScalarType::Decimal => "http://www.w3.org/2001/XMLSchema#decimal",
            ScalarType::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            ScalarType::DateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
        }
    }
}

/// Scalar-property declaration on a resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub value_type: ScalarType,
}

/// Navigation-property declaration (a typed relationship a resource of this
/// type may participate in as subject)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationDecl {
    pub relation: String,
    pub target_type: String,
}

/// A declared resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub name: String,
    /// Name of the base type, if any
    pub base: Option<String>,
    /// Scalar properties declared directly on this type
    pub properties: Vec<PropertyDecl>,
    /// Navigation properties declared directly on this type
    pub navigations: Vec<NavigationDecl>,
    /// Whether this type is exposed as an AtomPub collection
    pub collection_eligible: bool,
}

impl ResourceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            properties: Vec::new(),
            navigations: Vec::new(),
            collection_eligible: false,
        }
    }

    pub fn extending(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::new(name)
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value_type: ScalarType) -> Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            value_type,
        });
        self
    }

    pub fn with_navigation(
        mut self,
        relation: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        self.navigations.push(NavigationDecl {
            relation: relation.into(),
            target_type: target_type.into(),
        });
        self
    }

    pub fn collection_eligible(mut self) -> Self {
        self.collection_eligible = true;
        self
    }
}

/// Registry of declared resource types with base-type chain resolution
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, ResourceType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type; the first registration of a name wins
    pub fn register(&mut self, resource_type: ResourceType) -> bool {
        if self.types.contains_key(&resource_type.name) {
            return false;
        }
        self.types.insert(resource_type.name.clone(), resource_type);
        true
    }

    pub fn resolve(&self, name: &str) -> Option<&ResourceType> {
        self.types.get(name)
    }

    /// The type itself followed by its ancestors, root-most last
    pub fn ancestry(&self, name: &str) -> Vec<&ResourceType> {
        let mut chain = Vec::new();
        let mut current = self.types.get(name);
        while let Some(t) = current {
            chain.push(t);
            current = t.base.as_deref().and_then(|b| self.types.get(b));
        }
        chain
    }

    /// Whether `name` is `base` or declares it somewhere up its chain
    pub fn is_assignable_to(&self, name: &str, base: &str) -> bool {
        self.ancestry(name).iter().any(|t| t.name == base)
    }

    /// Scalar declarations of the type and every ancestor type
    pub fn scalar_declarations(&self, name: &str) -> Vec<&PropertyDecl> {
        self.ancestry(name)
            .iter()
            .flat_map(|t| t.properties.iter())
            .collect()
    }

    /// All registered types assignable to `base`
    pub fn assignable_types(&self, base: &str) -> Vec<&ResourceType> {
        self.types
            .values()
            .filter(|t| self.is_assignable_to(&t.name, base))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.values()
    }

    /// The default scholarly schema: a `ScholarlyWork` base type with
    /// publication, thesis and lecture subtypes, plus the auxiliary file and
    /// contact types.
    pub fn scholarly() -> Self {
        use super::resource::relations;

        let mut registry = Self::new();

        registry.register(
            ResourceType::new(SCHOLARLY_WORK)
                .collection_eligible()
                .with_property("Title", ScalarType::String)
                .with_property("Description", ScalarType::String)
                .with_property("Copyright", ScalarType::String)
                .with_property("Language", ScalarType::String)
                .with_property("Notes", ScalarType::String)
                .with_property("DateAvailableFrom", ScalarType::DateTime)
                .with_property("DateAvailableUntil", ScalarType::DateTime)
                .with_navigation(relations::CONTAINS, SCHOLARLY_WORK)
                .with_navigation(relations::AUTHORED_BY, CONTACT)
                .with_navigation(relations::CONTRIBUTED_BY, CONTACT)
                .with_navigation(relations::HAS_FILE, FILE)
                .with_navigation(relations::IS_CITED_BY, SCHOLARLY_WORK)
                .with_navigation(relations::HAS_VERSION, SCHOLARLY_WORK)
                .with_navigation(relations::HAS_REPRESENTATION, SCHOLARLY_WORK)
                .with_navigation(relations::ITEM_ADDED_BY, CONTACT),
        );

        registry.register(
            ResourceType::extending(PUBLICATION, SCHOLARLY_WORK)
                .collection_eligible()
                .with_property("DatePublished", ScalarType::DateTime)
                .with_property("DOI", ScalarType::String)
                .with_property("PageCount", ScalarType::Int32)
                .with_property("Year", ScalarType::Int16)
                .with_property("Downloads", ScalarType::Int64)
                .with_property("PeerReviewed", ScalarType::Boolean)
                .with_property("ImpactFactor", ScalarType::Decimal),
        );

        registry.register(
            ResourceType::extending(THESIS, SCHOLARLY_WORK)
                .collection_eligible()
                .with_property("Institution", ScalarType::String),
        );

        registry.register(
            ResourceType::extending(LECTURE, SCHOLARLY_WORK)
                .collection_eligible()
                .with_property("Venue", ScalarType::String)
                .with_property("DateRecorded", ScalarType::DateTime),
        );

        registry.register(
            ResourceType::new(FILE)
                .with_property("MimeType", ScalarType::String)
                .with_property("FileExtension", ScalarType::String)
                .with_property("Size", ScalarType::Int64)
                .with_property("Checksum", ScalarType::String),
        );

        registry.register(
            ResourceType::new(CONTACT)
                .with_property("FirstName", ScalarType::String)
                .with_property("MiddleName", ScalarType::String)
                .with_property("LastName", ScalarType::String)
                .with_property("Email", ScalarType::String)
                .with_property("Uri", ScalarType::String),
        );

        registry
    }
}

/// Well-known type names of the scholarly schema
pub const SCHOLARLY_WORK: &str = "ScholarlyWork";
pub const PUBLICATION: &str = "Publication";
pub const THESIS: &str = "Thesis";
pub const LECTURE: &str = "Lecture";
pub const FILE: &str = "File";
pub const CONTACT: &str = "Contact";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_parse_and_urn() {
        let id = ResourceId::parse("1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4").unwrap();
        assert_eq!(id.as_urn(), "urn:1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4");

        let err = ResourceId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::InvalidArgument { name: "id", .. }
        ));
    }

    #[test]
    fn test_ancestry_and_assignability() {
        let registry = TypeRegistry::scholarly();

        let chain: Vec<_> = registry
            .ancestry(PUBLICATION)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(chain, vec![PUBLICATION, SCHOLARLY_WORK]);

        assert!(registry.is_assignable_to(PUBLICATION, SCHOLARLY_WORK));
        assert!(registry.is_assignable_to(SCHOLARLY_WORK, SCHOLARLY_WORK));
        assert!(!registry.is_assignable_to(FILE, SCHOLARLY_WORK));
    }

    #[test]
    fn test_scalar_declarations_include_ancestors() {
        let registry = TypeRegistry::scholarly();
        let decls = registry.scalar_declarations(PUBLICATION);
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();

        assert!(names.contains(&"DOI"));
        assert!(names.contains(&"Title"));
        assert!(names.contains(&"Copyright"));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = TypeRegistry::scholarly();
        let shadow = ResourceType::new(PUBLICATION).with_property("Bogus", ScalarType::String);
        assert!(!registry.register(shadow));
        assert!(registry
            .resolve(PUBLICATION)
            .unwrap()
            .properties
            .iter()
            .all(|p| p.name != "Bogus"));
    }

    #[test]
    fn test_assignable_types_filter() {
        let registry = TypeRegistry::scholarly();
        let works = registry.assignable_types(SCHOLARLY_WORK);
        assert_eq!(works.len(), 4);
        assert!(works.iter().all(|t| t.name != FILE));
    }
}
