//! Typed resource model
//!
//! Resources are nodes in the repository graph: each carries a concrete type
//! drawn from a declared type system, scalar property values, repeatable
//! extension properties, tags and categories. Typed relationships connect
//! resources; containment is the relationship the ORE aggregation walks.

mod resource;
mod types;
mod value;

pub use resource::{extensions, properties, relations, ExtensionProperty, Relationship, Resource};
pub use types::{
    NavigationDecl, PropertyDecl, ResourceId, ResourceType, ScalarType, TypeRegistry, CONTACT,
    FILE, LECTURE, PUBLICATION, SCHOLARLY_WORK, THESIS,
};
pub use value::ScalarValue;
