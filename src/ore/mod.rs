//! Object Reuse & Exchange (ORE) resource maps
//!
//! Given a resource id, this subsystem walks everything the resource
//! aggregates (contained works, typed relationships, tags, categories and
//! scalar metadata) to a bounded depth, freezes the result into an
//! immutable snapshot, and serializes the snapshot as an OAI-ORE RDF/XML
//! resource map. Graph traversal and serialization never share live state:
//! the serializer sees only the frozen memento.

mod aggregation;
mod rdfxml;
mod resource_map;
mod terms;

pub use aggregation::{AggregatedResource, AggregationBuilder, RelationSnapshot, ScalarSnapshot};
pub use rdfxml::RdfXmlSerializer;
pub use resource_map::{AggregatedNodeRef, ResourceMap, ResourceMapBuilder, ResourceMapMemento};
pub use terms::{ns, TermRegistry};
