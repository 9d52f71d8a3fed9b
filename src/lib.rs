//! Grantha Scholarly Repository
//!
//! An institutional-repository core exposing typed scholarly resources over
//! two complementary surfaces:
//!
//! - **AtomPub**: collection discovery, paged member feeds, and CRUD over
//!   member metadata and attached binary media ([`atom`]).
//! - **OAI-ORE**: bounded-depth aggregation of a work and its contained
//!   works, serialized as an RDF/XML resource map ([`ore`]).
//!
//! Resources live in a typed property graph behind the narrow traits in
//! [`store`]; the scholarly type system itself is declared in [`resource`].
//! Persistence, access control and binary storage are collaborator concerns
//! injected per request, so the crate embeds into any host that can supply
//! the three [`store`] traits.
//!
//! # Example
//!
//! ```
//! use grantha::{
//!     AtomEntry, AtomWriter, MemoryContent, MemoryGraph, OpenAuthorizer,
//!     Principal, RepositoryConfig, TypeRegistry,
//! };
//!
//! let types = TypeRegistry::scholarly();
//! let config = RepositoryConfig::new("http://repo.example.org");
//! let mut graph = MemoryGraph::new();
//! let mut authz = OpenAuthorizer;
//! let mut content = MemoryContent::new();
//!
//! let mut writer = AtomWriter::new(
//!     &mut graph, &mut authz, &mut content, &types, &config,
//!     Principal::new("curator"),
//! );
//! let entry = writer
//!     .create_member("Publication", &AtomEntry::titled("On Computable Numbers"))
//!     .unwrap();
//! assert!(entry.id.is_some());
//! ```

pub mod atom;
pub mod config;
pub mod error;
pub mod ore;
pub mod resource;
pub mod store;
pub mod xml;

pub use atom::{
    AtomEntry, AtomFeed, AtomLink, AtomPersonRef, AtomReader, AtomWriter, CollectionResolver,
    EntryContent, EntryMapper, TextKind,
};
pub use config::RepositoryConfig;
pub use error::{RepositoryError, RepositoryResult, StoreError};
pub use ore::{
    AggregatedResource, AggregationBuilder, RdfXmlSerializer, ResourceMap, ResourceMapBuilder,
    ResourceMapMemento, TermRegistry,
};
pub use resource::{
    Relationship, Resource, ResourceId, ResourceType, ScalarType, ScalarValue, TypeRegistry,
};
pub use store::{
    AclAuthorizer, Authorizer, ContentStore, MemoryContent, MemoryGraph, OpenAuthorizer,
    Permission, Principal, ResourceGraph,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
