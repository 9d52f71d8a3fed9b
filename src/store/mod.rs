//! External collaborator interfaces
//!
//! The AtomPub adapters and the ORE pipeline never touch persistence or
//! access control directly; they go through the three narrow traits in this
//! module. Each incoming request is expected to open its own scope onto
//! these collaborators; there is no cross-request session state in this
//! layer. An in-memory reference implementation lives in [`memory`] for
//! tests and embedders without an external store.

mod memory;

pub use memory::{AclAuthorizer, MemoryContent, MemoryGraph, OpenAuthorizer};

use crate::error::StoreError;
use crate::resource::{Relationship, Resource, ResourceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};

/// Permission checked before an operation on an existing resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Read,
    Update,
    Delete,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Read => write!(f, "read"),
            Permission::Update => write!(f, "update"),
            Permission::Delete => write!(f, "delete"),
        }
    }
}

/// The security principal a request runs as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Typed resource-graph store: CRUD, typed queries and navigation-property
/// loading. Mutations are staged; `save` commits them as one unit and is
/// invoked exactly once per logical adapter operation, after all cascading
/// changes have been staged.
pub trait ResourceGraph {
    fn get_by_id(&self, id: ResourceId) -> Option<Resource>;

    /// All resources whose concrete type is one of `type_names`
    fn query(&self, type_names: &[&str]) -> Vec<Resource>;

    fn add_resource(&mut self, resource: Resource);

    fn update_resource(&mut self, resource: Resource);

    fn delete_resource(&mut self, id: ResourceId);

    /// Outgoing relationships with `id` as subject
    fn relationships_from(&self, id: ResourceId) -> Vec<Relationship>;

    /// Incoming relationships with `id` as object
    fn relationships_to(&self, id: ResourceId) -> Vec<Relationship>;

    fn add_relationship(
        &mut self,
        subject: ResourceId,
        predicate: &str,
        object: ResourceId,
    ) -> ResourceId;

    fn delete_relationship(&mut self, id: ResourceId);

    /// Lazy navigation-property load: object ids of `predicate` edges from
    /// `id`, in insertion order
    fn related(&self, id: ResourceId, predicate: &str) -> Vec<ResourceId>;

    /// Commit staged mutations; a failure carries the store's detail message
    fn save(&mut self) -> Result<(), StoreError>;
}

/// Authorization collaborator
pub trait Authorizer {
    fn authorize(&self, resource: ResourceId, permission: Permission, principal: &Principal)
        -> bool;

    fn has_create_permission(&self, principal: &Principal) -> bool;

    /// Grant the creator default ownership permissions on a new resource
    fn grant_default_permissions(&mut self, resource: ResourceId, principal: &Principal);
}

/// Binary content store keyed by file-resource id. Both directions are
/// blocking stream copies scoped to the single call.
pub trait ContentStore {
    fn upload(&mut self, file: ResourceId, source: &mut dyn Read) -> Result<u64, StoreError>;

    fn download(&self, file: ResourceId, sink: &mut dyn Write) -> Result<u64, StoreError>;

    fn exists(&self, file: ResourceId) -> bool;
}
