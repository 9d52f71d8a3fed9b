//! In-memory reference implementation of the collaborator traits
//!
//! Hash maps keyed by resource id with a type index for fast collection
//! queries and adjacency lists for relationship traversal. `save` commits a
//! generation counter and can be primed to fail once, for exercising the
//! wrapped-store-error path.

use super::{Authorizer, ContentStore, Permission, Principal, ResourceGraph};
use crate::error::StoreError;
use crate::resource::{Relationship, Resource, ResourceId};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

/// In-memory resource graph
#[derive(Debug, Default)]
pub struct MemoryGraph {
    resources: HashMap<ResourceId, Resource>,
    relationships: HashMap<ResourceId, Relationship>,

    /// Type name -> resource ids, for collection queries
    type_index: HashMap<String, HashSet<ResourceId>>,

    /// Subject id -> relationship ids, insertion-ordered
    outgoing: HashMap<ResourceId, Vec<ResourceId>>,

    /// Object id -> relationship ids
    incoming: HashMap<ResourceId, Vec<ResourceId>>,

    /// Committed generations
    commits: u64,

    /// When set, the next `save` fails with this message
    fail_next_save: Option<String>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Prime the next `save` call to fail with the store's detail message
    pub fn fail_next_save(&mut self, message: impl Into<String>) {
        self.fail_next_save = Some(message.into());
    }
}

impl ResourceGraph for MemoryGraph {
    fn get_by_id(&self, id: ResourceId) -> Option<Resource> {
        self.resources.get(&id).cloned()
    }

    fn query(&self, type_names: &[&str]) -> Vec<Resource> {
        let mut results = Vec::new();
        for name in type_names {
            if let Some(ids) = self.type_index.get(*name) {
                results.extend(ids.iter().filter_map(|id| self.resources.get(id)).cloned());
            }
        }
        results
    }

    fn add_resource(&mut self, resource: Resource) {
        self.type_index
            .entry(resource.type_name.clone())
            .or_default()
            .insert(resource.id);
        self.resources.insert(resource.id, resource);
    }

    fn update_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.id, resource);
    }

    fn delete_resource(&mut self, id: ResourceId) {
        if let Some(resource) = self.resources.remove(&id) {
            if let Some(ids) = self.type_index.get_mut(&resource.type_name) {
                ids.remove(&id);
            }
        }
    }

    fn relationships_from(&self, id: ResourceId) -> Vec<Relationship> {
        self.outgoing
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|rid| self.relationships.get(rid))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn relationships_to(&self, id: ResourceId) -> Vec<Relationship> {
        self.incoming
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|rid| self.relationships.get(rid))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn add_relationship(
        &mut self,
        subject: ResourceId,
        predicate: &str,
        object: ResourceId,
    ) -> ResourceId {
        let id = ResourceId::generate();
        self.relationships.insert(
            id,
            Relationship {
                id,
                subject,
                predicate: predicate.to_string(),
                object,
            },
        );
        self.outgoing.entry(subject).or_default().push(id);
        self.incoming.entry(object).or_default().push(id);
        id
    }

    fn delete_relationship(&mut self, id: ResourceId) {
        if let Some(rel) = self.relationships.remove(&id) {
            if let Some(ids) = self.outgoing.get_mut(&rel.subject) {
                ids.retain(|rid| *rid != id);
            }
            if let Some(ids) = self.incoming.get_mut(&rel.object) {
                ids.retain(|rid| *rid != id);
            }
        }
    }

    fn related(&self, id: ResourceId, predicate: &str) -> Vec<ResourceId> {
        self.outgoing
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|rid| self.relationships.get(rid))
                    .filter(|rel| rel.predicate == predicate)
                    .map(|rel| rel.object)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if let Some(message) = self.fail_next_save.take() {
            return Err(StoreError::new(message));
        }
        self.commits += 1;
        Ok(())
    }
}

/// In-memory binary content store
#[derive(Debug, Default)]
pub struct MemoryContent {
    blobs: HashMap<ResourceId, Vec<u8>>,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ContentStore for MemoryContent {
    fn upload(&mut self, file: ResourceId, source: &mut dyn Read) -> Result<u64, StoreError> {
        let mut buf = Vec::new();
        source
            .read_to_end(&mut buf)
            .map_err(|e| StoreError::new(format!("content upload failed: {e}")))?;
        let written = buf.len() as u64;
        self.blobs.insert(file, buf);
        Ok(written)
    }

    fn download(&self, file: ResourceId, sink: &mut dyn Write) -> Result<u64, StoreError> {
        let blob = self
            .blobs
            .get(&file)
            .ok_or_else(|| StoreError::new(format!("no content stored for file {file}")))?;
        sink.write_all(blob)
            .map_err(|e| StoreError::new(format!("content download failed: {e}")))?;
        Ok(blob.len() as u64)
    }

    fn exists(&self, file: ResourceId) -> bool {
        self.blobs.contains_key(&file)
    }
}

/// Authorizer that grants everything; the default for embedded use
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAuthorizer;

impl Authorizer for OpenAuthorizer {
    fn authorize(&self, _: ResourceId, _: Permission, _: &Principal) -> bool {
        true
    }

    fn has_create_permission(&self, _: &Principal) -> bool {
        true
    }

    fn grant_default_permissions(&mut self, _: ResourceId, _: &Principal) {}
}

/// Explicit-grant authorizer for exercising the authorization-gated paths
#[derive(Debug, Default)]
pub struct AclAuthorizer {
    grants: HashMap<ResourceId, HashMap<String, HashSet<Permission>>>,
    creators: HashSet<String>,
}

impl AclAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&mut self, resource: ResourceId, principal: &str, permission: Permission) {
        self.grants
            .entry(resource)
            .or_default()
            .entry(principal.to_string())
            .or_default()
            .insert(permission);
    }

    pub fn allow_create(&mut self, principal: &str) {
        self.creators.insert(principal.to_string());
    }
}

impl Authorizer for AclAuthorizer {
    fn authorize(
        &self,
        resource: ResourceId,
        permission: Permission,
        principal: &Principal,
    ) -> bool {
        self.grants
            .get(&resource)
            .and_then(|by_principal| by_principal.get(&principal.name))
            .map(|perms| perms.contains(&permission))
            .unwrap_or(false)
    }

    fn has_create_permission(&self, principal: &Principal) -> bool {
        self.creators.contains(&principal.name)
    }

    fn grant_default_permissions(&mut self, resource: ResourceId, principal: &Principal) {
        for permission in [Permission::Read, Permission::Update, Permission::Delete] {
            self.allow(resource, &principal.name, permission);
        }
    }
}
