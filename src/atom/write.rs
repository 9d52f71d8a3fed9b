//! AtomPub write adapter
//!
//! Member and media creation, metadata and media update, member and media
//! deletion with cascading relationship and property cleanup. Authorization
//! is enforced before every mutation, and each logical operation stages all
//! of its changes before committing with a single `save` call.

use super::collection::CollectionResolver;
use super::entry::AtomEntry;
use super::mapping::EntryMapper;
use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::resource::{properties, relations, Resource, ResourceId, TypeRegistry, FILE};
use crate::store::{Authorizer, ContentStore, Permission, Principal, ResourceGraph};
use tracing::debug;

/// Per-request write scope over the AtomPub surface
pub struct AtomWriter<'a> {
    graph: &'a mut dyn ResourceGraph,
    authz: &'a mut dyn Authorizer,
    content: &'a mut dyn ContentStore,
    types: &'a TypeRegistry,
    config: &'a RepositoryConfig,
    principal: Principal,
}

impl<'a> AtomWriter<'a> {
    pub fn new(
        graph: &'a mut dyn ResourceGraph,
        authz: &'a mut dyn Authorizer,
        content: &'a mut dyn ContentStore,
        types: &'a TypeRegistry,
        config: &'a RepositoryConfig,
        principal: Principal,
    ) -> Self {
        Self {
            graph,
            authz,
            content,
            types,
            config,
            principal,
        }
    }

    /// Create a collection member from an entry and return its projection
    pub fn create_member(
        &mut self,
        collection: &str,
        entry: &AtomEntry,
    ) -> RepositoryResult<AtomEntry> {
        let member_type = {
            let resolver = CollectionResolver::new(self.types);
            resolver.resolve(collection)?.name.clone()
        };
        self.require_create_permission()?;

        let mut member = Resource::new(member_type, self.principal.name.clone());
        let mapper = EntryMapper::new(self.types, self.config);
        mapper.apply_entry(entry, &mut member, &mut *self.graph, &self.principal)?;

        let id = member.id;
        self.graph.add_resource(member.clone());
        self.authz.grant_default_permissions(id, &self.principal);
        self.graph.save()?;
        debug!(collection, %id, "created member");

        Ok(mapper.to_entry(&member, &*self.graph))
    }

    /// Create a member around an uploaded binary payload
    pub fn create_media(
        &mut self,
        collection: &str,
        mime_type: &str,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> RepositoryResult<AtomEntry> {
        validate_media_arguments(mime_type, bytes)?;
        let member_type = {
            let resolver = CollectionResolver::new(self.types);
            resolver.resolve(collection)?.name.clone()
        };
        self.require_create_permission()?;

        let file = self.stage_file(mime_type, bytes, extension)?;
        let member = Resource::new(member_type, self.principal.name.clone());
        let (member_id, file_id) = (member.id, file.id);

        self.graph.add_resource(file);
        self.graph.add_resource(member.clone());
        self.graph
            .add_relationship(member_id, relations::HAS_FILE, file_id);
        self.authz.grant_default_permissions(member_id, &self.principal);
        self.authz.grant_default_permissions(file_id, &self.principal);
        self.graph.save()?;
        debug!(collection, %member_id, %file_id, "created media member");

        let mapper = EntryMapper::new(self.types, self.config);
        Ok(mapper.to_entry(&member, &*self.graph))
    }

    /// Replace a member's metadata from an entry
    pub fn update_member_info(
        &mut self,
        collection: &str,
        id: ResourceId,
        entry: &AtomEntry,
    ) -> RepositoryResult<AtomEntry> {
        let mut member = self.fetch_member(collection, id)?;
        self.require(member.id, Permission::Update)?;

        let mapper = EntryMapper::new(self.types, self.config);
        mapper.apply_entry(entry, &mut member, &mut *self.graph, &self.principal)?;
        member.touch();
        self.graph.update_resource(member.clone());
        self.graph.save()?;

        Ok(mapper.to_entry(&member, &*self.graph))
    }

    /// Replace the binary content attached to a member
    pub fn update_media(
        &mut self,
        collection: &str,
        id: ResourceId,
        mime_type: &str,
        bytes: &[u8],
    ) -> RepositoryResult<AtomEntry> {
        validate_media_arguments(mime_type, bytes)?;
        let mut member = self.fetch_member(collection, id)?;
        let mapper = EntryMapper::new(self.types, self.config);
        let mut file = mapper
            .first_file(member.id, &*self.graph)
            .ok_or_else(|| RepositoryError::not_found("media", id))?;
        self.require(file.id, Permission::Update)?;

        file.set_property(properties::MIME_TYPE, mime_type);
        file.set_property(properties::FILE_EXTENSION, infer_extension(mime_type));
        file.set_property(properties::SIZE, bytes.len() as i64);
        file.touch();
        let mut source = bytes;
        self.content.upload(file.id, &mut source)?;
        self.graph.update_resource(file);

        member.touch();
        self.graph.update_resource(member.clone());
        self.graph.save()?;

        Ok(mapper.to_entry(&member, &*self.graph))
    }

    /// Delete a member and cascade over its files, relationships and
    /// extension properties
    pub fn delete_member(&mut self, collection: &str, id: ResourceId) -> RepositoryResult<bool> {
        let member = self.fetch_member(collection, id)?;
        self.require(member.id, Permission::Delete)?;

        for file_id in self.graph.related(member.id, relations::HAS_FILE) {
            self.delete_with_relationships(file_id);
        }
        self.delete_with_relationships(member.id);
        self.graph.save()?;
        debug!(collection, %id, "deleted member");
        Ok(true)
    }

    /// Delete the binary resource attached to a member
    pub fn delete_media(&mut self, collection: &str, id: ResourceId) -> RepositoryResult<bool> {
        let mut member = self.fetch_member(collection, id)?;
        let mapper = EntryMapper::new(self.types, self.config);
        let file = mapper
            .first_file(member.id, &*self.graph)
            .ok_or_else(|| RepositoryError::not_found("media", id))?;
        self.require(file.id, Permission::Delete)?;

        self.delete_with_relationships(file.id);
        member.touch();
        self.graph.update_resource(member);
        self.graph.save()?;
        Ok(true)
    }

    /// Delete a resource together with every relationship it participates
    /// in, as subject or object
    fn delete_with_relationships(&mut self, id: ResourceId) {
        for rel in self.graph.relationships_from(id) {
            self.graph.delete_relationship(rel.id);
        }
        for rel in self.graph.relationships_to(id) {
            self.graph.delete_relationship(rel.id);
        }
        self.graph.delete_resource(id);
    }

    fn stage_file(
        &mut self,
        mime_type: &str,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> RepositoryResult<Resource> {
        let mut file = Resource::new(FILE, self.principal.name.clone());
        file.set_property(properties::MIME_TYPE, mime_type);
        let extension = match extension {
            Some(ext) => ext.to_string(),
            None => infer_extension(mime_type),
        };
        file.set_property(properties::FILE_EXTENSION, extension);
        file.set_property(properties::SIZE, bytes.len() as i64);
        let mut source = bytes;
        self.content.upload(file.id, &mut source)?;
        Ok(file)
    }

    fn fetch_member(&self, collection: &str, id: ResourceId) -> RepositoryResult<Resource> {
        CollectionResolver::new(self.types).resolve_member(&*self.graph, collection, id)
    }

    fn require(&self, id: ResourceId, permission: Permission) -> RepositoryResult<()> {
        if !self.authz.authorize(id, permission, &self.principal) {
            return Err(RepositoryError::unauthorized(permission, id));
        }
        Ok(())
    }

    fn require_create_permission(&self) -> RepositoryResult<()> {
        if !self.authz.has_create_permission(&self.principal) {
            return Err(RepositoryError::CreateDenied(self.principal.name.clone()));
        }
        Ok(())
    }
}

fn validate_media_arguments(mime_type: &str, bytes: &[u8]) -> RepositoryResult<()> {
    if mime_type.trim().is_empty() {
        return Err(RepositoryError::invalid_argument(
            "mime_type",
            "must not be empty",
        ));
    }
    if bytes.is_empty() {
        return Err(RepositoryError::invalid_argument(
            "bytes",
            "must not be empty",
        ));
    }
    Ok(())
}

/// Infer a file extension from a MIME type when the caller supplies none
fn infer_extension(mime_type: &str) -> String {
    let Ok(parsed) = mime_type.parse::<mime::Mime>() else {
        return "bin".to_string();
    };
    match (parsed.type_(), parsed.subtype()) {
        (mime::TEXT, mime::PLAIN) => "txt".to_string(),
        (mime::IMAGE, mime::JPEG) => "jpg".to_string(),
        (mime::APPLICATION, mime::OCTET_STREAM) => "bin".to_string(),
        _ => parsed.subtype().as_str().to_string(),
    }
}
