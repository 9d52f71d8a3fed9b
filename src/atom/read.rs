//! AtomPub read adapter
//!
//! Collection listing, paged member listing, single-member retrieval,
//! membership and media-presence checks, binary media streaming. One
//! instance per request; all graph access is synchronous and sequential.

use super::collection::CollectionResolver;
use super::entry::{AtomEntry, AtomFeed};
use super::mapping::EntryMapper;
use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, RepositoryResult};
use crate::resource::{Resource, ResourceId, TypeRegistry};
use crate::store::{Authorizer, ContentStore, Permission, Principal, ResourceGraph};
use chrono::Utc;
use std::io::Write;
use tracing::debug;

/// Per-request read scope over the AtomPub surface
pub struct AtomReader<'a> {
    graph: &'a dyn ResourceGraph,
    authz: &'a dyn Authorizer,
    content: &'a dyn ContentStore,
    types: &'a TypeRegistry,
    config: &'a RepositoryConfig,
    principal: Principal,
}

impl<'a> AtomReader<'a> {
    pub fn new(
        graph: &'a dyn ResourceGraph,
        authz: &'a dyn Authorizer,
        content: &'a dyn ContentStore,
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

    /// All exposed collection names, alphabetically sorted
    pub fn list_collections(&self) -> Vec<String> {
        CollectionResolver::new(self.types).collection_names()
    }

    /// One feed page of collection members, ordered by last-modified
    /// descending
    pub fn list_members(
        &self,
        collection: &str,
        skip: i64,
        count: i64,
    ) -> RepositoryResult<AtomFeed> {
        if skip < 0 {
            return Err(RepositoryError::invalid_argument(
                "skip",
                "must not be negative",
            ));
        }
        if count < 0 {
            return Err(RepositoryError::invalid_argument(
                "count",
                "must not be negative",
            ));
        }

        let members = self.readable_members(collection)?;
        let count = (count as usize).min(self.config.max_page_size);
        let mapper = EntryMapper::new(self.types, self.config);
        let entries: Vec<AtomEntry> = members
            .into_iter()
            .skip(skip as usize)
            .take(count)
            .map(|m| mapper.to_entry(&m, self.graph))
            .collect();
        debug!(collection, returned = entries.len(), "listed members");

        Ok(AtomFeed {
            id: self.config.collection_uri(collection),
            title: collection.to_string(),
            updated: Utc::now(),
            entries,
        })
    }

    /// Retrieve one member as an entry
    pub fn get_member(&self, collection: &str, id: ResourceId) -> RepositoryResult<AtomEntry> {
        let member = self.fetch_member(collection, id)?;
        if !self
            .authz
            .authorize(member.id, Permission::Read, &self.principal)
        {
            return Err(RepositoryError::unauthorized(Permission::Read, member.id));
        }
        Ok(EntryMapper::new(self.types, self.config).to_entry(&member, self.graph))
    }

    /// Number of members the principal may read
    pub fn member_count(&self, collection: &str) -> RepositoryResult<usize> {
        Ok(self.readable_members(collection)?.len())
    }

    /// Whether the member exists in the collection. Only a missing member
    /// maps to `false`; argument errors still surface.
    pub fn member_exists(&self, collection: &str, id: ResourceId) -> RepositoryResult<bool> {
        match self.fetch_member(collection, id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn media_exists(&self, collection: &str, id: ResourceId) -> RepositoryResult<bool> {
        let member = match self.fetch_member(collection, id) {
            Ok(member) => member,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };
        let mapper = EntryMapper::new(self.types, self.config);
        Ok(mapper
            .first_file(member.id, self.graph)
            .map(|f| self.content.exists(f.id))
            .unwrap_or(false))
    }

    /// Stream the member's binary content into `sink`; returns bytes copied
    pub fn get_media(
        &self,
        collection: &str,
        id: ResourceId,
        sink: &mut dyn Write,
    ) -> RepositoryResult<u64> {
        let member = self.fetch_member(collection, id)?;
        let mapper = EntryMapper::new(self.types, self.config);
        let file = mapper
            .first_file(member.id, self.graph)
            .ok_or_else(|| RepositoryError::not_found("media", id))?;
        if !self
            .authz
            .authorize(file.id, Permission::Read, &self.principal)
        {
            return Err(RepositoryError::unauthorized(Permission::Read, file.id));
        }
        Ok(self.content.download(file.id, sink)?)
    }

    /// Resolve the collection and fetch a member of an assignable type
    fn fetch_member(&self, collection: &str, id: ResourceId) -> RepositoryResult<Resource> {
        CollectionResolver::new(self.types).resolve_member(self.graph, collection, id)
    }

    fn readable_members(&self, collection: &str) -> RepositoryResult<Vec<Resource>> {
        let resolver = CollectionResolver::new(self.types);
        let member_types = resolver.member_type_names(collection)?;
        let type_refs: Vec<&str> = member_types.iter().map(String::as_str).collect();
        let mut members: Vec<Resource> = self
            .graph
            .query(&type_refs)
            .into_iter()
            .filter(|r| {
                self.authz
                    .authorize(r.id, Permission::Read, &self.principal)
            })
            .collect();
        members.sort_by(|a, b| b.date_modified.cmp(&a.date_modified));
        Ok(members)
    }
}
