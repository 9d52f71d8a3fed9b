//! Collection name resolution
//!
//! Maps an external AtomPub collection name to an internal resource type and
//! back. Collections are the registered types assignable to the scholarly
//! base type that opt in via the collection-eligibility flag.

use crate::error::{RepositoryError, RepositoryResult};
use crate::resource::{Resource, ResourceId, ResourceType, TypeRegistry, SCHOLARLY_WORK};
use crate::store::ResourceGraph;

/// Resolves collection names against the type registry
pub struct CollectionResolver<'a> {
    types: &'a TypeRegistry,
}

impl<'a> CollectionResolver<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Resolve a collection name to its resource type. An empty name is an
    /// argument error; an unknown or ineligible name is not-found.
    pub fn resolve(&self, collection: &str) -> RepositoryResult<&'a ResourceType> {
        if collection.trim().is_empty() {
            return Err(RepositoryError::invalid_argument(
                "collection",
                "must not be empty",
            ));
        }
        self.types
            .resolve(collection)
            .filter(|t| t.collection_eligible)
            .filter(|t| self.types.is_assignable_to(&t.name, SCHOLARLY_WORK))
            .ok_or_else(|| RepositoryError::not_found("collection", collection))
    }

    /// Concrete type names a member of `collection` may have
    pub fn member_type_names(&self, collection: &str) -> RepositoryResult<Vec<String>> {
        let base = self.resolve(collection)?;
        Ok(self
            .types
            .assignable_types(&base.name)
            .iter()
            .map(|t| t.name.clone())
            .collect())
    }

    /// Fetch a member of `collection`: the resource must exist and carry a
    /// type assignable to the collection's type
    pub fn resolve_member(
        &self,
        graph: &dyn ResourceGraph,
        collection: &str,
        id: ResourceId,
    ) -> RepositoryResult<Resource> {
        let member_types = self.member_type_names(collection)?;
        let resource = graph
            .get_by_id(id)
            .ok_or_else(|| RepositoryError::not_found("member", id))?;
        if !member_types.contains(&resource.type_name) {
            return Err(RepositoryError::not_found("member", id));
        }
        Ok(resource)
    }

    /// All collection names, alphabetically sorted
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .assignable_types(SCHOLARLY_WORK)
            .iter()
            .filter(|t| t.collection_eligible)
            .map(|t| t.name.clone())
            .collect();
        names.sort();
        names
    }
}
