//! Resource maps and their serialization snapshots
//!
//! A `ResourceMap` wraps one aggregation tree with map-level metadata; it is
//! owned exclusively by the request that built it. `to_memento` freezes the
//! tree into flat parallel lists so the serializer can run straight-line
//! over the snapshot without re-traversal, and without holding a reference
//! into live graph-backed objects.

use super::aggregation::{
    AggregatedResource, AggregationBuilder, RelationSnapshot, ScalarSnapshot,
};
use crate::config::RepositoryConfig;
use crate::error::RepositoryResult;
use crate::resource::{ResourceId, TypeRegistry};
use crate::store::{Authorizer, Principal, ResourceGraph};
use chrono::{DateTime, Utc};

/// An ORE resource map: one aggregation tree plus map-level metadata
#[derive(Debug, Clone)]
pub struct ResourceMap {
    pub root: AggregatedResource,
    pub map_uri: String,
    pub map_creator: String,
    pub map_modified: DateTime<Utc>,
}

/// Identity of one aggregated node in the frozen snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedNodeRef {
    pub uri: ResourceId,
    pub resource_type: String,
}

/// Immutable serialization snapshot of a resource map. Once produced it is
/// never mutated; the serializer reads it and the request discards it.
#[derive(Debug, Clone)]
pub struct ResourceMapMemento {
    pub map_uri: String,
    pub map_creator: String,
    pub map_modified: DateTime<Utc>,
    pub root_uri: ResourceId,
    pub root_type: String,
    /// Every aggregated descendant of the root, pre-order
    pub aggregated: Vec<AggregatedNodeRef>,
    /// Outgoing typed relations of the root (containment excluded)
    pub relations: Vec<RelationSnapshot>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Scalar properties of the root
    pub scalar_properties: Vec<ScalarSnapshot>,
}

impl ResourceMap {
    /// Freeze this map into its serialization snapshot
    pub fn to_memento(&self) -> ResourceMapMemento {
        let mut aggregated = Vec::new();
        for child in &self.root.children {
            flatten(child, &mut aggregated);
        }
        ResourceMapMemento {
            map_uri: self.map_uri.clone(),
            map_creator: self.map_creator.clone(),
            map_modified: self.map_modified,
            root_uri: self.root.uri,
            root_type: self.root.resource_type.clone(),
            aggregated,
            relations: self.root.relations.clone(),
            tags: self.root.tags.clone(),
            categories: self.root.categories.clone(),
            scalar_properties: self.root.scalar_properties.clone(),
        }
    }
}

fn flatten(node: &AggregatedResource, out: &mut Vec<AggregatedNodeRef>) {
    out.push(AggregatedNodeRef {
        uri: node.uri,
        resource_type: node.resource_type.clone(),
    });
    for child in &node.children {
        flatten(child, out);
    }
}

/// Builds resource maps at the configured default aggregation depth
pub struct ResourceMapBuilder<'a> {
    graph: &'a dyn ResourceGraph,
    authz: &'a dyn Authorizer,
    types: &'a TypeRegistry,
    config: &'a RepositoryConfig,
    principal: &'a Principal,
}

impl<'a> ResourceMapBuilder<'a> {
    pub fn new(
        graph: &'a dyn ResourceGraph,
        authz: &'a dyn Authorizer,
        types: &'a TypeRegistry,
        config: &'a RepositoryConfig,
        principal: &'a Principal,
    ) -> Self {
        Self {
            graph,
            authz,
            types,
            config,
            principal,
        }
    }

    /// Build the resource map for `id`. Map creator and modification time
    /// are fixed at construction.
    pub fn build_map(&self, id: ResourceId) -> RepositoryResult<ResourceMap> {
        let builder = AggregationBuilder::new(self.graph, self.authz, self.types, self.principal);
        let root = builder.build(id, self.config.aggregation_depth)?;
        Ok(ResourceMap {
            root,
            map_uri: self.config.resource_map_uri(id),
            map_creator: self.principal.name.clone(),
            map_modified: Utc::now(),
        })
    }
}
