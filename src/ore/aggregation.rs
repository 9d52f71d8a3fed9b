//! Aggregated-resource model
//!
//! One node per resource, holding its scalar properties, outgoing typed
//! relations, tags, categories and child aggregated nodes, built by walking
//! the resource graph to a bounded depth. Depth only bounds descent: a node
//! at the depth limit keeps its identity and provenance but carries no
//! further data. Authorization is re-checked at every node; an
//! unauthorized or missing child is skipped rather than failing the build.

use crate::error::{RepositoryError, RepositoryResult};
use crate::resource::{relations, ResourceId, ScalarType, TypeRegistry, SCHOLARLY_WORK};
use crate::store::{Authorizer, Permission, Principal, ResourceGraph};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Flattened, string-serialized snapshot of one scalar property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarSnapshot {
    pub name: String,
    pub declared_type: ScalarType,
    pub value: String,
}

/// One outgoing typed relation (containment excluded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSnapshot {
    pub relation: String,
    pub target: ResourceId,
    pub target_type: String,
}

/// One node in the aggregation tree. Constructed once per map-building
/// request, read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResource {
    pub uri: ResourceId,
    pub resource_type: String,
    pub creator: String,
    pub last_modified: DateTime<Utc>,
    pub scalar_properties: Vec<ScalarSnapshot>,
    pub relations: Vec<RelationSnapshot>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub children: Vec<AggregatedResource>,
}

impl AggregatedResource {
    /// Longest path from this node to a leaf, in containment edges
    pub fn depth(&self) -> u32 {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Builds aggregation trees by depth-bounded recursive graph walks
pub struct AggregationBuilder<'a> {
    graph: &'a dyn ResourceGraph,
    authz: &'a dyn Authorizer,
    types: &'a TypeRegistry,
    principal: &'a Principal,
}

impl<'a> AggregationBuilder<'a> {
    pub fn new(
        graph: &'a dyn ResourceGraph,
        authz: &'a dyn Authorizer,
        types: &'a TypeRegistry,
        principal: &'a Principal,
    ) -> Self {
        Self {
            graph,
            authz,
            types,
            principal,
        }
    }

    /// Build the aggregation tree rooted at `id`. A missing root and an
    /// unauthorized root both surface as not-found on this path. Revisiting
    /// a resource along one containment path is a cycle error.
    pub fn build(&self, id: ResourceId, max_depth: u32) -> RepositoryResult<AggregatedResource> {
        let mut path = HashSet::new();
        self.build_node(id, max_depth, &mut path)?
            .ok_or_else(|| RepositoryError::not_found("resource", id))
    }

    /// `Ok(None)` means the node is omitted (missing or unauthorized); only
    /// the root call promotes that to an error.
    fn build_node(
        &self,
        id: ResourceId,
        depth: u32,
        path: &mut HashSet<ResourceId>,
    ) -> RepositoryResult<Option<AggregatedResource>> {
        if !path.insert(id) {
            return Err(RepositoryError::CycleDetected(id));
        }
        let result = self.build_node_inner(id, depth, path);
        path.remove(&id);
        result
    }

    fn build_node_inner(
        &self,
        id: ResourceId,
        depth: u32,
        path: &mut HashSet<ResourceId>,
    ) -> RepositoryResult<Option<AggregatedResource>> {
        let Some(resource) = self.graph.get_by_id(id) else {
            debug!(%id, "aggregation skipped missing resource");
            return Ok(None);
        };
        if !self.authz.authorize(id, Permission::Read, self.principal) {
            debug!(%id, principal = %self.principal.name, "aggregation skipped unauthorized resource");
            return Ok(None);
        }

        let mut node = AggregatedResource {
            uri: id,
            resource_type: resource.type_name.clone(),
            creator: resource.created_by.clone(),
            last_modified: resource.date_modified,
            scalar_properties: Vec::new(),
            relations: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            children: Vec::new(),
        };

        // Depth exhausted: a bare placeholder with identity and provenance
        // only.
        if depth == 0 {
            return Ok(Some(node));
        }

        for rel in self.graph.relationships_from(id) {
            if relations::is_containment(&rel.predicate) {
                continue;
            }
            let Some(target) = self.graph.get_by_id(rel.object) else {
                continue;
            };
            node.relations.push(RelationSnapshot {
                relation: rel.predicate,
                target: rel.object,
                target_type: target.type_name,
            });
        }

        for decl in self.types.scalar_declarations(&resource.type_name) {
            if let Some(value) = resource.property(&decl.name) {
                node.scalar_properties.push(ScalarSnapshot {
                    name: decl.name.clone(),
                    declared_type: decl.value_type,
                    value: value.render(),
                });
            }
        }

        if self
            .types
            .is_assignable_to(&resource.type_name, SCHOLARLY_WORK)
        {
            node.tags = resource.tags.clone();
            node.categories = resource.categories.clone();
        }

        for child_id in self.graph.related(id, relations::CONTAINS) {
            if let Some(child) = self.build_node(child_id, depth - 1, path)? {
                node.children.push(child);
            }
        }

        Ok(Some(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{properties, Resource};
    use crate::store::{AclAuthorizer, MemoryGraph, OpenAuthorizer, ResourceGraph as _};

    fn work(graph: &mut MemoryGraph, title: &str) -> ResourceId {
        let mut r = Resource::new("Publication", "admin");
        r.set_property(properties::TITLE, title);
        let id = r.id;
        graph.add_resource(r);
        id
    }

    #[test]
    fn test_depth_zero_is_bare_placeholder() {
        let mut graph = MemoryGraph::new();
        let root = work(&mut graph, "Root");
        let child = work(&mut graph, "Child");
        graph.add_relationship(root, relations::CONTAINS, child);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("admin");
        let builder = AggregationBuilder::new(&graph, &OpenAuthorizer, &types, &principal);

        let node = builder.build(root, 0).unwrap();
        assert_eq!(node.uri, root);
        assert_eq!(node.resource_type, "Publication");
        assert!(node.children.is_empty());
        assert!(node.scalar_properties.is_empty());
        assert!(node.relations.is_empty());
        assert!(node.tags.is_empty());
    }

    #[test]
    fn test_depth_bounds_descent_not_breadth() {
        let mut graph = MemoryGraph::new();
        let root = work(&mut graph, "Root");
        let child = work(&mut graph, "Child");
        let grandchild = work(&mut graph, "Grandchild");
        graph.add_relationship(root, relations::CONTAINS, child);
        graph.add_relationship(child, relations::CONTAINS, grandchild);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("admin");
        let builder = AggregationBuilder::new(&graph, &OpenAuthorizer, &types, &principal);

        let tree = builder.build(root, 1).unwrap();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.children.len(), 1);
        // The depth-exhausted child still appears, as a placeholder.
        assert!(tree.children[0].children.is_empty());
        assert!(tree.children[0].scalar_properties.is_empty());

        let deeper = builder.build(root, 2).unwrap();
        assert_eq!(deeper.depth(), 2);
        assert_eq!(deeper.children[0].children.len(), 1);
    }

    #[test]
    fn test_containment_excluded_from_relations() {
        let mut graph = MemoryGraph::new();
        let root = work(&mut graph, "Root");
        let child = work(&mut graph, "Child");
        let cited = work(&mut graph, "Cited");
        graph.add_relationship(root, relations::CONTAINS, child);
        graph.add_relationship(root, relations::IS_CITED_BY, cited);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("admin");
        let builder = AggregationBuilder::new(&graph, &OpenAuthorizer, &types, &principal);

        let tree = builder.build(root, 1).unwrap();
        assert_eq!(tree.relations.len(), 1);
        assert_eq!(tree.relations[0].relation, relations::IS_CITED_BY);
        assert_eq!(tree.relations[0].target, cited);
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_unauthorized_child_silently_skipped() {
        let mut graph = MemoryGraph::new();
        let root = work(&mut graph, "Root");
        let open_child = work(&mut graph, "Open");
        let closed_child = work(&mut graph, "Closed");
        graph.add_relationship(root, relations::CONTAINS, open_child);
        graph.add_relationship(root, relations::CONTAINS, closed_child);

        let mut acl = AclAuthorizer::new();
        acl.allow(root, "reader", Permission::Read);
        acl.allow(open_child, "reader", Permission::Read);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("reader");
        let builder = AggregationBuilder::new(&graph, &acl, &types, &principal);

        let tree = builder.build(root, 1).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].uri, open_child);
    }

    #[test]
    fn test_unauthorized_root_is_not_found() {
        let mut graph = MemoryGraph::new();
        let root = work(&mut graph, "Root");

        let acl = AclAuthorizer::new();
        let types = TypeRegistry::scholarly();
        let principal = Principal::new("reader");
        let builder = AggregationBuilder::new(&graph, &acl, &types, &principal);

        let err = builder.build(root, 1).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = MemoryGraph::new();
        let a = work(&mut graph, "A");
        let b = work(&mut graph, "B");
        graph.add_relationship(a, relations::CONTAINS, b);
        graph.add_relationship(b, relations::CONTAINS, a);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("admin");
        let builder = AggregationBuilder::new(&graph, &OpenAuthorizer, &types, &principal);

        let err = builder.build(a, 5).unwrap_err();
        assert!(matches!(err, RepositoryError::CycleDetected(id) if id == a));
    }

    #[test]
    fn test_diamond_containment_is_not_a_cycle() {
        let mut graph = MemoryGraph::new();
        let root = work(&mut graph, "Root");
        let left = work(&mut graph, "Left");
        let right = work(&mut graph, "Right");
        let shared = work(&mut graph, "Shared");
        graph.add_relationship(root, relations::CONTAINS, left);
        graph.add_relationship(root, relations::CONTAINS, right);
        graph.add_relationship(left, relations::CONTAINS, shared);
        graph.add_relationship(right, relations::CONTAINS, shared);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("admin");
        let builder = AggregationBuilder::new(&graph, &OpenAuthorizer, &types, &principal);

        let tree = builder.build(root, 3).unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children.len(), 1);
        assert_eq!(tree.children[1].children.len(), 1);
    }

    #[test]
    fn test_scalar_snapshot_skips_nulls() {
        let mut graph = MemoryGraph::new();
        let mut r = Resource::new("Publication", "admin");
        r.set_property(properties::TITLE, "Typed");
        r.set_property("PageCount", 120i32);
        r.set_property("Description", crate::resource::ScalarValue::Null);
        let id = r.id;
        graph.add_resource(r);

        let types = TypeRegistry::scholarly();
        let principal = Principal::new("admin");
        let builder = AggregationBuilder::new(&graph, &OpenAuthorizer, &types, &principal);

        let node = builder.build(id, 1).unwrap();
        let names: Vec<_> = node
            .scalar_properties
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert!(names.contains(&"Title"));
        assert!(names.contains(&"PageCount"));
        assert!(!names.contains(&"Description"));

        let pages = node
            .scalar_properties
            .iter()
            .find(|s| s.name == "PageCount")
            .unwrap();
        assert_eq!(pages.declared_type, ScalarType::Int32);
        assert_eq!(pages.value, "120");
    }
}
