//! Repository configuration
//!
//! One value constructed at startup and shared read-only by the adapters and
//! the ORE pipeline. Also owns the URI shapes the two protocol surfaces agree
//! on: `{base}/{collection}/{id}` for members, `{base}/{id}.rdf` for resource
//! maps and `{base}/{id}#aggregation` for the aggregation they describe.

use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};

/// Configuration for the AtomPub store and the ORE serialization engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Base URI the repository is deployed at, without a trailing slash
    pub base_uri: String,

    /// Containment depth for resource-map aggregation trees. The default of 1
    /// describes the root plus its immediate children, not transitively.
    pub aggregation_depth: u32,

    /// Upper bound applied to the `count` argument of member listings
    pub max_page_size: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost/grantha".to_string(),
            aggregation_depth: 1,
            max_page_size: 100,
        }
    }
}

impl RepositoryConfig {
    /// Create a configuration with the given deployment base URI
    pub fn new(base_uri: impl Into<String>) -> Self {
        let mut base_uri = base_uri.into();
        while base_uri.ends_with('/') {
            base_uri.pop();
        }
        Self {
            base_uri,
            ..Self::default()
        }
    }

    /// URI of a resource as aggregated in ORE output
    pub fn resource_uri(&self, id: ResourceId) -> String {
        format!("{}/{}", self.base_uri, id)
    }

    /// URI of the resource map describing `id`
    pub fn resource_map_uri(&self, id: ResourceId) -> String {
        format!("{}/{}.rdf", self.base_uri, id)
    }

    /// URI of the aggregation described by the resource map for `id`
    pub fn aggregation_uri(&self, id: ResourceId) -> String {
        format!("{}/{}#aggregation", self.base_uri, id)
    }

    /// URI of an AtomPub collection feed
    pub fn collection_uri(&self, collection: &str) -> String {
        format!("{}/{}", self.base_uri, collection)
    }

    /// URI of a single collection member
    pub fn member_uri(&self, collection: &str, id: ResourceId) -> String {
        format!("{}/{}/{}", self.base_uri, collection, id)
    }

    /// URI of the binary media attached to a member
    pub fn media_uri(&self, collection: &str, id: ResourceId) -> String {
        format!("{}/{}/{}/media", self.base_uri, collection, id)
    }

    /// URI used when a creator name must appear as a resource reference
    pub fn agent_uri(&self, name: &str) -> String {
        format!("{}/agents/{}", self.base_uri, name.replace(' ', "%20"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_normalized() {
        let config = RepositoryConfig::new("http://repo.example.org/grantha/");
        assert_eq!(config.base_uri, "http://repo.example.org/grantha");
    }

    #[test]
    fn test_uri_shapes() {
        let config = RepositoryConfig::new("http://repo.example.org");
        let id = ResourceId::parse("1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4").unwrap();

        assert_eq!(
            config.resource_map_uri(id),
            "http://repo.example.org/1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4.rdf"
        );
        assert_eq!(
            config.aggregation_uri(id),
            "http://repo.example.org/1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4#aggregation"
        );
        assert_eq!(
            config.media_uri("Publication", id),
            "http://repo.example.org/Publication/1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4/media"
        );
    }

    #[test]
    fn test_agent_uri_escapes_spaces() {
        let config = RepositoryConfig::new("http://repo.example.org");
        assert_eq!(
            config.agent_uri("Ada Lovelace"),
            "http://repo.example.org/agents/Ada%20Lovelace"
        );
    }
}
