//! OAI-ORE RDF/XML serialization
//!
//! Consumes a frozen resource-map memento and the term registry and emits a
//! resource-map document in a fixed statement order. The writer is
//! hand-rolled: the output shapes include attribute-carrying typed elements
//! and an embedded creator description, which are not plain triple
//! serialization.
//!
//! Creator serialization differs by context: a bare resource reference when
//! describing the map, an embedded `foaf:name` resource when describing the
//! aggregation.

use super::resource_map::ResourceMapMemento;
use super::terms::{ns, TermRegistry};
use crate::config::RepositoryConfig;
use crate::error::RepositoryResult;
use crate::resource::{relations, ResourceId};
use crate::xml::XmlWriter;

/// Scalar properties never emitted as metadata elements
const EXCLUDED_PROPERTIES: [&str; 3] = ["Id", "Title", "Image"];

const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

/// Serializes resource-map mementos to OAI-ORE RDF/XML
pub struct RdfXmlSerializer<'a> {
    terms: &'a TermRegistry,
}

impl<'a> RdfXmlSerializer<'a> {
    pub fn new(terms: &'a TermRegistry) -> Self {
        Self { terms }
    }

    /// Emit the RDF/XML resource map for `memento`. All URI shapes come
    /// from the configuration, so the two protocol surfaces cannot drift.
    pub fn serialize(
        &self,
        memento: &ResourceMapMemento,
        config: &RepositoryConfig,
    ) -> RepositoryResult<String> {
        let aggregation_uri = config.aggregation_uri(memento.root_uri);
        let creator_ref = config.agent_uri(&memento.map_creator);

        let mut writer = XmlWriter::new();
        writer.open(
            "rdf:RDF",
            &[
                ("xmlns:rdf", ns::RDF),
                ("xmlns:ore", ns::ORE),
                ("xmlns:grantha", ns::GRANTHA),
                ("xmlns:foaf", ns::FOAF),
                ("xmlns:dcterms", ns::DCTERMS),
                ("xmlns:dcmitype", ns::DCMITYPE),
                ("xmlns:eprint", ns::EPRINT),
            ],
        );

        // The resource map describes the aggregation.
        writer.open("rdf:Description", &[("rdf:about", &memento.map_uri)]);
        writer.empty("ore:describes", &[("rdf:resource", aggregation_uri.as_str())]);
        writer.empty("dcterms:creator", &[("rdf:resource", creator_ref.as_str())]);
        writer.text_element(
            "dcterms:modified",
            &[("rdf:datatype", XSD_DATE)],
            &memento.map_modified.format("%Y-%m-%d").to_string(),
        );
        writer.close("rdf:Description");

        // The aggregation itself.
        writer.open("rdf:Description", &[("rdf:about", aggregation_uri.as_str())]);
        writer.empty(
            "ore:isDescribedBy",
            &[("rdf:resource", memento.map_uri.as_str())],
        );
        writer.open("dcterms:creator", &[]);
        writer.open("rdf:Description", &[]);
        writer.text_element("foaf:name", &[], &memento.map_creator);
        writer.close("rdf:Description");
        writer.close("dcterms:creator");

        for node in &memento.aggregated {
            let uri = config.resource_uri(node.uri);
            writer.empty("ore:aggregates", &[("rdf:resource", uri.as_str())]);
        }
        for relation in &memento.relations {
            if relations::special_suffix(&relation.relation).is_some() {
                continue;
            }
            let uri = config.resource_uri(relation.target);
            writer.empty("ore:aggregates", &[("rdf:resource", uri.as_str())]);
        }

        self.write_type(&mut writer, &memento.root_type);

        // Metadata blocks: tags and categories as typed elements with a
        // title attribute.
        let tag_term = self.terms.lookup("Tag").to_string();
        for tag in &memento.tags {
            if !tag_term.is_empty() {
                writer.empty(&tag_term, &[("dcterms:title", tag.as_str())]);
            }
        }
        let category_term = self.terms.lookup("Category").to_string();
        for category in &memento.categories {
            if !category_term.is_empty() {
                writer.empty(&category_term, &[("dcterms:title", category.as_str())]);
            }
        }

        // Special relations become direct predicates.
        for relation in &memento.relations {
            let Some(suffix) = relations::special_suffix(&relation.relation) else {
                continue;
            };
            let term = self.terms.lookup(suffix);
            if term.is_empty() {
                continue;
            }
            let uri = config.resource_uri(relation.target);
            writer.empty(&term.to_string(), &[("rdf:resource", uri.as_str())]);
        }

        // Scalar properties as datatype-typed elements, Title last and
        // untyped.
        let mut title = None;
        for scalar in &memento.scalar_properties {
            if scalar.name == "Title" {
                title = Some(scalar.value.as_str());
            }
            if EXCLUDED_PROPERTIES.contains(&scalar.name.as_str()) {
                continue;
            }
            let term = self.terms.lookup(&scalar.name);
            if term.is_empty() {
                continue;
            }
            writer.text_element(
                &term.to_string(),
                &[("rdf:datatype", scalar.declared_type.xsd_datatype())],
                &scalar.value,
            );
        }
        if let Some(title) = title {
            writer.text_element("dcterms:title", &[], title);
        }
        writer.close("rdf:Description");

        // One standalone description per aggregated resource and special
        // relation target.
        let mut described: Vec<ResourceId> = Vec::new();
        for node in &memento.aggregated {
            if !described.contains(&node.uri) {
                described.push(node.uri);
                self.write_aggregated_description(
                    &mut writer,
                    config,
                    node.uri,
                    &node.resource_type,
                    &aggregation_uri,
                );
            }
        }
        for relation in &memento.relations {
            if relations::special_suffix(&relation.relation).is_none() {
                continue;
            }
            if !described.contains(&relation.target) {
                described.push(relation.target);
                self.write_aggregated_description(
                    &mut writer,
                    config,
                    relation.target,
                    &relation.target_type,
                    &aggregation_uri,
                );
            }
        }

        writer.close("rdf:RDF");
        Ok(writer.finish())
    }

    fn write_type(&self, writer: &mut XmlWriter, type_name: &str) {
        let term = self.terms.lookup(type_name);
        if term.is_empty() {
            return;
        }
        let iri = ns::expand(term);
        writer.empty("rdf:type", &[("rdf:resource", iri.as_str())]);
    }

    fn write_aggregated_description(
        &self,
        writer: &mut XmlWriter,
        config: &RepositoryConfig,
        id: ResourceId,
        type_name: &str,
        aggregation_uri: &str,
    ) {
        let uri = config.resource_uri(id);
        writer.open("rdf:Description", &[("rdf:about", uri.as_str())]);
        self.write_type(writer, type_name);
        writer.empty("ore:isAggregatedBy", &[("rdf:resource", aggregation_uri)]);
        writer.close("rdf:Description");
    }
}
