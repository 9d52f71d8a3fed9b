//! Entry ↔ resource field mapping
//!
//! Bidirectional, field by field. Content has three exclusive
//! representations in precedence order: attached binary media, an explicit
//! content-URL extension property, the resource's own description text.
//! Author and contributor lists are fully replaced on update, cleared and
//! repopulated, so repeated updates never accumulate duplicates; incoming
//! persons are matched against existing contacts (URI, then email, then
//! parsed name) before a new contact is created.

use super::entry::{rel, AtomEntry, AtomLink, AtomPersonRef, EntryContent, TextKind};
use crate::config::RepositoryConfig;
use crate::error::RepositoryResult;
use crate::resource::{
    extensions, properties, relations, Resource, ResourceId, TypeRegistry, CONTACT, PUBLICATION,
};
use crate::store::{Principal, ResourceGraph};
use tracing::warn;

/// Maps resources to Atom entries and applies entries back
pub struct EntryMapper<'a> {
    types: &'a TypeRegistry,
    config: &'a RepositoryConfig,
}

impl<'a> EntryMapper<'a> {
    pub fn new(types: &'a TypeRegistry, config: &'a RepositoryConfig) -> Self {
        Self { types, config }
    }

    /// Project a resource into an Atom entry, synthesizing navigational
    /// links from the graph
    pub fn to_entry(&self, resource: &Resource, graph: &dyn ResourceGraph) -> AtomEntry {
        let mut entry = AtomEntry {
            id: Some(resource.id),
            title: resource.title().map(str::to_string),
            title_type: resource
                .extension(extensions::TITLE_CONTENT_TYPE)
                .map(TextKind::parse)
                .unwrap_or_default(),
            summary: resource.extension(extensions::SUMMARY).map(str::to_string),
            rights: resource
                .property(properties::COPYRIGHT)
                .and_then(|v| v.as_str())
                .map(str::to_string),
            updated: Some(resource.date_modified),
            source: resource.extension(extensions::SOURCE).map(str::to_string),
            ..AtomEntry::default()
        };

        if self.types.is_assignable_to(&resource.type_name, PUBLICATION) {
            entry.published = resource
                .property(properties::DATE_PUBLISHED)
                .and_then(|v| v.as_datetime());
        }

        let media = self.first_file(resource.id, graph);
        entry.content = self.project_content(resource, media.as_ref());

        for payload in resource.extensions_named(extensions::LINK) {
            match serde_json::from_str::<AtomLink>(payload) {
                Ok(link) => entry.links.push(link),
                Err(e) => warn!(%e, "dropping malformed link extension"),
            }
        }
        self.synthesize_links(resource, media.as_ref(), graph, &mut entry);

        entry.authors = self.person_refs(resource.id, relations::AUTHORED_BY, graph);
        entry.contributors = self.person_refs(resource.id, relations::CONTRIBUTED_BY, graph);

        entry
    }

    /// Apply entry fields onto a resource and its relationship collections.
    /// The caller persists the resource and commits.
    pub fn apply_entry(
        &self,
        entry: &AtomEntry,
        resource: &mut Resource,
        graph: &mut dyn ResourceGraph,
        principal: &Principal,
    ) -> RepositoryResult<()> {
        match &entry.title {
            Some(title) => resource.set_property(properties::TITLE, title.as_str()),
            None => resource.clear_property(properties::TITLE),
        }
        if entry.title_type == TextKind::Text {
            resource.clear_extensions(extensions::TITLE_CONTENT_TYPE);
        } else {
            resource.set_extension(extensions::TITLE_CONTENT_TYPE, entry.title_type.as_str());
        }

        match &entry.rights {
            Some(rights) => resource.set_property(properties::COPYRIGHT, rights.as_str()),
            None => resource.clear_property(properties::COPYRIGHT),
        }

        if self.types.is_assignable_to(&resource.type_name, PUBLICATION) {
            if let Some(published) = entry.published {
                resource.set_property(properties::DATE_PUBLISHED, published);
            }
        }

        match &entry.summary {
            Some(summary) => resource.set_extension(extensions::SUMMARY, summary.as_str()),
            None => resource.clear_extensions(extensions::SUMMARY),
        }

        // Media is managed by the media operations; only the two lower
        // precedence representations round-trip through the entry.
        match &entry.content {
            Some(EntryContent::Text(body)) => {
                resource.set_property(properties::DESCRIPTION, body.as_str());
            }
            Some(EntryContent::Url(src)) => {
                resource.set_extension(extensions::CONTENT_URL, src.as_str());
            }
            Some(EntryContent::Media { .. }) | None => {}
        }

        resource.clear_extensions(extensions::LINK);
        for link in &entry.links {
            if rel::is_navigational(&link.rel) {
                continue;
            }
            let payload = serde_json::to_string(link)
                .map_err(|e| crate::error::RepositoryError::Serialize(e.to_string()))?;
            resource.add_extension(extensions::LINK, payload);
        }

        match &entry.source {
            Some(source) => resource.set_extension(extensions::SOURCE, source.as_str()),
            None => resource.clear_extensions(extensions::SOURCE),
        }

        self.replace_persons(
            resource.id,
            relations::AUTHORED_BY,
            &entry.authors,
            graph,
            principal,
        );
        self.replace_persons(
            resource.id,
            relations::CONTRIBUTED_BY,
            &entry.contributors,
            graph,
            principal,
        );

        Ok(())
    }

    /// First attached binary resource, if any
    pub fn first_file(&self, id: ResourceId, graph: &dyn ResourceGraph) -> Option<Resource> {
        graph
            .related(id, relations::HAS_FILE)
            .into_iter()
            .find_map(|fid| graph.get_by_id(fid))
    }

    fn project_content(&self, resource: &Resource, media: Option<&Resource>) -> Option<EntryContent> {
        if let Some(file) = media {
            let mime_type = file
                .property(properties::MIME_TYPE)
                .and_then(|v| v.as_str())
                .unwrap_or("application/octet-stream")
                .to_string();
            return Some(EntryContent::Media {
                mime_type,
                src: self.config.media_uri(&resource.type_name, resource.id),
            });
        }
        if let Some(url) = resource.extension(extensions::CONTENT_URL) {
            return Some(EntryContent::Url(url.to_string()));
        }
        resource
            .description()
            .map(|d| EntryContent::Text(d.to_string()))
    }

    fn synthesize_links(
        &self,
        resource: &Resource,
        media: Option<&Resource>,
        graph: &dyn ResourceGraph,
        entry: &mut AtomEntry,
    ) {
        let collection = &resource.type_name;
        if let Some(file) = media {
            let mut link = AtomLink::new(
                rel::EDIT_MEDIA,
                self.config.media_uri(collection, resource.id),
            );
            if let Some(mime_type) = file.property(properties::MIME_TYPE).and_then(|v| v.as_str()) {
                link = link.with_mime_type(mime_type);
            }
            entry.links.push(link);
        }
        entry.links.push(AtomLink::new(
            rel::EDIT,
            self.config.member_uri(collection, resource.id),
        ));

        // One related-link per sibling sharing a container.
        for inbound in graph.relationships_to(resource.id) {
            if !relations::is_containment(&inbound.predicate) {
                continue;
            }
            for sibling in graph.related(inbound.subject, relations::CONTAINS) {
                if sibling == resource.id {
                    continue;
                }
                let Some(sibling_resource) = graph.get_by_id(sibling) else {
                    continue;
                };
                entry.links.push(AtomLink::new(
                    rel::RELATED,
                    self.config.member_uri(&sibling_resource.type_name, sibling),
                ));
            }
        }
    }

    fn person_refs(
        &self,
        id: ResourceId,
        relation: &str,
        graph: &dyn ResourceGraph,
    ) -> Vec<AtomPersonRef> {
        graph
            .related(id, relation)
            .into_iter()
            .filter_map(|cid| graph.get_by_id(cid))
            .map(|contact| AtomPersonRef {
                name: display_name(&contact),
                email: contact
                    .property(properties::EMAIL)
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                uri: contact
                    .property(properties::URI)
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            })
            .collect()
    }

    fn replace_persons(
        &self,
        id: ResourceId,
        relation: &str,
        persons: &[AtomPersonRef],
        graph: &mut dyn ResourceGraph,
        principal: &Principal,
    ) {
        for existing in graph.relationships_from(id) {
            if existing.predicate == relation {
                graph.delete_relationship(existing.id);
            }
        }
        for person in persons {
            let contact = resolve_contact(person, graph, principal);
            graph.add_relationship(id, relation, contact);
        }
    }
}

/// Match an incoming person against existing contacts by URI, then email,
/// then parsed first/middle/last name; create a new contact only when no
/// unambiguous match exists. Name matching is a best-effort heuristic: a tie
/// is treated as no match rather than guessing.
pub fn resolve_contact(
    person: &AtomPersonRef,
    graph: &mut dyn ResourceGraph,
    principal: &Principal,
) -> ResourceId {
    let contacts = graph.query(&[CONTACT]);

    if let Some(uri) = person.uri.as_deref() {
        if let Some(found) = contacts
            .iter()
            .find(|c| c.property(properties::URI).and_then(|v| v.as_str()) == Some(uri))
        {
            return found.id;
        }
    }

    if let Some(email) = person.email.as_deref() {
        if let Some(found) = contacts
            .iter()
            .find(|c| c.property(properties::EMAIL).and_then(|v| v.as_str()) == Some(email))
        {
            return found.id;
        }
    }

    let (first, middle, last) = parse_name(&person.name);
    let by_name: Vec<&Resource> = contacts
        .iter()
        .filter(|c| {
            name_part(c, properties::FIRST_NAME) == first
                && name_part(c, properties::MIDDLE_NAME) == middle
                && name_part(c, properties::LAST_NAME) == last
        })
        .collect();
    match by_name.len() {
        1 => return by_name[0].id,
        0 => {}
        n => warn!(name = %person.name, candidates = n, "ambiguous contact name match; creating new contact"),
    }

    let mut contact = Resource::new(CONTACT, principal.name.clone());
    if let Some(first) = first {
        contact.set_property(properties::FIRST_NAME, first);
    }
    if let Some(middle) = middle {
        contact.set_property(properties::MIDDLE_NAME, middle);
    }
    if let Some(last) = last {
        contact.set_property(properties::LAST_NAME, last);
    }
    if let Some(email) = &person.email {
        contact.set_property(properties::EMAIL, email.as_str());
    }
    if let Some(uri) = &person.uri {
        contact.set_property(properties::URI, uri.as_str());
    }
    let id = contact.id;
    graph.add_resource(contact);
    id
}

fn name_part(contact: &Resource, property: &str) -> Option<String> {
    contact
        .property(property)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Split a display name into first/middle/last parts. Best effort: one
/// token is a first name, two are first and last, more put everything
/// between the ends into the middle slot.
pub fn parse_name(display: &str) -> (Option<String>, Option<String>, Option<String>) {
    let parts: Vec<&str> = display.split_whitespace().collect();
    match parts.len() {
        0 => (None, None, None),
        1 => (Some(parts[0].to_string()), None, None),
        2 => (Some(parts[0].to_string()), None, Some(parts[1].to_string())),
        n => (
            Some(parts[0].to_string()),
            Some(parts[1..n - 1].join(" ")),
            Some(parts[n - 1].to_string()),
        ),
    }
}

fn display_name(contact: &Resource) -> String {
    let parts: Vec<String> = [
        properties::FIRST_NAME,
        properties::MIDDLE_NAME,
        properties::LAST_NAME,
    ]
    .into_iter()
    .filter_map(|p| name_part(contact, p))
    .collect();
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryGraph, ResourceGraph as _};

    fn mapper_fixtures() -> (TypeRegistry, RepositoryConfig) {
        (
            TypeRegistry::scholarly(),
            RepositoryConfig::new("http://repo.example.org"),
        )
    }

    #[test]
    fn test_parse_name_shapes() {
        assert_eq!(parse_name("Ada"), (Some("Ada".into()), None, None));
        assert_eq!(
            parse_name("Ada Lovelace"),
            (Some("Ada".into()), None, Some("Lovelace".into()))
        );
        assert_eq!(
            parse_name("Ada Augusta King Lovelace"),
            (
                Some("Ada".into()),
                Some("Augusta King".into()),
                Some("Lovelace".into())
            )
        );
        assert_eq!(parse_name("  "), (None, None, None));
    }

    #[test]
    fn test_content_precedence_media_over_url_over_text() {
        let (types, config) = mapper_fixtures();
        let mapper = EntryMapper::new(&types, &config);
        let mut graph = MemoryGraph::new();

        let mut work = Resource::new("Publication", "admin");
        work.set_property(properties::DESCRIPTION, "inline text");
        work.set_extension(extensions::CONTENT_URL, "http://elsewhere/w");
        let work_id = work.id;
        graph.add_resource(work.clone());

        // No media: the URL wins over the description.
        let entry = mapper.to_entry(&work, &graph);
        assert_eq!(
            entry.content,
            Some(EntryContent::Url("http://elsewhere/w".to_string()))
        );

        // Attach media: it takes precedence over the URL.
        let mut file = Resource::new("File", "admin");
        file.set_property(properties::MIME_TYPE, "application/pdf");
        let file_id = file.id;
        graph.add_resource(file);
        graph.add_relationship(work_id, relations::HAS_FILE, file_id);

        let entry = mapper.to_entry(&work, &graph);
        assert_eq!(
            entry.content,
            Some(EntryContent::Media {
                mime_type: "application/pdf".to_string(),
                src: config.media_uri("Publication", work_id),
            })
        );
        assert!(entry.link(rel::EDIT_MEDIA).is_some());
    }

    #[test]
    fn test_description_fallback() {
        let (types, config) = mapper_fixtures();
        let mapper = EntryMapper::new(&types, &config);
        let graph = MemoryGraph::new();

        let mut work = Resource::new("Publication", "admin");
        work.set_property(properties::DESCRIPTION, "inline text");
        let entry = mapper.to_entry(&work, &graph);
        assert_eq!(
            entry.content,
            Some(EntryContent::Text("inline text".to_string()))
        );
    }

    #[test]
    fn test_author_matched_by_uri_not_duplicated() {
        let (types, config) = mapper_fixtures();
        let mapper = EntryMapper::new(&types, &config);
        let mut graph = MemoryGraph::new();
        let principal = Principal::new("admin");

        let mut existing = Resource::new(CONTACT, "admin");
        existing.set_property(properties::FIRST_NAME, "Ada");
        existing.set_property(properties::LAST_NAME, "Lovelace");
        existing.set_property(properties::URI, "http://people/ada");
        let existing_id = existing.id;
        graph.add_resource(existing);

        let mut work = Resource::new("Publication", "admin");
        let work_id = work.id;
        graph.add_resource(work.clone());

        let mut entry = AtomEntry::titled("W");
        entry.authors.push(
            AtomPersonRef::named("A. Lovelace").with_uri("http://people/ada"),
        );
        mapper
            .apply_entry(&entry, &mut work, &mut graph, &principal)
            .unwrap();

        assert_eq!(graph.related(work_id, relations::AUTHORED_BY), vec![existing_id]);
        assert_eq!(graph.query(&[CONTACT]).len(), 1);
    }

    #[test]
    fn test_full_replace_avoids_accumulation() {
        let (types, config) = mapper_fixtures();
        let mapper = EntryMapper::new(&types, &config);
        let mut graph = MemoryGraph::new();
        let principal = Principal::new("admin");

        let mut work = Resource::new("Publication", "admin");
        let work_id = work.id;
        graph.add_resource(work.clone());

        let mut entry = AtomEntry::titled("W");
        entry
            .authors
            .push(AtomPersonRef::named("Ada Lovelace").with_email("ada@example.org"));

        mapper
            .apply_entry(&entry, &mut work, &mut graph, &principal)
            .unwrap();
        mapper
            .apply_entry(&entry, &mut work, &mut graph, &principal)
            .unwrap();

        assert_eq!(graph.related(work_id, relations::AUTHORED_BY).len(), 1);
        assert_eq!(graph.query(&[CONTACT]).len(), 1);
    }

    #[test]
    fn test_ambiguous_name_creates_new_contact() {
        let (_types, _config) = mapper_fixtures();
        let mut graph = MemoryGraph::new();
        let principal = Principal::new("admin");

        for _ in 0..2 {
            let mut c = Resource::new(CONTACT, "admin");
            c.set_property(properties::FIRST_NAME, "Jan");
            c.set_property(properties::LAST_NAME, "Novak");
            graph.add_resource(c);
        }

        let person = AtomPersonRef::named("Jan Novak");
        let id = resolve_contact(&person, &mut graph, &principal);
        // A tie is not a match: a third contact now exists.
        assert_eq!(graph.query(&[CONTACT]).len(), 3);
        assert!(graph.get_by_id(id).is_some());
    }

    #[test]
    fn test_free_form_links_roundtrip() {
        let (types, config) = mapper_fixtures();
        let mapper = EntryMapper::new(&types, &config);
        let mut graph = MemoryGraph::new();
        let principal = Principal::new("admin");

        let mut work = Resource::new("Publication", "admin");
        graph.add_resource(work.clone());

        let mut entry = AtomEntry::titled("W");
        entry
            .links
            .push(AtomLink::new(rel::ALTERNATE, "http://mirror/w"));
        entry
            .links
            .push(AtomLink::new(rel::EDIT, "http://repo/Publication/ignored"));

        mapper
            .apply_entry(&entry, &mut work, &mut graph, &principal)
            .unwrap();
        // The navigational link is not stored.
        assert_eq!(work.extensions_named(extensions::LINK).count(), 1);

        graph.update_resource(work.clone());
        let projected = mapper.to_entry(&work, &graph);
        let alternate = projected.link(rel::ALTERNATE).unwrap();
        assert_eq!(alternate.href, "http://mirror/w");
    }
}
