//! Atom 1.0 document rendering
//!
//! Read-side wire format: one feed document per member listing, one entry
//! document per member. Incoming entries arrive as [`AtomEntry`] values from
//! the protocol front end, which owns request parsing.

use super::entry::{AtomEntry, AtomFeed, AtomLink, AtomPersonRef, EntryContent, TextKind};
use crate::xml::XmlWriter;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Render a feed document
pub fn feed_to_xml(feed: &AtomFeed) -> String {
    let mut writer = XmlWriter::new();
    writer.open("feed", &[("xmlns", ATOM_NS)]);
    writer.text_element("id", &[], &feed.id);
    writer.text_element("title", &[("type", "text")], &feed.title);
    writer.text_element("updated", &[], &feed.updated.to_rfc3339());
    for entry in &feed.entries {
        write_entry(&mut writer, entry, false);
    }
    writer.close("feed");
    writer.finish()
}

/// Render a standalone entry document
pub fn entry_to_xml(entry: &AtomEntry) -> String {
    let mut writer = XmlWriter::new();
    write_entry(&mut writer, entry, true);
    writer.finish()
}

fn write_entry(writer: &mut XmlWriter, entry: &AtomEntry, standalone: bool) {
    if standalone {
        writer.open("entry", &[("xmlns", ATOM_NS)]);
    } else {
        writer.open("entry", &[]);
    }

    if let Some(id) = entry.id {
        writer.text_element("id", &[], &id.as_urn());
    }
    if let Some(title) = &entry.title {
        writer.text_element("title", &[("type", entry.title_type.as_str())], title);
    }
    if let Some(updated) = entry.updated {
        writer.text_element("updated", &[], &updated.to_rfc3339());
    }
    if let Some(published) = entry.published {
        writer.text_element("published", &[], &published.to_rfc3339());
    }
    if let Some(rights) = &entry.rights {
        writer.text_element("rights", &[], rights);
    }
    if let Some(summary) = &entry.summary {
        writer.text_element("summary", &[], summary);
    }
    for author in &entry.authors {
        write_person(writer, "author", author);
    }
    for contributor in &entry.contributors {
        write_person(writer, "contributor", contributor);
    }
    match &entry.content {
        Some(EntryContent::Media { mime_type, src }) => {
            writer.empty("content", &[("type", mime_type), ("src", src)]);
        }
        Some(EntryContent::Url(src)) => {
            writer.empty("content", &[("src", src)]);
        }
        Some(EntryContent::Text(body)) => {
            writer.text_element("content", &[("type", TextKind::Text.as_str())], body);
        }
        None => {}
    }
    for link in &entry.links {
        write_link(writer, link);
    }
    if let Some(source) = &entry.source {
        writer.open("source", &[]);
        writer.text_element("id", &[], source);
        writer.close("source");
    }

    writer.close("entry");
}

fn write_person(writer: &mut XmlWriter, element: &str, person: &AtomPersonRef) {
    writer.open(element, &[]);
    writer.text_element("name", &[], &person.name);
    if let Some(email) = &person.email {
        writer.text_element("email", &[], email);
    }
    if let Some(uri) = &person.uri {
        writer.text_element("uri", &[], uri);
    }
    writer.close(element);
}

fn write_link(writer: &mut XmlWriter, link: &AtomLink) {
    let mut attrs: Vec<(&str, &str)> = vec![("rel", &link.rel), ("href", &link.href)];
    if let Some(mime_type) = &link.mime_type {
        attrs.push(("type", mime_type));
    }
    if let Some(title) = &link.title {
        attrs.push(("title", title));
    }
    writer.empty("link", &attrs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::rel;
    use crate::resource::ResourceId;
    use chrono::Utc;

    #[test]
    fn test_entry_document() {
        let mut entry = AtomEntry::titled("Collected <Papers>");
        entry.id = Some(ResourceId::parse("1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4").unwrap());
        entry.updated = Some(Utc::now());
        entry.authors.push(
            AtomPersonRef::named("Ada Lovelace").with_email("ada@example.org"),
        );
        entry.content = Some(EntryContent::Media {
            mime_type: "application/pdf".to_string(),
            src: "http://repo/Publication/1/media".to_string(),
        });
        entry
            .links
            .push(AtomLink::new(rel::EDIT, "http://repo/Publication/1"));

        let doc = entry_to_xml(&entry);
        assert!(doc.contains("<entry xmlns=\"http://www.w3.org/2005/Atom\">"));
        assert!(doc.contains("<id>urn:1d8a79b6-54b4-4ee4-a2f5-a9f837b6d2c4</id>"));
        assert!(doc.contains("<title type=\"text\">Collected &lt;Papers&gt;</title>"));
        assert!(doc.contains("<content type=\"application/pdf\" src=\"http://repo/Publication/1/media\"/>"));
        assert!(doc.contains("<name>Ada Lovelace</name>"));
        assert!(doc.contains("<link rel=\"edit\" href=\"http://repo/Publication/1\"/>"));
    }

    #[test]
    fn test_feed_document() {
        let feed = AtomFeed {
            id: "http://repo/Publication".to_string(),
            title: "Publication".to_string(),
            updated: Utc::now(),
            entries: vec![AtomEntry::titled("One"), AtomEntry::titled("Two")],
        };
        let doc = feed_to_xml(&feed);
        assert!(doc.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
        assert_eq!(doc.matches("<entry>").count(), 2);
    }
}
