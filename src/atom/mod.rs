//! Atom Publishing Protocol store
//!
//! Projects the resource graph onto Atom feeds and entries and maps incoming
//! entries and binary payloads back onto it. Entries are transient
//! projections, never persisted; each adapter instance is a per-request
//! scope onto the external collaborators.

mod collection;
mod entry;
mod mapping;
mod read;
mod write;
mod xml;

pub use collection::CollectionResolver;
pub use entry::{rel, AtomEntry, AtomFeed, AtomLink, AtomPersonRef, EntryContent, TextKind};
pub use mapping::EntryMapper;
pub use read::AtomReader;
pub use write::AtomWriter;
pub use xml::{entry_to_xml, feed_to_xml};
