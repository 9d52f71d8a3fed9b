//! Vocabulary term registry
//!
//! Maps internal type/property/relation names to external RDF vocabulary
//! terms. Populated once at startup with four fixed groups (Dublin Core,
//! FOAF, the Grantha repository vocabulary, DCMI/eprint type terms) and
//! read-only afterward, so shared concurrent reads need no locking. The
//! registry is passed explicitly to the serializer rather than living in
//! process-global state.

use std::collections::HashMap;
use tracing::debug;

/// Namespace IRIs fixed by the RDF/XML output format
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const ORE: &str = "http://www.openarchives.org/ore/terms/";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    pub const DCMITYPE: &str = "http://purl.org/dc/dcmitype/";
    pub const EPRINT: &str = "http://purl.org/eprint/type/";
    pub const GRANTHA: &str = "http://grantha.org/terms/";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Expand a `prefix:local` qualified name to a full IRI. Unknown
    /// prefixes yield the input unchanged.
    pub fn expand(qname: &str) -> String {
        let Some((prefix, local)) = qname.split_once(':') else {
            return qname.to_string();
        };
        let iri = match prefix {
            "rdf" => RDF,
            "ore" => ORE,
            "dcterms" => DCTERMS,
            "foaf" => FOAF,
            "dcmitype" => DCMITYPE,
            "eprint" => EPRINT,
            "grantha" => GRANTHA,
            "xsd" => XSD,
            _ => return qname.to_string(),
        };
        format!("{iri}{local}")
    }
}

/// Read-only mapping from internal names to external vocabulary terms
#[derive(Debug, Clone, Default)]
pub struct TermRegistry {
    terms: HashMap<String, String>,
}

impl TermRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a term mapping. The first registration of a name wins;
    /// returns `false` without overwriting when the name is already taken.
    pub fn register(&mut self, term: impl Into<String>, standard_term: impl Into<String>) -> bool {
        let term = term.into();
        if self.terms.contains_key(&term) {
            return false;
        }
        self.terms.insert(term, standard_term.into());
        true
    }

    /// Look up the external term for an internal name. Unknown names return
    /// an empty string; callers drop the element rather than failing, since
    /// RDF output tolerates omitted optional statements.
    pub fn lookup(&self, term: &str) -> &str {
        match self.terms.get(term) {
            Some(standard) => standard,
            None => {
                debug!(term, "no vocabulary term registered; element dropped");
                ""
            }
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Registry populated with the four standard vocabulary groups
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_dublin_core();
        registry.register_foaf();
        registry.register_grantha();
        registry.register_type_terms();
        registry
    }

    fn register_dublin_core(&mut self) {
        self.register("Title", "dcterms:title");
        self.register("Description", "dcterms:description");
        self.register("Copyright", "dcterms:rights");
        self.register("Language", "dcterms:language");
        self.register("DatePublished", "dcterms:issued");
        self.register("DateAvailableFrom", "dcterms:available");
        self.register("HasVersion", "dcterms:hasVersion");
    }

    fn register_foaf(&mut self) {
        self.register("Contact", "foaf:Agent");
        self.register("FirstName", "foaf:givenName");
        self.register("LastName", "foaf:familyName");
        self.register("Email", "foaf:mbox");
        self.register("Name", "foaf:name");
    }

    fn register_grantha(&mut self) {
        self.register("ScholarlyWork", "grantha:ScholarlyWork");
        self.register("File", "grantha:File");
        self.register("Tag", "grantha:Tag");
        self.register("Category", "grantha:Category");
        self.register("IsCitedBy", "grantha:cite");
        self.register("HasRepresentation", "grantha:hasRepresentation");
        self.register("ItemIsAddedBy", "grantha:itemIsAddedBy");
        self.register("DOI", "grantha:doi");
        self.register("PageCount", "grantha:pageCount");
        self.register("Year", "grantha:year");
        self.register("Downloads", "grantha:downloads");
        self.register("PeerReviewed", "grantha:peerReviewed");
        self.register("ImpactFactor", "grantha:impactFactor");
        self.register("Institution", "grantha:institution");
        self.register("Venue", "grantha:venue");
        self.register("DateRecorded", "grantha:dateRecorded");
        self.register("DateAvailableUntil", "grantha:dateAvailableUntil");
        self.register("MimeType", "grantha:mimeType");
        self.register("FileExtension", "grantha:fileExtension");
        self.register("Size", "grantha:size");
        self.register("Checksum", "grantha:checksum");
    }

    fn register_type_terms(&mut self) {
        self.register("Publication", "dcmitype:Text");
        self.register("Thesis", "eprint:Thesis");
        self.register("Lecture", "dcmitype:Sound");
    }
}
