//! Conversion of IATI activity documents into RDF graphs.
//!
//! Each `iati-activity` element is mapped independently into the caller's
//! output graph. Problems that do not prevent conversion (an activity with no
//! identifier, an unknown element nested too deeply, an element that cannot
//! be expressed as IRIs) are recorded in a separate processor graph instead of
//! failing the whole document.

use oxrdf::{Graph, NamedNodeRef, TripleRef};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

pub mod accessor;
pub mod config;
pub mod context;
mod emit;
pub mod elements;
pub mod engine;
mod fallback;
pub mod identity;

pub use config::Config;
pub use context::{ActivityContext, Defaults};
pub use elements::ElementKind;
pub use engine::{DocumentDefaults, Engine};
pub use identity::{Code, NodeId};

/// Converts an IATI XML document into `output_graph`.
///
/// The only failure surfaced to the caller is a document that is not
/// well-formed XML. Everything else ends up as best-effort statements plus
/// entries in `processor_graph`.
pub fn convert_str(
    input: &str,
    config: &Config,
    output_graph: &mut Graph,
    processor_graph: &mut Graph,
) -> Result<(), Error> {
    let doc = Document::parse(input)?;
    convert_document(&doc, config, output_graph, processor_graph);
    Ok(())
}

/// Converts an already-parsed document into `output_graph`.
pub fn convert_document(
    doc: &Document,
    config: &Config,
    output_graph: &mut Graph,
    processor_graph: &mut Graph,
) {
    let root = doc.root_element();
    let document = DocumentDefaults::from_root(root);
    let engine = Engine::new(config);
    let mut diagnostics = Diagnostics::new(processor_graph);

    let mut mapped = 0;
    for activity in activities(root) {
        if engine
            .map_activity(activity, &document, output_graph, &mut diagnostics)
            .is_some()
        {
            mapped += 1;
        }
    }

    debug!(mapped, triples = output_graph.len(), "converted document");
}

/// Converts a document into a fresh graph, discarding processor output.
pub fn convert(input: &str, config: &Config) -> Result<Graph, Error> {
    let mut output_graph = Graph::new();
    let mut processor_graph = Graph::new();
    convert_str(input, config, &mut output_graph, &mut processor_graph)?;
    Ok(output_graph)
}

/// The activity elements of a document: either the children of an
/// `iati-activities` root, or the root itself when it is a lone activity.
fn activities<'a, 'input>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    if root.tag_name().name() == engine::ACTIVITY_TAG {
        return vec![root];
    }

    root.children()
        .filter(|n| n.is_element() && n.tag_name().name() == engine::ACTIVITY_TAG)
        .collect()
}

/// Prefixes worth declaring when serializing a converted graph.
pub fn prefixes(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("iati", config.namespace().to_string()),
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_string()),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#".to_string()),
        ("owl", "http://www.w3.org/2002/07/owl#".to_string()),
    ]
}

#[derive(derive_more::Error, derive_more::Display, derive_more::From, Debug)]
pub enum Error {
    #[display("XML parse error: {_0}")]
    XmlParseError(roxmltree::Error),

    #[display("IRI parse error: `{iri}`")]
    IriParseError {
        source: oxiri::IriParseError,
        iri: String,
    },
}

/// Failure while mapping a single element. Never crosses the public entry
/// points: the element is handed to the fallback walker or reported instead.
#[derive(derive_more::Error, derive_more::Display, derive_more::From, Debug)]
pub enum MapError {
    #[display("invalid IRI: {_0}")]
    InvalidIri(oxrdf::IriParseError),

    #[display("invalid language tag: {_0}")]
    InvalidLanguageTag(oxrdf::LanguageTagParseError),
}

pub(crate) mod owl_vocab {
    pub static SAME_AS: oxrdf::NamedNodeRef =
        oxrdf::NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
}

mod dc_vocab {
    pub static DESCRIPTION: oxrdf::NamedNodeRef =
        oxrdf::NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
}

mod rdfa_vocab {
    pub static ERROR: oxrdf::NamedNodeRef =
        oxrdf::NamedNodeRef::new_unchecked("http://www.w3.org/ns/rdfa#Error");

    pub static WARNING: oxrdf::NamedNodeRef =
        oxrdf::NamedNodeRef::new_unchecked("http://www.w3.org/ns/rdfa#Warning");
}

/// Kinds of entries written to the processor graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PGType {
    /// An activity without an `iati-identifier`; it was skipped.
    MissingIdentifier,
    /// An unrecognized element nested deeper than the fallback walker follows.
    UnsupportedDepth,
    /// An element (or activity) whose content could not be turned into IRIs.
    UnmappableElement,
}

impl From<PGType> for NamedNodeRef<'static> {
    fn from(val: PGType) -> Self {
        match val {
            PGType::MissingIdentifier | PGType::UnsupportedDepth => rdfa_vocab::WARNING,
            PGType::UnmappableElement => rdfa_vocab::ERROR,
        }
    }
}

/// Sink for non-fatal problems found while mapping.
pub struct Diagnostics<'p> {
    processor_graph: &'p mut Graph,
}

impl<'p> Diagnostics<'p> {
    pub fn new(processor_graph: &'p mut Graph) -> Self {
        Self { processor_graph }
    }

    pub fn report(&mut self, pg_type: PGType, msg: &str) {
        warn!(kind = ?pg_type, "{msg}");
        emit_processor(self.processor_graph, pg_type, msg);
    }
}

fn emit_processor(pg: &mut Graph, pg_type: PGType, msg: &str) {
    let subject: oxrdf::Subject = oxrdf::BlankNode::default().into();
    let pg_type: NamedNodeRef = pg_type.into();
    pg.insert(TripleRef::new(&subject, oxrdf::vocab::rdf::TYPE, pg_type));
    pg.insert(TripleRef::new(
        &subject,
        dc_vocab::DESCRIPTION,
        oxrdf::LiteralRef::new_simple_literal(msg),
    ));
}
