use oxrdf::{Graph, Literal, NamedNode, Term, Triple};
use tracing::trace;

/// Statements produced for one element, held back until the element has been
/// mapped completely so a failure part-way through leaves the graph untouched.
#[derive(Default)]
pub(crate) struct Emitter {
    triples: Vec<Triple>,
}

impl Emitter {
    pub fn emit(
        &mut self,
        subject: &NamedNode,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) {
        self.triples
            .push(Triple::new(subject.clone(), predicate, object));
    }

    pub fn literal(&mut self, subject: &NamedNode, predicate: impl Into<NamedNode>, value: &str) {
        self.emit(subject, predicate, Literal::new_simple_literal(value));
    }

    /// Inserts everything buffered into `graph`; returns how many statements
    /// were new.
    pub fn commit(self, graph: &mut Graph) -> usize {
        let mut added = 0;
        for triple in &self.triples {
            trace!("- Emitting output triple: {triple}");
            if graph.insert(triple) {
                added += 1;
            }
        }
        added
    }
}
