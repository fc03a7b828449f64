//! Stable identifiers for the sub-entities of an activity.
//!
//! An entity is named either by a key the source provides (a `ref` or
//! `code`), or by a digest of a fixed, ordered set of its fields. Equal
//! inputs always produce the same identifier, so re-mapping a document, or
//! mapping two identical elements, lands on the same node.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::accessor::clean;

/// Escapes a value for use as an IRI path segment. Only spaces are escaped;
/// the operation is idempotent.
pub fn escape(value: &str) -> String {
    value.replace(' ', "%20")
}

/// A code or reference from the source document, escaped once on
/// construction so it can be embedded in IRIs without further processing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Code(String);

impl Code {
    /// Returns `None` for values that are empty after whitespace cleanup.
    pub fn new(raw: &str) -> Option<Self> {
        clean(raw).map(|value| Self(escape(&value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// Derived from a source-provided key.
    Natural(String),
    /// Hex digest over the entity's identifying fields.
    Content(String),
}

impl NodeId {
    pub fn as_str(&self) -> &str {
        match self {
            NodeId::Natural(s) | NodeId::Content(s) => s,
        }
    }

    pub fn is_natural(&self) -> bool {
        matches!(self, NodeId::Natural(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Code> for NodeId {
    fn from(code: Code) -> Self {
        NodeId::Natural(code.0)
    }
}

/// Running digest over an entity's candidate fields.
///
/// Every call to [`ContentHasher::field`] occupies one position whether or
/// not the value is present, and each present value is framed with its
/// position and length. A value therefore never hashes the same as the same
/// text appearing in a different field, or split differently across fields.
#[derive(Clone, Default)]
pub struct ContentHasher {
    digest: Sha256,
    position: u32,
    present: bool,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.digest.update(self.position.to_le_bytes());
            self.digest.update((value.len() as u64).to_le_bytes());
            self.digest.update(value.as_bytes());
            self.present = true;
        }
        self.position += 1;
        self
    }

    /// `None` when no field was present: the entity must not be emitted.
    pub fn finish(self) -> Option<NodeId> {
        self.present
            .then(|| NodeId::Content(format!("{:x}", self.digest.finalize())))
    }
}

/// Identifies an entity: the explicit key when there is one, otherwise a
/// digest of the present candidate fields, otherwise nothing.
pub fn derive(candidate_fields: &[Option<&str>], explicit_key: Option<&str>) -> Option<NodeId> {
    if let Some(code) = explicit_key.and_then(Code::new) {
        return Some(code.into());
    }

    let mut hasher = ContentHasher::new();
    for field in candidate_fields {
        hasher.field(*field);
    }
    hasher.finish()
}
