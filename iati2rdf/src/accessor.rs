//! Reading cleaned values out of the element tree.

use itertools::Itertools;
use oxrdf::Literal;
use roxmltree::Node;

use crate::MapError;
use crate::identity::Code;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Collapses whitespace runs to a single space and trims the ends.
/// Empty results are `None`.
pub fn clean(text: &str) -> Option<String> {
    let cleaned = text.split_whitespace().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Accessors over `roxmltree` elements. Child lookups match on local name.
pub trait ElementExt<'a, 'input: 'a>: Copy {
    /// Cleaned, non-empty attribute value.
    fn attr_value(self, name: &str) -> Option<String>;

    /// Attribute value as an escaped [`Code`].
    fn attr_code(self, name: &str) -> Option<Code>;

    /// Cleaned `xml:lang` of this element.
    fn xml_lang(self) -> Option<String>;

    /// Cleaned, non-empty direct text content.
    fn text_value(self) -> Option<String>;

    fn child(self, name: &str) -> Option<Node<'a, 'input>>;

    fn children_named(self, name: &str) -> Vec<Node<'a, 'input>>;

    fn element_children(self) -> Vec<Node<'a, 'input>>;

    fn has_element_children(self) -> bool;

    /// Text of the first child called `name`.
    fn child_text(self, name: &str) -> Option<String>;

    /// Text as a literal tagged with this element's `xml:lang`, else
    /// `default_language`, else untagged. Tags are lowercased.
    fn lang_literal(self, default_language: Option<&str>) -> Result<Option<Literal>, MapError>;
}

impl<'a, 'input: 'a> ElementExt<'a, 'input> for Node<'a, 'input> {
    fn attr_value(self, name: &str) -> Option<String> {
        self.attribute(name).and_then(clean)
    }

    fn attr_code(self, name: &str) -> Option<Code> {
        self.attribute(name).and_then(Code::new)
    }

    fn xml_lang(self) -> Option<String> {
        self.attribute((XML_NAMESPACE, "lang")).and_then(clean)
    }

    fn text_value(self) -> Option<String> {
        let text: String = self
            .children()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        clean(&text)
    }

    fn child(self, name: &str) -> Option<Node<'a, 'input>> {
        self.children()
            .find(|n| n.is_element() && n.tag_name().name() == name)
    }

    fn children_named(self, name: &str) -> Vec<Node<'a, 'input>> {
        self.children()
            .filter(|n| n.is_element() && n.tag_name().name() == name)
            .collect()
    }

    fn element_children(self) -> Vec<Node<'a, 'input>> {
        self.children().filter(|n| n.is_element()).collect()
    }

    fn has_element_children(self) -> bool {
        self.children().any(|n| n.is_element())
    }

    fn child_text(self, name: &str) -> Option<String> {
        self.child(name).and_then(|n| n.text_value())
    }

    fn lang_literal(self, default_language: Option<&str>) -> Result<Option<Literal>, MapError> {
        let Some(text) = self.text_value() else {
            return Ok(None);
        };

        let literal = match self.xml_lang().as_deref().or(default_language) {
            Some(language) => Literal::new_language_tagged_literal(text, language.to_lowercase())?,
            None => Literal::new_simple_literal(text),
        };
        Ok(Some(literal))
    }
}
