//! Per-activity state threaded through every element mapper.

use oxrdf::{Literal, NamedNode};
use roxmltree::Node;

use crate::MapError;
use crate::accessor::ElementExt;
use crate::config::Config;
use crate::engine::DocumentDefaults;
use crate::identity::{Code, NodeId, escape};

/// Activity-level values consumed by children that omit their own.
///
/// Codes are escaped once here and never rewritten afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Defaults {
    pub language: Option<String>,
    pub currency: Option<Code>,
    pub flow_type: Option<Code>,
    pub aid_type: Option<Code>,
    pub finance_type: Option<Code>,
    pub tied_status: Option<Code>,
}

impl Defaults {
    /// Reads `xml:lang` and the `default-*` attributes of an activity. Type
    /// codes not given as attributes are taken from the `default-*` child
    /// elements (`<default-aid-type code="..."/>`).
    pub fn from_activity(activity: Node) -> Self {
        Self {
            language: activity.xml_lang(),
            currency: activity.attr_code("default-currency"),
            flow_type: default_code(activity, "default-flow-type"),
            aid_type: default_code(activity, "default-aid-type"),
            finance_type: default_code(activity, "default-finance-type"),
            tied_status: default_code(activity, "default-tied-status"),
        }
    }
}

fn default_code(activity: Node, name: &str) -> Option<Code> {
    activity
        .attr_code(name)
        .or_else(|| activity.child(name).and_then(|n| n.attr_code("code")))
}

/// Immutable for the duration of one activity's mapping.
#[derive(Clone, Debug)]
pub struct ActivityContext<'c> {
    config: &'c Config,
    identifier: String,
    activity: NamedNode,
    version: Option<String>,
    hierarchy: Option<String>,
    linked_data_uri: Option<String>,
    defaults: Defaults,
}

impl<'c> ActivityContext<'c> {
    /// Resolves the activity's own attributes against the document defaults.
    /// Fails only when the identifier cannot be part of an IRI.
    pub fn new(
        config: &'c Config,
        activity: Node,
        identifier: &str,
        document: &DocumentDefaults,
    ) -> Result<Self, MapError> {
        let identifier = escape(identifier);
        let node = NamedNode::new(format!("{}activity/{identifier}", config.namespace()))?;

        let version = activity
            .attr_value("version")
            .or_else(|| document.version.clone());

        let linked_data_uri = activity.attr_value("linked-data-uri").or_else(|| {
            document
                .linked_data_default
                .as_ref()
                .map(|base| format!("{base}{identifier}"))
        });

        Ok(Self {
            config,
            activity: node,
            version,
            hierarchy: activity.attr_value("hierarchy"),
            linked_data_uri,
            defaults: Defaults::from_activity(activity),
            identifier,
        })
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// The escaped activity identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `{ns}activity/{id}`
    pub fn activity(&self) -> &NamedNode {
        &self.activity
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn hierarchy(&self) -> Option<&str> {
        self.hierarchy.as_deref()
    }

    pub fn linked_data_uri(&self) -> Option<&str> {
        self.linked_data_uri.as_deref()
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// A term in the mapping namespace.
    pub fn iri(&self, local: &str) -> Result<NamedNode, MapError> {
        Ok(NamedNode::new(format!("{}{local}", self.config.namespace()))?)
    }

    /// A term in the custom namespace.
    pub fn custom(&self, local: &str) -> Result<NamedNode, MapError> {
        Ok(NamedNode::new(format!(
            "{}{local}",
            self.config.custom_namespace()
        ))?)
    }

    /// `{ns}codelist/{list}/{code}`
    pub fn codelist(&self, list: &str, code: &Code) -> Result<NamedNode, MapError> {
        self.iri(&format!("codelist/{list}/{code}"))
    }

    /// `{ns}activity/{other}` for a reference to another activity.
    pub fn other_activity(&self, reference: &Code) -> Result<NamedNode, MapError> {
        self.iri(&format!("activity/{reference}"))
    }

    /// `{ns}activity/{id}/{entity}/{node_id}`
    pub fn entity(&self, entity: &str, id: &NodeId) -> Result<NamedNode, MapError> {
        self.nested(&self.activity, entity, id)
    }

    /// `{parent}/{entity}/{node_id}`
    pub fn nested(
        &self,
        parent: &NamedNode,
        entity: &str,
        id: &NodeId,
    ) -> Result<NamedNode, MapError> {
        Ok(NamedNode::new(format!("{}/{entity}/{id}", parent.as_str()))?)
    }

    /// `{parent}/{name}`, the scope nodes of the fallback walker.
    pub fn scope(&self, parent: &NamedNode, name: &str) -> Result<NamedNode, MapError> {
        Ok(NamedNode::new(format!("{}/{name}", parent.as_str()))?)
    }

    /// Language-tagged text of `node`, inheriting the activity language.
    pub fn lang_literal(&self, node: Node) -> Result<Option<Literal>, MapError> {
        node.lang_literal(self.defaults.language.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::*;

    const ACTIVITY: &str = r#"
        <iati-activity default-currency="USD" xml:lang="en" hierarchy="1">
            <iati-identifier>AA-000-1</iati-identifier>
            <default-aid-type code=" C01 "/>
            <default-flow-type code="10"/>
        </iati-activity>"#;

    #[test]
    fn defaults_come_from_attributes_and_children() {
        let doc = Document::parse(ACTIVITY).unwrap();
        let defaults = Defaults::from_activity(doc.root_element());
        assert_eq!(defaults.language.as_deref(), Some("en"));
        assert_eq!(defaults.currency, Code::new("USD"));
        assert_eq!(defaults.aid_type, Code::new("C01"));
        assert_eq!(defaults.flow_type, Code::new("10"));
        assert_eq!(defaults.finance_type, None);
        assert_eq!(defaults.tied_status, None);
    }

    #[test]
    fn document_values_are_inherited() {
        let doc = Document::parse(ACTIVITY).unwrap();
        let config = Config::default();
        let document = DocumentDefaults {
            version: Some("1.03".to_string()),
            linked_data_default: Some("http://data.example.org/".to_string()),
        };

        let ctx = ActivityContext::new(&config, doc.root_element(), "AA-000-1", &document).unwrap();
        assert_eq!(ctx.version(), Some("1.03"));
        assert_eq!(ctx.hierarchy(), Some("1"));
        assert_eq!(ctx.linked_data_uri(), Some("http://data.example.org/AA-000-1"));
        assert_eq!(
            ctx.activity().as_str(),
            "http://purl.org/collections/iati/activity/AA-000-1"
        );
    }

    #[test]
    fn own_values_win() {
        let doc = Document::parse(
            r#"<iati-activity version="2.01" linked-data-uri="http://own.example/x"/>"#,
        )
        .unwrap();
        let config = Config::default();
        let document = DocumentDefaults {
            version: Some("1.03".to_string()),
            linked_data_default: Some("http://data.example.org/".to_string()),
        };

        let ctx = ActivityContext::new(&config, doc.root_element(), "X 1", &document).unwrap();
        assert_eq!(ctx.version(), Some("2.01"));
        assert_eq!(ctx.linked_data_uri(), Some("http://own.example/x"));
        assert_eq!(ctx.identifier(), "X%201");
    }

    #[test]
    fn codelist_iri_shape() {
        let doc = Document::parse("<iati-activity/>").unwrap();
        let config = Config::default();
        let ctx = ActivityContext::new(&config, doc.root_element(), "A", &Default::default())
            .unwrap();
        let code = Code::new("GB 1").unwrap();
        assert_eq!(
            ctx.codelist("OrganisationIdentifier", &code).unwrap().as_str(),
            "http://purl.org/collections/iati/codelist/OrganisationIdentifier/GB%201"
        );
    }
}
