//! Best-effort mapping for elements outside the catalog.
//!
//! The walker follows at most three levels: the element itself, its
//! children, and their children. Anything deeper is reported and dropped.

use oxrdf::NamedNode;
use roxmltree::Node;
use tracing::trace;

use crate::accessor::{ElementExt, clean};
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::{Diagnostics, MapError, PGType};

/// Unknown elements whose tag contains this are not mapped at all.
const IGNORED: &str = "ignore";

pub(crate) fn map_unknown(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
    diagnostics: &mut Diagnostics,
) -> Result<(), MapError> {
    let name = node.tag_name().name();
    if name.contains(IGNORED) {
        trace!(element = name, "ignoring element");
        return Ok(());
    }

    let (predicate, local) = unknown_term(ctx, node)?;
    if !node.has_element_children() {
        return leaf(out, ctx.activity(), &predicate, node);
    }

    let scope = ctx.scope(ctx.activity(), &local)?;
    out.emit(ctx.activity(), predicate.clone(), scope.clone());
    custom_attributes(ctx, out, &scope, node)?;

    for child in node.element_children() {
        let (child_predicate, child_local) = unknown_term(ctx, child)?;
        if !child.has_element_children() {
            leaf(out, &scope, &child_predicate, child)?;
            continue;
        }

        let child_scope = ctx.scope(&scope, &child_local)?;
        let link = NamedNode::new(format!("{}-{child_local}", predicate.as_str()))?;
        out.emit(&scope, link, child_scope.clone());
        custom_attributes(ctx, out, &child_scope, child)?;

        for grandchild in child.element_children() {
            if grandchild.has_element_children() {
                diagnostics.report(
                    PGType::UnsupportedDepth,
                    &format!(
                        "Dropped {name}/{}/{}: nested too deeply in activity {}",
                        child.tag_name().name(),
                        grandchild.tag_name().name(),
                        ctx.identifier()
                    ),
                );
                continue;
            }
            let (grandchild_predicate, _) = unknown_term(ctx, grandchild)?;
            leaf(out, &child_scope, &grandchild_predicate, grandchild)?;
        }
    }

    Ok(())
}

/// The predicate and local name of an unknown element. Elements in a foreign
/// `http(s)` namespace keep their expanded name as predicate and their bare
/// name as local name; everything else lands in the mapping namespace as
/// `activity-{name}`, which is also the local name of its scope node.
pub(crate) fn unknown_term(
    ctx: &ActivityContext,
    node: Node,
) -> Result<(NamedNode, String), MapError> {
    let name = node.tag_name().name();

    if let Some(namespace) = node.tag_name().namespace() {
        if namespace.starts_with("http") && namespace != ctx.config().namespace() {
            let predicate = NamedNode::new(format!("{namespace}{name}"))?;
            return Ok((predicate, name.to_string()));
        }
    }

    let local = if name.starts_with("activity-") {
        name.to_string()
    } else {
        format!("activity-{name}")
    };
    Ok((ctx.iri(&local)?, local))
}

/// Text under `predicate`, and each attribute under `{predicate}-{attribute}`.
fn leaf(
    out: &mut Emitter,
    subject: &NamedNode,
    predicate: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    if let Some(text) = node.text_value() {
        out.literal(subject, predicate.clone(), &text);
    }

    for attribute in node.attributes() {
        let Some(value) = clean(attribute.value()) else {
            continue;
        };
        let attribute_predicate =
            NamedNode::new(format!("{}-{}", predicate.as_str(), attribute.name()))?;
        out.literal(subject, attribute_predicate, &value);
    }

    Ok(())
}

fn custom_attributes(
    ctx: &ActivityContext,
    out: &mut Emitter,
    scope: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    for attribute in node.attributes() {
        if let Some(value) = clean(attribute.value()) {
            out.literal(scope, ctx.custom(attribute.name())?, &value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use oxrdf::Graph;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    use super::*;
    use crate::config::Config;

    fn walk(xml: &str) -> (Vec<String>, Graph) {
        let doc = Document::parse(xml).unwrap();
        let config = Config::default();
        let ctx = ActivityContext::new(&config, doc.root_element(), "A1", &Default::default())
            .unwrap();

        let mut out = Emitter::default();
        let mut processor_graph = Graph::new();
        let mut diagnostics = Diagnostics::new(&mut processor_graph);
        for child in doc.root_element().element_children() {
            map_unknown(&ctx, child, &mut out, &mut diagnostics).unwrap();
        }

        let mut graph = Graph::new();
        out.commit(&mut graph);
        let lines = graph.iter().map(|t| t.to_string()).sorted().collect();
        (lines, processor_graph)
    }

    #[test]
    fn leaf_with_attributes() {
        let (lines, processor_graph) = walk(
            r#"<iati-activity><capital-spend percentage=" 88.8 " note="">x  y</capital-spend></iati-activity>"#,
        );
        assert_eq!(
            lines,
            vec![
                r#"<http://purl.org/collections/iati/activity/A1> <http://purl.org/collections/iati/activity-capital-spend-percentage> "88.8""#,
                r#"<http://purl.org/collections/iati/activity/A1> <http://purl.org/collections/iati/activity-capital-spend> "x y""#,
            ]
        );
        assert!(processor_graph.is_empty());
    }

    #[test]
    fn activity_prefix_is_not_doubled() {
        let (lines, _) = walk(r#"<iati-activity><activity-scope code="1"/></iati-activity>"#);
        assert_eq!(
            lines,
            vec![
                r#"<http://purl.org/collections/iati/activity/A1> <http://purl.org/collections/iati/activity-scope-code> "1""#,
            ]
        );
    }

    #[test]
    fn foreign_namespace_is_kept() {
        let (lines, _) = walk(
            r#"<iati-activity xmlns:x="http://example.org/x#"><x:rating>high</x:rating></iati-activity>"#,
        );
        assert_eq!(
            lines,
            vec![
                r#"<http://purl.org/collections/iati/activity/A1> <http://example.org/x#rating> "high""#,
            ]
        );
    }

    #[test]
    fn nested_elements_get_scope_nodes() {
        let (lines, processor_graph) = walk(
            r#"<iati-activity>
                <crs-add kind="k">
                    <channel-code>41000</channel-code>
                    <loan-terms rate-1="4">
                        <repayment-type code="1"/>
                    </loan-terms>
                </crs-add>
            </iati-activity>"#,
        );
        assert_eq!(
            lines,
            vec![
                r#"<http://purl.org/collections/iati/activity/A1/activity-crs-add/activity-loan-terms> <http://purl.org/collections/iati/activity-repayment-type-code> "1""#,
                r#"<http://purl.org/collections/iati/activity/A1/activity-crs-add/activity-loan-terms> <http://purl.org/collections/iati/custom/rate-1> "4""#,
                r#"<http://purl.org/collections/iati/activity/A1/activity-crs-add> <http://purl.org/collections/iati/activity-channel-code> "41000""#,
                r#"<http://purl.org/collections/iati/activity/A1/activity-crs-add> <http://purl.org/collections/iati/activity-crs-add-activity-loan-terms> <http://purl.org/collections/iati/activity/A1/activity-crs-add/activity-loan-terms>"#,
                r#"<http://purl.org/collections/iati/activity/A1/activity-crs-add> <http://purl.org/collections/iati/custom/kind> "k""#,
                r#"<http://purl.org/collections/iati/activity/A1> <http://purl.org/collections/iati/activity-crs-add> <http://purl.org/collections/iati/activity/A1/activity-crs-add>"#,
            ]
        );
        assert!(processor_graph.is_empty());
    }

    #[test]
    fn fourth_level_is_dropped_and_reported() {
        let (lines, processor_graph) = walk(
            r#"<iati-activity>
                <a><b><c><d>deep</d></c><e>kept</e></b></a>
            </iati-activity>"#,
        );
        assert!(lines.iter().all(|line| !line.contains("deep")));
        assert!(lines.iter().any(|line| line.contains(r#""kept""#)));
        assert_eq!(processor_graph.len(), 2);
    }

    #[test]
    fn ignored_elements_produce_nothing() {
        let (lines, _) = walk(r#"<iati-activity><ignore-me>x</ignore-me></iati-activity>"#);
        assert!(lines.is_empty());
    }
}
