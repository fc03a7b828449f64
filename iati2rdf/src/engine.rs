//! Maps one activity element at a time into a graph.

use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNode};
use roxmltree::Node;
use tracing::{debug, trace};

use crate::accessor::ElementExt;
use crate::config::Config;
use crate::context::ActivityContext;
use crate::elements::{ElementKind, lookup_key};
use crate::emit::Emitter;
use crate::identity::escape;
use crate::{Diagnostics, MapError, PGType, fallback, owl_vocab};

pub const ACTIVITY_TAG: &str = "iati-activity";
pub const IDENTIFIER_TAG: &str = "iati-identifier";

/// Values declared once on the `iati-activities` root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentDefaults {
    pub version: Option<String>,
    pub linked_data_default: Option<String>,
}

impl DocumentDefaults {
    /// A root that is itself an activity carries no document defaults.
    pub fn from_root(root: Node) -> Self {
        if root.tag_name().name() == ACTIVITY_TAG {
            return Self::default();
        }

        Self {
            version: root.attr_value("version"),
            linked_data_default: root.attr_value("linked-data-default"),
        }
    }
}

pub struct Engine<'c> {
    config: &'c Config,
}

impl<'c> Engine<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// The activity identifier: the first whitespace-delimited token of the
    /// first `iati-identifier` child.
    pub fn identifier(activity: Node) -> Option<String> {
        activity
            .child_text(IDENTIFIER_TAG)
            .and_then(|text| text.split_whitespace().next().map(str::to_string))
    }

    /// Maps `activity` into `graph` and returns its node, or `None` when the
    /// activity was skipped. Never fails: problems are reported to
    /// `diagnostics` and the affected element is left out.
    pub fn map_activity(
        &self,
        activity: Node,
        document: &DocumentDefaults,
        graph: &mut Graph,
        diagnostics: &mut Diagnostics,
    ) -> Option<NamedNode> {
        let Some(identifier) = Self::identifier(activity) else {
            diagnostics.report(
                PGType::MissingIdentifier,
                &format!(
                    "Skipped activity without {IDENTIFIER_TAG} (line {})",
                    line_of(activity)
                ),
            );
            return None;
        };

        let ctx = match ActivityContext::new(self.config, activity, &identifier, document) {
            Ok(ctx) => ctx,
            Err(err) => {
                diagnostics.report(
                    PGType::UnmappableElement,
                    &format!("Skipped activity {identifier}: {err}"),
                );
                return None;
            }
        };

        debug!(
            activity = ctx.identifier(),
            version = ctx.version(),
            "mapping activity"
        );

        let mut out = Emitter::default();
        self.baseline(&ctx, &mut out, diagnostics);
        out.commit(graph);

        for child in activity.element_children() {
            self.map_child(&ctx, child, graph, diagnostics);
        }

        Some(ctx.activity().clone())
    }

    fn baseline(&self, ctx: &ActivityContext, out: &mut Emitter, diagnostics: &mut Diagnostics) {
        let activity = ctx.activity();
        // the namespace is a validated IRI and these are fixed suffixes
        let Ok(class) = ctx.iri("activity") else {
            return;
        };
        out.emit(activity, rdf::TYPE, class);

        if let Some(hierarchy) = ctx.hierarchy() {
            if let Ok(predicate) = ctx.iri("activity-hierarchy") {
                out.literal(activity, predicate, hierarchy);
            }
        }

        if let Some(uri) = ctx.linked_data_uri() {
            match NamedNode::new(escape(uri)) {
                Ok(same_as) => out.emit(activity, owl_vocab::SAME_AS, same_as),
                Err(err) => diagnostics.report(
                    PGType::UnmappableElement,
                    &format!(
                        "Activity {}: linked-data URI <{uri}> is not an IRI ({err})",
                        ctx.identifier()
                    ),
                ),
            }
        }
    }

    /// Routes one direct child of the activity: the catalog first, the
    /// fallback walker for unknown elements and for elements whose mapper
    /// failed.
    fn map_child(
        &self,
        ctx: &ActivityContext,
        child: Node,
        graph: &mut Graph,
        diagnostics: &mut Diagnostics,
    ) {
        let key = lookup_key(child.tag_name().name());

        if let Some(kind) = ElementKind::from_tag(&key) {
            let mut out = Emitter::default();
            match kind.map(ctx, child, &mut out) {
                Ok(()) => {
                    let added = out.commit(graph);
                    trace!(element = kind.tag(), added, "mapped element");
                    return;
                }
                Err(err) => {
                    debug!(element = kind.tag(), %err, "mapper failed, using fallback");
                }
            }
        }

        let mut out = Emitter::default();
        match fallback::map_unknown(ctx, child, &mut out, diagnostics) {
            Ok(()) => {
                out.commit(graph);
            }
            Err(err) => report_unmappable(ctx, child, &err, diagnostics),
        }
    }
}

fn report_unmappable(ctx: &ActivityContext, child: Node, err: &MapError, diagnostics: &mut Diagnostics) {
    diagnostics.report(
        PGType::UnmappableElement,
        &format!(
            "Could not convert {} in activity {} (line {}): {err}",
            child.tag_name().name(),
            ctx.identifier(),
            line_of(child)
        ),
    );
}

fn line_of(node: Node) -> u32 {
    node.document().text_pos_at(node.range().start).row
}
