//! Elements that attach directly to the activity node.

use oxrdf::NamedNode;
use oxrdf::vocab::rdfs;
use roxmltree::Node;

use super::code_link;
use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::escape;

pub(super) fn iati_identifier(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    if let Some(id) = node.text_value() {
        out.literal(ctx.activity(), ctx.iri("activity-id")?, &id);
    }
    Ok(())
}

pub(super) fn activity_website(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    if let Some(website) = node.text_value() {
        let website = NamedNode::new(escape(&website))?;
        out.emit(ctx.activity(), ctx.iri("activity-website")?, website);
    }
    Ok(())
}

pub(super) fn title(ctx: &ActivityContext, node: Node, out: &mut Emitter) -> Result<(), MapError> {
    if let Some(title) = ctx.lang_literal(node)? {
        out.emit(ctx.activity(), rdfs::LABEL, title);
    }
    Ok(())
}

/// `activity-date` becomes `{type}-date` and `{type}-text` statements, e.g.
/// `start-actual-date`.
pub(super) fn activity_date(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let Some(date_type) = node.attr_code("type") else {
        return Ok(());
    };

    if let Some(date) = node.attr_value("iso-date") {
        out.literal(ctx.activity(), ctx.iri(&format!("{date_type}-date"))?, &date);
    }
    if let Some(text) = ctx.lang_literal(node)? {
        out.emit(ctx.activity(), ctx.iri(&format!("{date_type}-text"))?, text);
    }
    Ok(())
}

fn activity_code(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
    predicate: &str,
    list: &str,
) -> Result<(), MapError> {
    code_link(
        ctx,
        out,
        ctx.activity(),
        predicate,
        list,
        node.attr_code("code").as_ref(),
    )
}

pub(super) fn activity_status(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    activity_code(ctx, node, out, "activity-status", "ActivityStatus")
}

pub(super) fn collaboration_type(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    activity_code(ctx, node, out, "activity-collaboration-type", "CollaborationType")
}

pub(super) fn finance_type(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    activity_code(ctx, node, out, "activity-default-finance-type", "FinanceType")
}

pub(super) fn flow_type(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    activity_code(ctx, node, out, "activity-default-flow-type", "FlowType")
}

pub(super) fn aid_type(ctx: &ActivityContext, node: Node, out: &mut Emitter) -> Result<(), MapError> {
    activity_code(ctx, node, out, "activity-default-aid-type", "AidType")
}

pub(super) fn tied_status(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    activity_code(ctx, node, out, "activity-default-tied-status", "TiedStatus")
}
