use oxrdf::vocab::rdf;
use roxmltree::Node;

use super::{code_link, label};
use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::{Code, NodeId};

/// `{vocabulary}/{code}`, the natural key of sectors and policy markers.
fn vocabulary_key(vocabulary: &Code, code: &Code) -> NodeId {
    NodeId::Natural(format!("{vocabulary}/{code}"))
}

pub(super) fn sector(ctx: &ActivityContext, node: Node, out: &mut Emitter) -> Result<(), MapError> {
    let (Some(code), Some(vocabulary)) = (node.attr_code("code"), node.attr_code("vocabulary"))
    else {
        return Ok(());
    };

    let sector = ctx.entity("sector", &vocabulary_key(&vocabulary, &code))?;
    out.emit(ctx.activity(), ctx.iri("activity-sector")?, sector.clone());
    out.emit(&sector, rdf::TYPE, ctx.iri("sector")?);
    code_link(ctx, out, &sector, "sector-code", "Sector", Some(&code))?;
    code_link(ctx, out, &sector, "sector-vocabulary", "Vocabulary", Some(&vocabulary))?;

    if let Some(percentage) = node.attr_value("percentage") {
        out.literal(&sector, ctx.iri("percentage")?, &percentage);
    }

    label(ctx, out, &sector, node)
}

pub(super) fn policy_marker(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let (Some(code), Some(vocabulary)) = (node.attr_code("code"), node.attr_code("vocabulary"))
    else {
        return Ok(());
    };

    let marker = ctx.entity("policy-marker", &vocabulary_key(&vocabulary, &code))?;
    out.emit(ctx.activity(), ctx.iri("activity-policy-marker")?, marker.clone());
    out.emit(&marker, rdf::TYPE, ctx.iri("policy-marker")?);
    code_link(ctx, out, &marker, "policy-marker-code", "PolicyMarker", Some(&code))?;
    code_link(ctx, out, &marker, "policy-marker-vocabulary", "Vocabulary", Some(&vocabulary))?;
    code_link(
        ctx,
        out,
        &marker,
        "significance-code",
        "PolicySignificance",
        node.attr_code("significance").as_ref(),
    )?;

    label(ctx, out, &marker, node)
}
