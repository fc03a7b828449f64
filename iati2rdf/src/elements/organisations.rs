use oxrdf::vocab::{rdf, rdfs};
use roxmltree::Node;

use super::code_link;
use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity;

pub(super) fn reporting_org(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    organisation(ctx, node, out, "reporting-org")
}

pub(super) fn participating_org(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    organisation(ctx, node, out, "participating-org")
}

/// Organisations are named by `ref` when they have one, otherwise by their
/// name. Only a `ref` yields an `organisation-code`.
fn organisation(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
    entity: &str,
) -> Result<(), MapError> {
    let reference = node.attr_code("ref");
    let name = node.text_value();
    let Some(id) = identity::derive(
        &[name.as_deref()],
        reference.as_ref().map(|r| r.as_str()),
    ) else {
        return Ok(());
    };

    let org = ctx.entity(entity, &id)?;
    out.emit(ctx.activity(), ctx.iri(&format!("activity-{entity}"))?, org.clone());
    out.emit(&org, rdf::TYPE, ctx.iri("organisation")?);
    code_link(
        ctx,
        out,
        &org,
        "organisation-code",
        "OrganisationIdentifier",
        reference.as_ref(),
    )?;

    if let Some(label) = ctx.lang_literal(node)? {
        out.emit(&org, rdfs::LABEL, label);
    }

    code_link(
        ctx,
        out,
        &org,
        "organisation-type",
        "OrganisationType",
        node.attr_code("type").as_ref(),
    )?;
    code_link(
        ctx,
        out,
        &org,
        "organisation-role",
        "OrganisationRole",
        node.attr_code("role").as_ref(),
    )
}

pub(super) fn other_identifier(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let name = node.text_value();
    let Some(id) = identity::derive(&[name.as_deref()], None) else {
        return Ok(());
    };

    let other = ctx.entity("other-identifier", &id)?;
    out.emit(ctx.activity(), ctx.iri("activity-other-identifier")?, other.clone());
    if let Some(name) = &name {
        out.literal(&other, rdfs::LABEL, name);
    }

    code_link(
        ctx,
        out,
        &other,
        "other-identifier-owner-ref",
        "OrganisationIdentifier",
        node.attr_code("owner-ref").as_ref(),
    )?;

    if let Some(owner) = node.attr_value("owner-name") {
        out.literal(&other, ctx.iri("other-identifier-owner-name")?, &owner);
    }

    Ok(())
}
