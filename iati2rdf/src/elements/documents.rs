use oxrdf::NamedNode;
use oxrdf::vocab::rdf;
use roxmltree::Node;

use super::{code_link, description_node, label, lookup_key};
use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::{self, ContentHasher, NodeId, escape};

const CONTACT_FIELDS: [&str; 5] = [
    "organisation",
    "person-name",
    "telephone",
    "email",
    "mailing-address",
];

pub(super) fn description(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    description_node(ctx, out, ctx.activity(), "activity-description", node)
}

pub(super) fn contact_info(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let mut hasher = ContentHasher::new();
    for field in CONTACT_FIELDS {
        hasher.field(node.child_text(field).as_deref());
    }
    let Some(id) = hasher.finish() else {
        return Ok(());
    };

    let contact = ctx.entity("contact-info", &id)?;
    out.emit(ctx.activity(), ctx.iri("activity-contact-info")?, contact.clone());
    out.emit(&contact, rdf::TYPE, ctx.iri("contact-info")?);

    for child in node.element_children() {
        if let Some(text) = child.text_value() {
            let key = lookup_key(child.tag_name().name());
            out.literal(&contact, ctx.iri(&format!("contact-info-{key}"))?, &text);
        }
    }

    Ok(())
}

pub(super) fn document_link(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let Some(url) = node.attr_value("url") else {
        return Ok(());
    };
    let Some(id) = identity::derive(&[Some(url.as_str())], None) else {
        return Ok(());
    };

    let link = ctx.entity("document-link", &id)?;
    out.emit(ctx.activity(), ctx.iri("activity-document-link")?, link.clone());
    out.emit(&link, rdf::TYPE, ctx.iri("document-link")?);
    out.emit(&link, ctx.iri("url")?, NamedNode::new(escape(&url))?);
    code_link(
        ctx,
        out,
        &link,
        "format",
        "FileFormat",
        node.attr_code("format").as_ref(),
    )?;

    for title in node.children_named("title") {
        label(ctx, out, &link, title)?;
    }

    for category in node.children_named("category") {
        code_link(
            ctx,
            out,
            &link,
            "document-category",
            "DocumentCategory",
            category.attr_code("code").as_ref(),
        )?;
    }

    for language in node.children_named("language") {
        if let Some(code) = language.attr_value("code") {
            out.literal(&link, ctx.iri("language")?, &code);
        }
        if let Some(text) = ctx.lang_literal(language)? {
            out.emit(&link, ctx.iri("language-text")?, text);
        }
    }

    Ok(())
}

pub(super) fn related_activity(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let Some(reference) = node.attr_code("ref") else {
        return Ok(());
    };

    let related = ctx.entity("related-activity", &NodeId::from(reference.clone()))?;
    out.emit(ctx.activity(), ctx.iri("related-activity")?, related.clone());
    out.emit(&related, ctx.iri("activity")?, ctx.other_activity(&reference)?);
    out.literal(&related, ctx.iri("related-activity-id")?, reference.as_str());
    code_link(
        ctx,
        out,
        &related,
        "related-activity-type",
        "RelatedActivityType",
        node.attr_code("type").as_ref(),
    )?;

    label(ctx, out, &related, node)
}

/// Each `condition` inside `conditions` becomes its own node.
pub(super) fn conditions(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    for condition in node.children_named("condition") {
        let Some(id) = identity::derive(&[condition.text_value().as_deref()], None) else {
            continue;
        };

        let subject = ctx.entity("condition", &id)?;
        out.emit(ctx.activity(), ctx.iri("activity-condition")?, subject.clone());
        out.emit(&subject, rdf::TYPE, ctx.iri("condition")?);
        label(ctx, out, &subject, condition)?;
        code_link(
            ctx,
            out,
            &subject,
            "condition-type",
            "ConditionType",
            condition.attr_code("type").as_ref(),
        )?;
    }

    Ok(())
}
