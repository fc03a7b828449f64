//! Results, their indicators, and the indicators' periods and baselines.

use oxrdf::NamedNode;
use oxrdf::vocab::rdf;
use roxmltree::Node;

use super::{code_link, description_node, label, period, period_fields};
use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::{self, ContentHasher};

pub(super) fn result(ctx: &ActivityContext, node: Node, out: &mut Emitter) -> Result<(), MapError> {
    let Some(id) = identity::derive(
        &[
            node.child_text("title").as_deref(),
            node.child_text("description").as_deref(),
        ],
        None,
    ) else {
        return Ok(());
    };

    let result = ctx.entity("result", &id)?;
    out.emit(ctx.activity(), ctx.iri("activity-result")?, result.clone());
    out.emit(&result, rdf::TYPE, ctx.iri("result")?);
    titles_and_descriptions(ctx, out, &result, node, "result-description")?;

    for indicator in node.children_named("indicator") {
        result_indicator(ctx, out, &result, indicator)?;
    }

    Ok(())
}

fn titles_and_descriptions(
    ctx: &ActivityContext,
    out: &mut Emitter,
    subject: &NamedNode,
    node: Node,
    description_predicate: &str,
) -> Result<(), MapError> {
    for title in node.children_named("title") {
        label(ctx, out, subject, title)?;
    }
    for description in node.children_named("description") {
        description_node(ctx, out, subject, description_predicate, description)?;
    }
    Ok(())
}

fn result_indicator(
    ctx: &ActivityContext,
    out: &mut Emitter,
    result: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    let Some(id) = identity::derive(
        &[
            node.child_text("title").as_deref(),
            node.child_text("description").as_deref(),
        ],
        None,
    ) else {
        return Ok(());
    };

    let indicator = ctx.nested(result, "indicator", &id)?;
    out.emit(result, ctx.iri("result-indicator")?, indicator.clone());
    out.emit(&indicator, rdf::TYPE, ctx.iri("indicator")?);
    code_link(
        ctx,
        out,
        &indicator,
        "indicator-measure",
        "IndicatorMeasure",
        node.attr_code("measure").as_ref(),
    )?;

    let ascending = node.attr_value("ascending");
    out.literal(
        &indicator,
        ctx.iri("indicator-ascending")?,
        ascending.as_deref().unwrap_or("true"),
    );

    titles_and_descriptions(ctx, out, &indicator, node, "indicator-description")?;

    for period in node.children_named("period") {
        indicator_period(ctx, out, &indicator, period)?;
    }

    if let Some(baseline) = node.child("baseline") {
        indicator_baseline(ctx, out, &indicator, baseline)?;
    }

    Ok(())
}

fn indicator_period(
    ctx: &ActivityContext,
    out: &mut Emitter,
    indicator: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    let start = node.child("period-start");
    let end = node.child("period-end");

    let mut hasher = ContentHasher::new();
    for field in period_fields(start, end) {
        hasher.field(field.as_deref());
    }
    let Some(id) = hasher.finish() else {
        return Ok(());
    };

    let subject = ctx.nested(indicator, "period", &id)?;
    out.emit(indicator, ctx.iri("indicator-period")?, subject.clone());
    out.emit(&subject, rdf::TYPE, ctx.iri("period")?);
    period(ctx, out, &subject, start, end)?;

    for (child, predicate) in [("target", "period-target"), ("actual", "period-actual")] {
        if let Some(value) = node.child(child).and_then(|n| n.attr_value("value")) {
            out.literal(&subject, ctx.iri(predicate)?, &value);
        }
    }

    Ok(())
}

/// Baseline values hang directly off the indicator.
fn indicator_baseline(
    ctx: &ActivityContext,
    out: &mut Emitter,
    indicator: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    if let Some(value) = node.attr_value("value") {
        out.literal(indicator, ctx.iri("baseline-value")?, &value);
    }
    if let Some(year) = node.attr_value("year") {
        out.literal(indicator, ctx.iri("baseline-year")?, &year);
    }
    if let Some(comment) = node.child("comment") {
        if let Some(text) = ctx.lang_literal(comment)? {
            out.emit(indicator, ctx.iri("baseline-comment")?, text);
        }
    }
    Ok(())
}
