//! Budgets, planned disbursements and transactions.

use oxrdf::NamedNode;
use oxrdf::vocab::rdf;
use roxmltree::Node;

use super::{code_link, description_node, period, period_fields, value};
use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::{self, Code, ContentHasher};

pub(super) fn budget(ctx: &ActivityContext, node: Node, out: &mut Emitter) -> Result<(), MapError> {
    let Some(budget) = planned(ctx, node, out, "budget")? else {
        return Ok(());
    };

    code_link(
        ctx,
        out,
        &budget,
        "budget-type",
        "BudgetType",
        node.attr_code("type").as_ref(),
    )
}

pub(super) fn planned_disbursement(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let Some(disbursement) = planned(ctx, node, out, "planned-disbursement")? else {
        return Ok(());
    };

    if let Some(updated) = node.attr_value("updated") {
        out.literal(&disbursement, ctx.iri("updated")?, &updated);
    }
    Ok(())
}

/// The part budgets and planned disbursements share: a period and a value,
/// which together identify the node.
fn planned(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
    entity: &str,
) -> Result<Option<NamedNode>, MapError> {
    let start = node.child("period-start");
    let end = node.child("period-end");
    let amount = node.child("value");

    let mut hasher = ContentHasher::new();
    for field in period_fields(start, end) {
        hasher.field(field.as_deref());
    }
    hasher.field(amount.and_then(|n| n.text_value()).as_deref());
    let Some(id) = hasher.finish() else {
        return Ok(None);
    };

    let planned = ctx.entity(entity, &id)?;
    out.emit(ctx.activity(), ctx.iri(&format!("activity-{entity}"))?, planned.clone());
    out.emit(&planned, rdf::TYPE, ctx.iri(entity)?);
    period(ctx, out, &planned, start, end)?;
    value(ctx, out, &planned, amount)?;

    Ok(Some(planned))
}

/// Transactions are named by `ref`, or else by their value, first
/// description and transaction date.
pub(super) fn transaction(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let reference = node.attr_value("ref");
    let amount = node.child("value");
    let date = node.child("transaction-date");

    let Some(id) = identity::derive(
        &[
            amount.and_then(|n| n.text_value()).as_deref(),
            node.child_text("description").as_deref(),
            date.and_then(|n| n.attr_value("iso-date")).as_deref(),
        ],
        reference.as_deref(),
    ) else {
        return Ok(());
    };

    let transaction = ctx.entity("transaction", &id)?;
    out.emit(ctx.activity(), ctx.iri("activity-transaction")?, transaction.clone());
    out.emit(&transaction, rdf::TYPE, ctx.iri("transaction")?);

    if let Some(reference) = &reference {
        out.literal(&transaction, ctx.iri("transaction-ref")?, reference);
    }

    let defaults = ctx.defaults();
    let typed = [
        ("aid-type", "AidType", &defaults.aid_type),
        ("finance-type", "FinanceType", &defaults.finance_type),
        ("flow-type", "FlowType", &defaults.flow_type),
        ("tied-status", "TiedStatus", &defaults.tied_status),
    ];
    for (name, list, default) in typed {
        let code = child_code(node, name);
        code_link(ctx, out, &transaction, name, list, code.as_ref().or(default.as_ref()))?;
    }

    for description in node.children_named("description") {
        description_node(ctx, out, &transaction, "transaction-description", description)?;
    }

    code_link(
        ctx,
        out,
        &transaction,
        "disbursement-channel",
        "disbursementChannel",
        child_code(node, "disbursement-channel").as_ref(),
    )?;

    for party in ["provider", "receiver"] {
        if let Some(org) = node.child(&format!("{party}-org")) {
            transaction_party(ctx, out, &transaction, party, org)?;
        }
    }

    if let Some(date) = date.and_then(|n| n.attr_value("iso-date")) {
        out.literal(&transaction, ctx.iri("transaction-date")?, &date);
    }

    code_link(
        ctx,
        out,
        &transaction,
        "transaction-type",
        "TransactionType",
        child_code(node, "transaction-type").as_ref(),
    )?;

    value(ctx, out, &transaction, amount)
}

fn child_code(node: Node, name: &str) -> Option<Code> {
    node.child(name).and_then(|n| n.attr_code("code"))
}

/// `{party}-org-name`, `{party}-org` and `{party}-org-activity-id` for a
/// `provider-org` or `receiver-org`.
fn transaction_party(
    ctx: &ActivityContext,
    out: &mut Emitter,
    transaction: &NamedNode,
    party: &str,
    org: Node,
) -> Result<(), MapError> {
    if let Some(name) = org.text_value() {
        out.literal(transaction, ctx.iri(&format!("{party}-org-name"))?, &name);
    }

    code_link(
        ctx,
        out,
        transaction,
        &format!("{party}-org"),
        "OrganisationIdentifier",
        org.attr_code("ref").as_ref(),
    )?;

    if let Some(activity) = org.attr_code(&format!("{party}-activity-id")) {
        out.emit(
            transaction,
            ctx.iri(&format!("{party}-org-activity-id"))?,
            ctx.other_activity(&activity)?,
        );
    }

    Ok(())
}
