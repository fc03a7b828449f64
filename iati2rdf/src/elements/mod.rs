//! The catalog of recognized activity elements.
//!
//! Every direct child of an `iati-activity` whose normalized name matches an
//! [`ElementKind`] is handled by that kind's mapper. Mappers write into a
//! buffer and return an error only when something in the source cannot be
//! represented (an invalid IRI or language tag); missing data just means
//! fewer statements.

mod classification;
mod codes;
mod documents;
mod finance;
mod geography;
mod organisations;
mod results;

use oxrdf::NamedNode;
use oxrdf::vocab::{rdf, rdfs};
use roxmltree::Node;

use crate::MapError;
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::{self, Code};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    IatiIdentifier,
    ReportingOrg,
    ParticipatingOrg,
    OtherIdentifier,
    ActivityWebsite,
    Title,
    Description,
    ActivityStatus,
    ActivityDate,
    ContactInfo,
    RecipientCountry,
    RecipientRegion,
    Location,
    Sector,
    PolicyMarker,
    CollaborationType,
    FinanceType,
    FlowType,
    AidType,
    TiedStatus,
    Budget,
    PlannedDisbursement,
    Transaction,
    DocumentLink,
    RelatedActivity,
    Conditions,
    Result,
}

impl ElementKind {
    pub const ALL: [ElementKind; 27] = [
        Self::IatiIdentifier,
        Self::ReportingOrg,
        Self::ParticipatingOrg,
        Self::OtherIdentifier,
        Self::ActivityWebsite,
        Self::Title,
        Self::Description,
        Self::ActivityStatus,
        Self::ActivityDate,
        Self::ContactInfo,
        Self::RecipientCountry,
        Self::RecipientRegion,
        Self::Location,
        Self::Sector,
        Self::PolicyMarker,
        Self::CollaborationType,
        Self::FinanceType,
        Self::FlowType,
        Self::AidType,
        Self::TiedStatus,
        Self::Budget,
        Self::PlannedDisbursement,
        Self::Transaction,
        Self::DocumentLink,
        Self::RelatedActivity,
        Self::Conditions,
        Self::Result,
    ];

    /// Looks up a key produced by [`lookup_key`].
    pub fn from_tag(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == key)
    }

    /// The table key, which is also the element name without any `default-`
    /// prefix.
    pub fn tag(self) -> &'static str {
        match self {
            Self::IatiIdentifier => "iati-identifier",
            Self::ReportingOrg => "reporting-org",
            Self::ParticipatingOrg => "participating-org",
            Self::OtherIdentifier => "other-identifier",
            Self::ActivityWebsite => "activity-website",
            Self::Title => "title",
            Self::Description => "description",
            Self::ActivityStatus => "activity-status",
            Self::ActivityDate => "activity-date",
            Self::ContactInfo => "contact-info",
            Self::RecipientCountry => "recipient-country",
            Self::RecipientRegion => "recipient-region",
            Self::Location => "location",
            Self::Sector => "sector",
            Self::PolicyMarker => "policy-marker",
            Self::CollaborationType => "collaboration-type",
            Self::FinanceType => "finance-type",
            Self::FlowType => "flow-type",
            Self::AidType => "aid-type",
            Self::TiedStatus => "tied-status",
            Self::Budget => "budget",
            Self::PlannedDisbursement => "planned-disbursement",
            Self::Transaction => "transaction",
            Self::DocumentLink => "document-link",
            Self::RelatedActivity => "related-activity",
            Self::Conditions => "conditions",
            Self::Result => "result",
        }
    }

    pub(crate) fn map(
        self,
        ctx: &ActivityContext,
        node: Node,
        out: &mut Emitter,
    ) -> Result<(), MapError> {
        match self {
            Self::IatiIdentifier => codes::iati_identifier(ctx, node, out),
            Self::ReportingOrg => organisations::reporting_org(ctx, node, out),
            Self::ParticipatingOrg => organisations::participating_org(ctx, node, out),
            Self::OtherIdentifier => organisations::other_identifier(ctx, node, out),
            Self::ActivityWebsite => codes::activity_website(ctx, node, out),
            Self::Title => codes::title(ctx, node, out),
            Self::Description => documents::description(ctx, node, out),
            Self::ActivityStatus => codes::activity_status(ctx, node, out),
            Self::ActivityDate => codes::activity_date(ctx, node, out),
            Self::ContactInfo => documents::contact_info(ctx, node, out),
            Self::RecipientCountry => geography::recipient_country(ctx, node, out),
            Self::RecipientRegion => geography::recipient_region(ctx, node, out),
            Self::Location => geography::location(ctx, node, out),
            Self::Sector => classification::sector(ctx, node, out),
            Self::PolicyMarker => classification::policy_marker(ctx, node, out),
            Self::CollaborationType => codes::collaboration_type(ctx, node, out),
            Self::FinanceType => codes::finance_type(ctx, node, out),
            Self::FlowType => codes::flow_type(ctx, node, out),
            Self::AidType => codes::aid_type(ctx, node, out),
            Self::TiedStatus => codes::tied_status(ctx, node, out),
            Self::Budget => finance::budget(ctx, node, out),
            Self::PlannedDisbursement => finance::planned_disbursement(ctx, node, out),
            Self::Transaction => finance::transaction(ctx, node, out),
            Self::DocumentLink => documents::document_link(ctx, node, out),
            Self::RelatedActivity => documents::related_activity(ctx, node, out),
            Self::Conditions => documents::conditions(ctx, node, out),
            Self::Result => results::result(ctx, node, out),
        }
    }
}

/// Normalizes an element tag to a table key: any `{namespace}` or `prefix:`
/// is dropped, camelCase and snake_case become kebab-case, everything is
/// lowercased, and a leading `default-` is removed.
pub fn lookup_key(tag: &str) -> String {
    let local = tag.rsplit(['}', ':']).next().unwrap_or(tag);

    let mut key = String::with_capacity(local.len());
    for c in local.chars() {
        if c == '_' {
            key.push('-');
        } else if c.is_ascii_uppercase() {
            if !key.is_empty() && !key.ends_with('-') {
                key.push('-');
            }
            key.push(c.to_ascii_lowercase());
        } else {
            key.push(c);
        }
    }

    match key.strip_prefix("default-") {
        Some(stripped) => stripped.to_string(),
        None => key,
    }
}

/// `subject predicate {ns}codelist/{list}/{code}`, if there is a code.
fn code_link(
    ctx: &ActivityContext,
    out: &mut Emitter,
    subject: &NamedNode,
    predicate: &str,
    list: &str,
    code: Option<&Code>,
) -> Result<(), MapError> {
    if let Some(code) = code {
        out.emit(subject, ctx.iri(predicate)?, ctx.codelist(list, code)?);
    }
    Ok(())
}

/// `subject rdfs:label "text"@lang`, if the node has text.
fn label(
    ctx: &ActivityContext,
    out: &mut Emitter,
    subject: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    if let Some(text) = ctx.lang_literal(node)? {
        out.emit(subject, rdfs::LABEL, text);
    }
    Ok(())
}

/// A `description` node below `parent`, identified by its text alone; the
/// language tag does not take part in the identity.
fn description_node(
    ctx: &ActivityContext,
    out: &mut Emitter,
    parent: &NamedNode,
    predicate: &str,
    node: Node,
) -> Result<(), MapError> {
    let Some(text) = ctx.lang_literal(node)? else {
        return Ok(());
    };
    let Some(id) = identity::derive(&[node.text_value().as_deref()], None) else {
        return Ok(());
    };

    let description = ctx.nested(parent, "description", &id)?;
    out.emit(parent, ctx.iri(predicate)?, description.clone());
    out.emit(&description, rdf::TYPE, ctx.iri("description")?);
    out.emit(&description, ctx.iri("description-text")?, text);
    code_link(
        ctx,
        out,
        &description,
        "description-type",
        "DescriptionType",
        node.attr_code("type").as_ref(),
    )
}

/// The hashable fields of a `period-start` / `period-end` pair, in order:
/// start date, start text, end date, end text.
fn period_fields(start: Option<Node>, end: Option<Node>) -> [Option<String>; 4] {
    [
        start.and_then(|n| n.attr_value("iso-date")),
        start.and_then(|n| n.text_value()),
        end.and_then(|n| n.attr_value("iso-date")),
        end.and_then(|n| n.text_value()),
    ]
}

/// `start-date`, `start-date-text`, `end-date` and `end-date-text`.
fn period(
    ctx: &ActivityContext,
    out: &mut Emitter,
    subject: &NamedNode,
    start: Option<Node>,
    end: Option<Node>,
) -> Result<(), MapError> {
    let bounds = [
        (start, "start-date", "start-date-text"),
        (end, "end-date", "end-date-text"),
    ];

    for (node, date_predicate, text_predicate) in bounds {
        let Some(node) = node else {
            continue;
        };

        if let Some(date) = node.attr_value("iso-date") {
            out.literal(subject, ctx.iri(date_predicate)?, &date);
        }
        if let Some(text) = ctx.lang_literal(node)? {
            out.emit(subject, ctx.iri(text_predicate)?, text);
        }
    }

    Ok(())
}

/// `value`, `value-currency` (falling back to the activity default currency)
/// and `value-date` of a `<value>` child.
fn value(
    ctx: &ActivityContext,
    out: &mut Emitter,
    subject: &NamedNode,
    value: Option<Node>,
) -> Result<(), MapError> {
    let Some(value) = value else {
        return Ok(());
    };
    let Some(amount) = value.text_value() else {
        return Ok(());
    };

    out.literal(subject, ctx.iri("value")?, &amount);

    let currency = value.attr_code("currency");
    code_link(
        ctx,
        out,
        subject,
        "value-currency",
        "Currency",
        currency.as_ref().or(ctx.defaults().currency.as_ref()),
    )?;

    if let Some(date) = value.attr_value("value-date") {
        out.literal(subject, ctx.iri("value-date")?, &date);
    }

    Ok(())
}
