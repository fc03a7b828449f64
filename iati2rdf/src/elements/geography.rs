use oxrdf::NamedNode;
use oxrdf::vocab::rdf;
use roxmltree::Node;

use super::{code_link, description_node, label};
use crate::accessor::ElementExt;
use crate::context::ActivityContext;
use crate::emit::Emitter;
use crate::identity::{self, ContentHasher, NodeId, escape};
use crate::{MapError, owl_vocab};

const GEONAMES: &str = "GEO";

pub(super) fn recipient_country(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    recipient(ctx, node, out, "country", "Country")
}

pub(super) fn recipient_region(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    recipient(ctx, node, out, "region", "Region")
}

fn recipient(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
    class: &str,
    list: &str,
) -> Result<(), MapError> {
    let Some(code) = node.attr_code("code") else {
        return Ok(());
    };

    let entity = format!("recipient-{class}");
    let recipient = ctx.entity(&entity, &NodeId::from(code.clone()))?;
    out.emit(ctx.activity(), ctx.iri(&format!("activity-{entity}"))?, recipient.clone());
    out.emit(&recipient, rdf::TYPE, ctx.iri(class)?);
    code_link(ctx, out, &recipient, &format!("{class}-code"), list, Some(&code))?;
    label(ctx, out, &recipient, node)?;

    if let Some(percentage) = node.attr_value("percentage") {
        out.literal(&recipient, ctx.iri("percentage")?, &percentage);
    }

    Ok(())
}

/// A location is identified by, in order: name, first description,
/// administrative text, gazetteer entry text, administrative country, adm1,
/// adm2, latitude and longitude.
pub(super) fn location(
    ctx: &ActivityContext,
    node: Node,
    out: &mut Emitter,
) -> Result<(), MapError> {
    let name = node.child("name");
    let administrative = node.child("administrative");
    let coordinates = node.child("coordinates");
    let gazetteer_entry = node.child("gazetteer-entry");

    let mut hasher = ContentHasher::new();
    hasher
        .field(node.child_text("name").as_deref())
        .field(node.child_text("description").as_deref())
        .field(node.child_text("administrative").as_deref())
        .field(node.child_text("gazetteer-entry").as_deref());
    for key in ["country", "adm1", "adm2"] {
        hasher.field(administrative.and_then(|n| n.attr_value(key)).as_deref());
    }
    for key in ["latitude", "longitude"] {
        hasher.field(coordinates.and_then(|n| n.attr_value(key)).as_deref());
    }
    let Some(id) = hasher.finish() else {
        return Ok(());
    };

    let location = ctx.entity("location", &id)?;
    out.emit(ctx.activity(), ctx.iri("activity-location")?, location.clone());
    out.emit(&location, rdf::TYPE, ctx.iri("location")?);

    if let Some(name) = name {
        label(ctx, out, &location, name)?;
    }

    for description in node.children_named("description") {
        description_node(ctx, out, &location, "location-description", description)?;
    }

    let location_type = node.child("location-type").and_then(|n| n.attr_code("code"));
    code_link(ctx, out, &location, "location-type", "LocationType", location_type.as_ref())?;

    if let Some(administrative) = administrative {
        administrative_area(ctx, out, &location, administrative)?;
    }

    if let Some(coordinates) = coordinates {
        for key in ["latitude", "longitude"] {
            if let Some(value) = coordinates.attr_value(key) {
                out.literal(&location, ctx.iri(key)?, &value);
            }
        }
        code_link(
            ctx,
            out,
            &location,
            "coordinates-precision",
            "GeographicalPrecision",
            coordinates.attr_code("precision").as_ref(),
        )?;
    }

    if let Some(gazetteer_entry) = gazetteer_entry {
        gazetteer(ctx, out, &location, gazetteer_entry)?;
    }

    Ok(())
}

fn administrative_area(
    ctx: &ActivityContext,
    out: &mut Emitter,
    location: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    let country = node.attr_code("country");
    let adm1 = node.attr_value("adm1");
    let adm2 = node.attr_value("adm2");
    let text = node.text_value();

    let Some(id) = identity::derive(
        &[
            text.as_deref(),
            node.attr_value("country").as_deref(),
            adm1.as_deref(),
            adm2.as_deref(),
        ],
        None,
    ) else {
        return Ok(());
    };

    let area = ctx.nested(location, "administrative", &id)?;
    out.emit(location, ctx.iri("location-administrative")?, area.clone());
    code_link(ctx, out, &area, "administrative-country", "Country", country.as_ref())?;

    if let Some(adm1) = &adm1 {
        out.literal(&area, ctx.iri("administrative-adm1")?, adm1);
    }
    if let Some(adm2) = &adm2 {
        out.literal(&area, ctx.iri("administrative-adm2")?, adm2);
    }
    if let Some(text) = ctx.lang_literal(node)? {
        out.emit(&area, ctx.iri("administrative-country-text")?, text);
    }

    Ok(())
}

/// Needs both a `gazetteer-ref` and an entry. GeoNames entries (`GEO`) also
/// link the location to the GeoNames resource.
fn gazetteer(
    ctx: &ActivityContext,
    out: &mut Emitter,
    location: &NamedNode,
    node: Node,
) -> Result<(), MapError> {
    let (Some(reference), Some(entry)) = (node.attr_code("gazetteer-ref"), node.text_value())
    else {
        return Ok(());
    };

    let gazetteer = ctx.nested(location, "gazetteer-entry", &NodeId::from(reference.clone()))?;
    out.emit(location, ctx.iri("location-gazetteer-entry")?, gazetteer.clone());
    out.emit(&gazetteer, rdf::TYPE, ctx.iri("gazetteer-entry")?);
    code_link(ctx, out, &gazetteer, "gazetteer-ref", "GazetteerAgency", Some(&reference))?;
    out.literal(&gazetteer, ctx.iri("gazetteer-entry")?, &entry);

    if reference.as_str() == GEONAMES {
        let geonames = NamedNode::new(format!(
            "{}{}",
            ctx.config().geonames_base(),
            escape(&entry)
        ))?;
        out.emit(location, owl_vocab::SAME_AS, geonames);
    }

    Ok(())
}
