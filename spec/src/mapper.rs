//! Form-to-graph mapping.
//!
//! [`build_graph`] turns a validated [`FormInput`] into the ordered node
//! list of one monitoring record. The node order is fixed:
//!
//! ```text
//! System, Protocol?, Hardware, Software, Supplier,
//! NeedsSequence, Dimensions, Enclosure, Animal,
//! BehaviorAndPhysiology, CircadianRhythm,
//! TimeInterval, Start?, End?, LimitedInteractionWithHumans,
//! Sensor*, Actuator*, ContactPoint?, DataProduct?
//! ```
//!
//! Every reference emitted here targets a node emitted in the same call,
//! so a built graph never has dangling references.

use crate::form::{format_timestamp, Entity, FormInput};
use crate::iri::{IriBuilder, Suffix};
use crate::model::{Graph, GraphNode, NodeType, PropertyValue};
use crate::vocabulary::INGESTED_AT;

fn node(id: String, node_type: NodeType, label: &str) -> GraphNode {
    GraphNode::new(id, node_type).with_label(label)
}

fn reference(id: &str) -> PropertyValue {
    PropertyValue::Ref(id.to_owned())
}

fn number(value: Option<f64>) -> Option<PropertyValue> {
    value.map(PropertyValue::Number)
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Builds the record graph for one form submission.
///
/// The input is expected to have passed [`FormInput::validate`]; the
/// mapper does not re-check required fields.
#[must_use]
pub fn build_graph(form: &FormInput) -> Graph {
    let iris = IriBuilder::new(&form.base_iri);

    let system = iris.id(&form.system.id);
    let hardware = iris.id(&form.hardware.id);
    let software = iris.id(&form.software.id);
    let supplier = iris.id(&form.supplier.id);
    let protocol = non_empty(&form.protocol.id).map(|id| iris.id(id));
    let enclosure = iris.id(&form.enclosure.id);
    let needs = iris.suffixed(&form.enclosure.id, Suffix::Needs);
    let dimensions = iris.suffixed(&form.enclosure.id, Suffix::Dimensions);
    let animal = iris.id(&form.animal.id);
    let behavior = iris.id(&form.behavior.id);
    let circadian = iris.suffixed(&form.behavior.id, Suffix::CircadianRhythm);
    let interval = iris.id(&form.interval.id);
    let limited = iris.suffixed(&form.interval.id, Suffix::LimitedInteraction);
    let start = form
        .session
        .start
        .map(|t| (iris.suffixed(&form.interval.id, Suffix::Start), t));
    let end = form
        .session
        .end
        .map(|t| (iris.suffixed(&form.interval.id, Suffix::End), t));
    let contact = non_empty(&form.operator_contact)
        .map(|label| (iris.suffixed(&form.system.id, Suffix::Contact), label));
    let data_products = non_empty(&form.data_product_links)
        .map(|label| (iris.suffixed(&form.system.id, Suffix::DataProducts), label));

    let entity_ids = |entities: &[Entity]| -> Vec<String> {
        entities.iter().map(|e| iris.id(&e.id)).collect()
    };

    let mut nodes = Vec::new();

    nodes.push(
        node(system, NodeType::System, &form.system.label)
            .with("hasEnclosure", reference(&enclosure))
            .with("hasHardware", reference(&hardware))
            .with("hasSoftware", reference(&software))
            .with("producedBy", reference(&supplier))
            .with("collectsInfoOn", reference(&animal))
            .with_opt("followsProtocol", protocol.as_deref().map(reference))
            .with("hasSensor", PropertyValue::Refs(entity_ids(&form.sensors)))
            .with("hasActuator", PropertyValue::Refs(entity_ids(&form.actuators)))
            .with_opt(
                INGESTED_AT,
                form.ingested_at
                    .map(|t| PropertyValue::DateTime(format_timestamp(&t))),
            ),
    );

    if let Some(protocol) = &protocol {
        nodes.push(
            node(protocol.clone(), NodeType::Protocol, &form.protocol.label).with(
                "protocolReference",
                PropertyValue::Text(form.protocol.id.clone()),
            ),
        );
    }

    nodes.push(
        node(hardware, NodeType::Hardware, &form.hardware.label)
            .with("communicatesWith", reference(&software)),
    );
    nodes.push(node(software, NodeType::Software, &form.software.label));
    nodes.push(
        node(supplier, NodeType::Supplier, &form.supplier.label)
            .with_opt("hasProperty", contact.as_ref().map(|(id, _)| reference(id))),
    );

    let flags = form.needs;
    nodes.push(
        GraphNode::new(needs.clone(), NodeType::NeedsSequence)
            .with("hasFood", PropertyValue::Bool(flags.food))
            .with("hasWater", PropertyValue::Bool(flags.water))
            .with("hasSocialContacts", PropertyValue::Bool(flags.social))
            .with("hasSafetyFromThreat", PropertyValue::Bool(flags.safety))
            .with(
                "hasEnvironmentalEnrichment",
                PropertyValue::Bool(flags.enrichment),
            ),
    );

    let dims = &form.dimensions;
    nodes.push(
        GraphNode::new(dimensions.clone(), NodeType::Dimensions)
            .with_opt("width", number(dims.width))
            .with_opt("length", number(dims.length))
            .with_opt("height", number(dims.height))
            .with_opt(
                "unit",
                non_empty(&dims.unit).map(|u| PropertyValue::Text(u.to_owned())),
            ),
    );

    nodes.push(
        node(enclosure.clone(), NodeType::Enclosure, &form.enclosure.label)
            .with("provides", reference(&needs))
            .with("hasDimensions", reference(&dimensions))
            .with_opt(
                "hasProperty",
                data_products.as_ref().map(|(id, _)| reference(id)),
            ),
    );

    nodes.push(
        node(animal, NodeType::Animal, &form.animal.label)
            .with("livesIn", reference(&enclosure))
            .with("requiresToThrive", reference(&needs))
            .with("displays", reference(&behavior)),
    );

    nodes.push(
        node(behavior.clone(), NodeType::BehaviorAndPhysiology, &form.behavior.label)
            .with("isDisplayedInside", reference(&enclosure))
            .with("hasCircadianRhythm", reference(&circadian))
            .with("extendsEnoughToCapture", reference(&interval)),
    );
    nodes.push(node(circadian, NodeType::CircadianRhythm, &form.circadian_label));

    nodes.push(
        node(interval, NodeType::TimeInterval, &form.interval.label)
            .with_opt("durationHours", number(form.duration_hours))
            .with("isExtendable", PropertyValue::Bool(form.is_extendable))
            .with("hasProperty", reference(&limited))
            .with_opt("hasBeginning", start.as_ref().map(|(id, _)| reference(id)))
            .with_opt("hasEnd", end.as_ref().map(|(id, _)| reference(id))),
    );
    for (id, instant) in [start, end].into_iter().flatten() {
        nodes.push(GraphNode::new(id, NodeType::TimeInstant).with(
            "inXSDDateTime",
            PropertyValue::DateTime(format_timestamp(&instant)),
        ));
    }
    nodes.push(node(
        limited,
        NodeType::LimitedInteractionWithHumans,
        &form.limited_interaction_label,
    ));

    for sensor in &form.sensors {
        nodes.push(
            node(iris.id(&sensor.id), NodeType::Sensor, &sensor.label)
                .with("captures", reference(&behavior)),
        );
    }
    for actuator in &form.actuators {
        nodes.push(
            node(iris.id(&actuator.id), NodeType::Actuator, &actuator.label)
                .with("elicits", reference(&behavior)),
        );
    }

    if let Some((id, label)) = contact {
        nodes.push(node(id, NodeType::ContactPoint, label));
    }
    if let Some((id, label)) = data_products {
        nodes.push(node(id, NodeType::DataProduct, label));
    }

    Graph {
        base: iris.base().to_owned(),
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(overrides: serde_json::Value) -> FormInput {
        let mut raw = json!({
            "baseIri": "https://ex.org/id",
            "systemId": "sys", "hardwareId": "hw", "softwareId": "sw",
            "supplierId": "sup", "enclosureId": "enc", "animalId": "a",
            "behaviorId": "b", "intervalId": "ti",
            "sessionStart": "2025-09-20T20:00:00Z", "sessionEnd": "2025-09-21T20:00:00Z",
            "sensors": [{ "id": "s1" }, { "id": "s2" }],
            "actuators": [{ "id": "x1" }]
        });
        if let (Some(target), Some(extra)) = (raw.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(raw).expect("form deserializes")
    }

    #[test]
    fn exactly_one_system_with_ordered_sensor_edges() {
        let graph = build_graph(&form(json!({})));
        let systems: Vec<_> = graph.nodes_of_type(NodeType::System).collect();
        assert_eq!(systems.len(), 1);
        assert_eq!(
            systems[0].property("hasSensor"),
            Some(&PropertyValue::Refs(vec![
                "https://ex.org/id/s1".to_owned(),
                "https://ex.org/id/s2".to_owned(),
            ]))
        );
        assert_eq!(graph.nodes_of_type(NodeType::Sensor).count(), 2);
        assert_eq!(graph.nodes_of_type(NodeType::Actuator).count(), 1);
    }

    #[test]
    fn no_dangling_references() {
        let graph = build_graph(&form(json!({
            "protocolId": "P", "operatorContact": "ops@example.org",
            "dataProductLinks": "https://data.example.org"
        })));
        assert!(graph.dangling_references().is_empty());
        assert!(graph.find("https://ex.org/id/sys_Contact").is_some());
        assert!(graph.find("https://ex.org/id/sys_DataProducts").is_some());
    }

    #[test]
    fn protocol_is_optional() {
        let graph = build_graph(&form(json!({})));
        assert_eq!(graph.nodes_of_type(NodeType::Protocol).count(), 0);
        assert!(!graph.has_property("followsProtocol"));
    }

    #[test]
    fn blank_numbers_are_omitted() {
        let graph = build_graph(&form(json!({ "width": "", "length": "x", "height": "20" })));
        let dims = graph
            .find("https://ex.org/id/enc_Dims")
            .expect("dimensions node");
        assert!(dims.property("width").is_none());
        assert!(dims.property("length").is_none());
        assert_eq!(dims.property("height"), Some(&PropertyValue::Number(20.0)));
        assert!(dims.property("unit").is_none());
        assert!(!graph.has_property("durationHours"));
    }

    #[test]
    fn instants_follow_interval() {
        let graph = build_graph(&form(json!({})));
        let types: Vec<NodeType> = graph.nodes.iter().map(|n| n.node_type).collect();
        let interval = types
            .iter()
            .position(|t| *t == NodeType::TimeInterval)
            .expect("interval");
        assert_eq!(types[interval + 1], NodeType::TimeInstant);
        assert_eq!(types[interval + 2], NodeType::TimeInstant);
        assert_eq!(types[interval + 3], NodeType::LimitedInteractionWithHumans);
        let start = graph.find("https://ex.org/id/ti_Start").expect("start");
        assert_eq!(
            start.property("inXSDDateTime"),
            Some(&PropertyValue::DateTime("2025-09-20T20:00:00.000Z".to_owned()))
        );
    }

    #[test]
    fn missing_session_bounds_skip_instants() {
        let graph = build_graph(&form(json!({ "sessionStart": "", "sessionEnd": null })));
        assert_eq!(graph.nodes_of_type(NodeType::TimeInstant).count(), 0);
        assert!(!graph.has_property("hasBeginning"));
        assert!(graph.dangling_references().is_empty());
    }
}
