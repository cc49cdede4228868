//! Golden mapping test: the documented sample form must reproduce the
//! documented sample record exactly.

use hcmo_ontology::model::NodeType;
use hcmo_ontology::serializer::jsonld::to_json_ld;
use hcmo_ontology::{build_document, build_graph, FormInput};
use serde_json::Value;

const SAMPLE_FORM: &str = include_str!("fixtures/sample_form.json");
const SAMPLE_GRAPH: &str = include_str!("fixtures/sample_graph.jsonld");

fn sample_form() -> FormInput {
    serde_json::from_str(SAMPLE_FORM).expect("sample form parses")
}

#[test]
fn sample_form_reproduces_sample_graph() {
    let expected: Value = serde_json::from_str(SAMPLE_GRAPH).expect("sample graph parses");
    let actual = build_document(&sample_form()).expect("sample form is valid");
    assert_eq!(actual["@context"], expected["@context"]);
    let actual_nodes = actual["@graph"].as_array().expect("@graph array");
    let expected_nodes = expected["@graph"].as_array().expect("@graph array");
    assert_eq!(actual_nodes.len(), expected_nodes.len());
    for (a, e) in actual_nodes.iter().zip(expected_nodes) {
        assert_eq!(a, e, "node {} differs", e["@id"]);
    }
}

#[test]
fn sample_graph_serializes_integers() {
    let text = serde_json::to_string(&build_document(&sample_form()).expect("valid"))
        .expect("serializes");
    assert!(text.contains("\"width\":30,"));
    assert!(text.contains("\"durationHours\":24,"));
}

#[test]
fn sample_graph_is_closed() {
    let graph = build_graph(&sample_form());
    assert!(graph.dangling_references().is_empty());
    assert_eq!(graph.nodes_of_type(NodeType::System).count(), 1);
    assert_eq!(graph.base, "https://mfg.example.com/hcm/id/");
}

#[test]
fn contact_and_data_products_are_appended() {
    let mut form = sample_form();
    form.operator_contact = "ops@acme.example".to_owned();
    form.data_product_links = "https://data.acme.example/hcmo".to_owned();
    let doc = to_json_ld(&build_graph(&form));
    let nodes = doc["@graph"].as_array().expect("@graph array");
    let tail: Vec<&str> = nodes[nodes.len() - 2..]
        .iter()
        .filter_map(|n| n["@type"].as_str())
        .collect();
    assert_eq!(tail, ["ContactPoint", "DataProduct"]);
    let supplier = nodes
        .iter()
        .find(|n| n["@type"] == "Supplier")
        .expect("supplier node");
    assert_eq!(
        supplier["hasProperty"]["@id"],
        "https://mfg.example.com/hcm/id/hcmo-system-001_Contact"
    );
}
