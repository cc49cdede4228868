//! JSON-LD 1.1 serializer for record graphs.
//!
//! Produces a single document with a three-part `@context` array (the
//! shared base context, the `label` alias and, when present, the
//! `ingestedAt` term) and a `@graph` array holding the nodes in emission
//! order. Key order inside each node follows the property order of the
//! [`GraphNode`].

use serde_json::{json, Map, Number, Value};

use crate::model::{Graph, GraphNode, PropertyValue};
use crate::vocabulary::{base_context, ingested_at_context, label_context, INGESTED_AT};

/// Serializes a record graph to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(graph: &Graph) -> Value {
    let mut context = vec![base_context(), label_context()];
    if graph.has_property(INGESTED_AT) {
        context.push(ingested_at_context(&graph.base));
    }
    let nodes: Vec<Value> = graph.nodes.iter().map(node_to_json).collect();
    json!({
        "@context": context,
        "@graph": nodes
    })
}

fn node_to_json(node: &GraphNode) -> Value {
    let mut obj = Map::new();
    obj.insert("@id".to_owned(), json!(node.id));
    obj.insert("@type".to_owned(), json!(node.node_type.as_str()));
    if let Some(label) = &node.label {
        obj.insert("label".to_owned(), json!(label));
    }
    for (name, value) in &node.properties {
        obj.insert((*name).to_owned(), value_to_json(value));
    }
    Value::Object(obj)
}

fn value_to_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Text(s) => json!(s),
        PropertyValue::Number(n) => number_to_json(*n),
        PropertyValue::Bool(b) => json!(b),
        PropertyValue::DateTime(s) => json!({ "@value": s, "@type": "xsd:dateTime" }),
        PropertyValue::Ref(id) => json!({ "@id": id }),
        PropertyValue::Refs(ids) => {
            Value::Array(ids.iter().map(|id| json!({ "@id": id })).collect())
        }
    }
}

/// Integral values are written as JSON integers (`30`, not `30.0`).
fn number_to_json(n: f64) -> Value {
    // 2^53: beyond this f64 no longer represents every integer.
    const EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() < EXACT {
        #[allow(clippy::cast_possible_truncation)]
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}
