//! Structural JSON-LD document validator.
//!
//! Checks an HCMO record document before it is converted or exported:
//! - Has `@context`
//! - Has an `@graph` array whose nodes all carry an absolute `@id`
//! - Exactly one `System` node; node types and property keys are known
//! - Every `{"@id": ...}` reference resolves inside the graph or to a
//!   well-known external vocabulary

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use sophia_iri::Iri;

use hcmo_ontology::vocabulary::{is_external_term, is_known_term};
use hcmo_ontology::NodeType;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "document/jsonld";

/// Validates a JSON-LD document file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON.
pub fn validate_file(path: &Path) -> Result<ConformanceReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
    Ok(validate(&value))
}

/// Validates an in-memory JSON-LD document.
#[must_use]
pub fn validate(document: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    if document.get("@context").is_some() {
        report.push(TestResult::pass(VALIDATOR, "@context present"));
    } else {
        report.push(TestResult::fail(VALIDATOR, "Document missing @context"));
    }

    let Some(graph) = document.get("@graph").and_then(Value::as_array) else {
        report.push(TestResult::fail(VALIDATOR, "Document missing @graph array"));
        return report;
    };
    report.push(TestResult::pass(
        VALIDATOR,
        format!("@graph array present with {} nodes", graph.len()),
    ));

    check_ids(graph, &mut report);
    check_types(graph, &mut report);
    check_properties(graph, &mut report);
    check_references(graph, &mut report);
    report
}

fn node_id(node: &Value) -> Option<&str> {
    node.get("@id").and_then(Value::as_str)
}

fn check_ids(graph: &[Value], report: &mut ConformanceReport) {
    let missing = graph.iter().filter(|n| node_id(n).is_none()).count();
    if missing == 0 {
        report.push(TestResult::pass(VALIDATOR, "All @graph nodes have @id"));
    } else {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("{missing} nodes in @graph are missing @id"),
        ));
    }

    let relative: Vec<String> = graph
        .iter()
        .filter_map(node_id)
        .filter(|id| Iri::new(*id).is_err())
        .map(str::to_owned)
        .collect();
    if relative.is_empty() {
        report.push(TestResult::pass(VALIDATOR, "All @id values are absolute IRIs"));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Non-absolute @id values found",
            relative,
        ));
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = graph
        .iter()
        .filter_map(node_id)
        .filter(|id| !seen.insert(*id))
        .map(str::to_owned)
        .collect();
    if !duplicates.is_empty() {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Duplicate @id values found",
            duplicates,
        ));
    }
}

fn check_types(graph: &[Value], report: &mut ConformanceReport) {
    let types: Vec<Option<NodeType>> = graph
        .iter()
        .map(|n| n.get("@type").and_then(Value::as_str).and_then(NodeType::from_type_str))
        .collect();

    let systems = types.iter().filter(|t| **t == Some(NodeType::System)).count();
    if systems == 1 {
        report.push(TestResult::pass(VALIDATOR, "Exactly one System node"));
    } else {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("Expected exactly one System node, found {systems}"),
        ));
    }

    let unknown: Vec<String> = graph
        .iter()
        .zip(&types)
        .filter(|(_, t)| t.is_none())
        .map(|(n, _)| node_id(n).unwrap_or("<no @id>").to_owned())
        .collect();
    if unknown.is_empty() {
        report.push(TestResult::pass(VALIDATOR, "All node types are HCM types"));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Nodes with missing or unknown @type",
            unknown,
        ));
    }
}

fn check_properties(graph: &[Value], report: &mut ConformanceReport) {
    let mut unknown: Vec<String> = graph
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|node| node.keys())
        .filter(|key| !key.starts_with('@') && !is_known_term(key))
        .cloned()
        .collect();
    unknown.sort();
    unknown.dedup();
    if unknown.is_empty() {
        report.push(TestResult::pass(VALIDATOR, "All property keys are context terms"));
    } else {
        report.push(TestResult {
            details: unknown,
            ..TestResult::warn(VALIDATOR, "Property keys not declared in @context")
        });
    }
}

/// Collects `{"@id": ...}` targets from a property value.
fn references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) if map.len() == 1 => {
            if let Some(id) = map.get("@id").and_then(Value::as_str) {
                out.push(id.to_owned());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| references(v, out)),
        _ => {}
    }
}

fn check_references(graph: &[Value], report: &mut ConformanceReport) {
    let ids: HashSet<&str> = graph.iter().filter_map(node_id).collect();
    let mut dangling = Vec::new();
    for node in graph.iter().filter_map(Value::as_object) {
        let from = node.get("@id").and_then(Value::as_str).unwrap_or("<no @id>");
        for (key, value) in node.iter().filter(|(k, _)| !k.starts_with('@')) {
            let mut targets = Vec::new();
            references(value, &mut targets);
            dangling.extend(
                targets
                    .into_iter()
                    .filter(|t| !ids.contains(t.as_str()) && !is_external_term(t))
                    .map(|t| format!("{from} {key} -> {t}")),
            );
        }
    }
    if dangling.is_empty() {
        report.push(TestResult::pass(VALIDATOR, "All references resolve"));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Dangling references found",
            dangling,
        ));
    }
}
