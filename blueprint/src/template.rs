//! Blank metadata templates generated from an inventory.

use serde_json::{Map, Value};

use hcmo_ontology::vocabulary::iris::HCMO_CONTEXT;

use crate::model::Inventory;

/// Header row of the CSV template.
pub const CSV_HEADER: &str = "domain,field,value,notes";

/// Builds `{"@context": ..., "metadata": {group: {field: ""}}}`.
#[must_use]
pub fn to_json_ld_template(inventory: &Inventory) -> Value {
    let metadata: Map<String, Value> = inventory
        .groups
        .iter()
        .map(|group| {
            let fields: Map<String, Value> = group
                .fields
                .iter()
                .map(|f| (f.id.clone(), Value::String(String::new())))
                .collect();
            (group.id.clone(), Value::Object(fields))
        })
        .collect();
    let mut doc = Map::new();
    doc.insert("@context".to_owned(), Value::String(HCMO_CONTEXT.to_owned()));
    doc.insert("metadata".to_owned(), Value::Object(metadata));
    Value::Object(doc)
}

/// Builds the CSV template: one row per field with an empty value and a
/// `"<classification> | <ontology iri>"` note.
#[must_use]
pub fn to_csv_template(inventory: &Inventory) -> String {
    let mut out = String::from(CSV_HEADER);
    for field in inventory.fields() {
        let note = format!("{} | {}", field.classification, field.ontology_iri).replace('"', "'");
        out.push('\n');
        out.push_str(&format!(
            "{},{},,{}",
            field.group_id,
            field.id,
            quote(&note)
        ));
    }
    out
}

fn quote(cell: &str) -> String {
    if cell.contains(',') || cell.contains('\n') {
        format!("\"{cell}\"")
    } else {
        cell.to_owned()
    }
}
