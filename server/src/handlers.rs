//! Route handlers.

use axum::body::Bytes;
use axum::extract::{Json, State};
use hcmo_blueprint::{CoverageSummary, ExampleCatalog, FieldEntries};
use hcmo_conformance::ExportBundle;
use hcmo_ontology::FormInput;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::AppState;

/// Body of `POST /api/blueprint/score`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Example profile applied before the edits.
    pub example_id: Option<String>,
    /// Group → field → entry edits.
    pub fields: FieldEntries,
}

/// Absent, `null`, `false`, `0` and `""` all count as no document.
fn usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `POST /api/export`: `{ "jsonld": <document> }` → export bundle.
pub async fn export(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExportBundle>, AppError> {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let document = request
        .get("jsonld")
        .filter(|doc| usable(doc))
        .ok_or(AppError::MissingDocument)?;
    let bundle = state.exporter.export(document).await?;
    Ok(Json(bundle))
}

/// `POST /api/graph`: form fields → JSON-LD document.
pub async fn graph(Json(form): Json<FormInput>) -> Result<Json<Value>, AppError> {
    let document = hcmo_ontology::build_document(&form)?;
    tracing::debug!(
        nodes = document["@graph"].as_array().map_or(0, Vec::len),
        "built record graph"
    );
    Ok(Json(document))
}

/// `GET /api/blueprint/inventory`.
pub async fn inventory(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let blueprint = state.blueprint()?;
    let inventory = &blueprint.inventory;
    let mut body = Map::new();
    body.insert(
        inventory.kind.collection_key().to_owned(),
        serde_json::to_value(&inventory.groups)?,
    );
    body.insert(
        "statusIcons".to_owned(),
        serde_json::to_value(&blueprint.catalog.status_icons)?,
    );
    Ok(Json(Value::Object(body)))
}

/// `GET /api/blueprint/examples`.
pub async fn examples(State(state): State<AppState>) -> Result<Json<ExampleCatalog>, AppError> {
    Ok(Json(state.blueprint()?.catalog.clone()))
}

/// `POST /api/blueprint/score`.
pub async fn score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<CoverageSummary>, AppError> {
    let summary = state
        .blueprint()?
        .score_with(request.example_id.as_deref(), &request.fields)?;
    Ok(Json(summary))
}

/// `GET /healthz`.
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_documents_are_unusable() {
        for value in [json!(null), json!(false), json!(0), json!("")] {
            assert!(!usable(&value), "{value}");
        }
        for value in [json!({}), json!([]), json!("doc"), json!(1)] {
            assert!(usable(&value), "{value}");
        }
    }
}
