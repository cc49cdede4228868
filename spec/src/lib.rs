//! HCMO home-cage monitoring records as typed Rust data.
//!
//! The `hcmo-ontology` crate turns the monitoring-setup form into a
//! linked-data record: the form is normalized into a [`FormInput`],
//! validated, mapped to an ordered [`Graph`] of typed nodes, and
//! serialized as a JSON-LD document using the shared HCM `@context`.
//!
//! # Entry Point
//!
//! ```
//! let form: hcmo_ontology::FormInput = serde_json::from_value(serde_json::json!({
//!     "baseIri": "https://mfg.example.com/hcm/id",
//!     "systemId": "sys", "hardwareId": "hw", "softwareId": "sw",
//!     "supplierId": "sup", "enclosureId": "enc", "animalId": "a",
//!     "behaviorId": "b", "intervalId": "ti",
//!     "sessionStart": "2025-09-20T20:00", "sessionEnd": "2025-09-21T20:00",
//!     "sensors": [{ "id": "s1" }], "actuators": [{ "id": "x1" }]
//! })).unwrap();
//! let document = hcmo_ontology::build_document(&form).unwrap();
//! assert!(document["@graph"].is_array());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod form;
pub mod iri;
pub mod mapper;
pub mod model;
pub mod serializer;
pub mod vocabulary;

pub use form::{FormError, FormInput};
pub use mapper::build_graph;
pub use model::{Graph, GraphNode, NodeType, PropertyValue};

use serde_json::Value;

/// Validates a form and serializes its record graph as JSON-LD.
///
/// # Errors
///
/// Returns a [`FormError`] when the form misses required fields, sensors,
/// actuators, or a well-ordered session interval.
pub fn build_document(form: &FormInput) -> Result<Value, FormError> {
    form.validate()?;
    Ok(serializer::jsonld::to_json_ld(&build_graph(form)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_forms_produce_no_document() {
        let form = FormInput::default();
        assert_eq!(
            build_document(&form),
            Err(FormError::MissingField("baseIri"))
        );
    }
}
