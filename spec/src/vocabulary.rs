//! The HCM vocabulary and the fixed JSON-LD `@context`.
//!
//! The context term table is shared verbatim by every document this
//! workspace produces; the `@vocab` entry resolves the bare node types of
//! [`NodeType`](crate::model::NodeType) against the `hcm:` namespace.

use serde_json::{json, Map, Value};

/// Standard IRI constants.
pub mod iris {
    /// HCM ontology namespace.
    pub const HCM: &str = "https://w3id.org/hcmo/ontology/hcm#";
    /// OWL-Time namespace.
    pub const TIME: &str = "http://www.w3.org/2006/time#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// Remote context published for template documents.
    pub const HCMO_CONTEXT: &str = "https://w3id.org/hcmo/ontology/context.jsonld";
}

/// How a context term is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermDefinition {
    /// `"term": "prefix:local"`.
    Alias(&'static str),
    /// `"term": { "@id": "prefix:local" }`.
    Id(&'static str),
    /// `"term": { "@id": "prefix:local", "@type": "<datatype>" }`.
    Typed(&'static str, &'static str),
}

/// A single term of the `@context` table.
#[derive(Debug, Clone, Copy)]
pub struct ContextTerm {
    /// Term used as a JSON key in `@graph` nodes.
    pub term: &'static str,
    /// Term definition.
    pub definition: TermDefinition,
}

const fn alias(term: &'static str, iri: &'static str) -> ContextTerm {
    ContextTerm {
        term,
        definition: TermDefinition::Alias(iri),
    }
}

const fn typed(term: &'static str, iri: &'static str, datatype: &'static str) -> ContextTerm {
    ContextTerm {
        term,
        definition: TermDefinition::Typed(iri, datatype),
    }
}

/// The domain term table, in `@context` order.
pub const TERMS: &[ContextTerm] = &[
    typed("width", "hcm:width", "xsd:decimal"),
    typed("length", "hcm:length", "xsd:decimal"),
    typed("height", "hcm:height", "xsd:decimal"),
    ContextTerm {
        term: "unit",
        definition: TermDefinition::Id("hcm:unit"),
    },
    typed("durationHours", "hcm:durationHours", "xsd:decimal"),
    typed("isExtendable", "hcm:isExtendable", "xsd:boolean"),
    alias("followsProtocol", "hcm:followsProtocol"),
    alias("protocolReference", "hcm:protocolReference"),
    alias("hasEnclosure", "hcm:hasEnclosure"),
    alias("hasHardware", "hcm:hasHardware"),
    alias("hasSoftware", "hcm:hasSoftware"),
    alias("producedBy", "hcm:producedBy"),
    alias("collectsInfoOn", "hcm:collectsInfoOn"),
    alias("livesIn", "hcm:livesIn"),
    alias("requiresToThrive", "hcm:requiresToThrive"),
    alias("provides", "hcm:provides"),
    alias("displays", "hcm:displays"),
    alias("isDisplayedInside", "hcm:isDisplayedInside"),
    alias("hasCircadianRhythm", "hcm:hasCircadianRhythm"),
    alias("extendsEnoughToCapture", "hcm:extendsEnoughToCapture"),
    alias("hasProperty", "hcm:hasProperty"),
    alias("captures", "hcm:captures"),
    alias("elicits", "hcm:elicits"),
    alias("hasSensor", "hcm:hasSensor"),
    alias("hasActuator", "hcm:hasActuator"),
    alias("communicatesWith", "hcm:communicatesWith"),
    alias("hasDimensions", "hcm:hasDimensions"),
    alias("hasFood", "hcm:hasFood"),
    alias("hasWater", "hcm:hasWater"),
    alias("hasSocialContacts", "hcm:hasSocialContacts"),
    alias("hasSafetyFromThreat", "hcm:hasSafetyFromThreat"),
    alias("hasEnvironmentalEnrichment", "hcm:hasEnvironmentalEnrichment"),
    typed("hasBeginning", "time:hasBeginning", "@id"),
    typed("hasEnd", "time:hasEnd", "@id"),
    typed("inXSDDateTime", "time:inXSDDateTime", "xsd:dateTime"),
];

/// Property name of the optional ingestion timestamp on the system node.
pub const INGESTED_AT: &str = "ingestedAt";

/// Returns true if `term` is declared in the context table (or is `label`).
#[must_use]
pub fn is_known_term(term: &str) -> bool {
    term == "label" || term == INGESTED_AT || TERMS.iter().any(|t| t.term == term)
}

/// Returns true if `iri` belongs to a well-known external vocabulary that a
/// document may reference without declaring a node for it.
#[must_use]
pub fn is_external_term(iri: &str) -> bool {
    const EXTERNAL: &[&str] = &[
        iris::HCM,
        iris::TIME,
        iris::XSD,
        iris::RDF,
        iris::RDFS,
        "hcm:",
        "time:",
        "xsd:",
        "rdf:",
        "rdfs:",
    ];
    EXTERNAL.iter().any(|prefix| iri.starts_with(prefix))
}

/// Builds the shared base context object.
#[must_use]
pub fn base_context() -> Value {
    let mut ctx = Map::new();
    ctx.insert("@vocab".to_owned(), json!(iris::HCM));
    ctx.insert("hcm".to_owned(), json!(iris::HCM));
    ctx.insert("xsd".to_owned(), json!(iris::XSD));
    ctx.insert("time".to_owned(), json!(iris::TIME));
    for term in TERMS {
        let definition = match term.definition {
            TermDefinition::Alias(iri) => json!(iri),
            TermDefinition::Id(iri) => json!({ "@id": iri }),
            TermDefinition::Typed(iri, datatype) => json!({ "@id": iri, "@type": datatype }),
        };
        ctx.insert(term.term.to_owned(), definition);
    }
    Value::Object(ctx)
}

/// The `label` → `rdfs:label` context entry.
#[must_use]
pub fn label_context() -> Value {
    json!({ "label": iris::RDFS_LABEL })
}

/// The `ingestedAt` context entry, minted under the document's base.
#[must_use]
pub fn ingested_at_context(base: &str) -> Value {
    json!({ INGESTED_AT: { "@id": format!("{base}{INGESTED_AT}"), "@type": "xsd:dateTime" } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_context_declares_vocab_and_prefixes() {
        let ctx = base_context();
        assert_eq!(ctx["@vocab"], json!(iris::HCM));
        assert_eq!(ctx["time"], json!(iris::TIME));
        assert_eq!(ctx["unit"], json!({ "@id": "hcm:unit" }));
        assert_eq!(
            ctx["hasBeginning"],
            json!({ "@id": "time:hasBeginning", "@type": "@id" })
        );
        assert_eq!(ctx["hasSensor"], json!("hcm:hasSensor"));
    }

    #[test]
    fn all_terms_unique() {
        let mut seen = std::collections::HashSet::new();
        for term in TERMS {
            assert!(seen.insert(term.term), "Duplicate context term: {}", term.term);
        }
    }

    #[test]
    fn external_vocabulary_is_recognised() {
        assert!(is_external_term("http://www.w3.org/2006/time#Instant"));
        assert!(is_external_term("xsd:dateTime"));
        assert!(!is_external_term("https://mfg.example.com/hcm/id/Enc_01"));
    }
}
