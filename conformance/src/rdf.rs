//! JSON-LD to Turtle conversion.
//!
//! [`RdfConverter`] is the seam the exporter converts through.
//! [`SophiaConverter`] expands the document with `sophia_jsonld`, keeps the
//! default-graph triples and writes them with the pretty `sophia_turtle`
//! serializer under the HCM prefixes.
//!
//! The pretty writer prints any `xsd:decimal` literal whose lexical form it
//! takes for a decimal as a bare number, including integral ones such as
//! `"20"`. Bare `20` reads back as `xsd:integer`, so integral decimals are
//! written as `20.0` first.

use serde_json::Value;
use sophia_api::parser::QuadParser;
use sophia_api::prefix::Prefix;
use sophia_api::quad::Spog;
use sophia_api::serializer::{Stringifier, TripleSerializer};
use sophia_api::source::QuadSource;
use sophia_api::term::SimpleTerm;
use sophia_api::MownStr;
use sophia_iri::Iri;
use sophia_jsonld::JsonLdParser;
use sophia_turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};

use hcmo_ontology::vocabulary::iris;

use crate::error::ExportError;

/// Converts a JSON-LD document to Turtle text.
pub trait RdfConverter: Send + Sync {
    /// Converts `document`. Blocking; callers on an async runtime should
    /// run it on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Conversion`] if the document is not valid
    /// JSON-LD and [`ExportError::Serialization`] if Turtle output fails.
    fn to_turtle(&self, document: &Value) -> Result<String, ExportError>;
}

/// [`RdfConverter`] backed by the sophia toolkit.
#[derive(Debug, Clone)]
pub struct SophiaConverter {
    prefixes: Vec<(String, String)>,
}

impl Default for SophiaConverter {
    fn default() -> Self {
        let prefixes = [
            ("hcm", iris::HCM),
            ("time", iris::TIME),
            ("xsd", iris::XSD),
            ("rdf", iris::RDF),
            ("rdfs", iris::RDFS),
        ];
        Self {
            prefixes: prefixes
                .iter()
                .map(|(p, ns)| ((*p).to_owned(), (*ns).to_owned()))
                .collect(),
        }
    }
}

impl SophiaConverter {
    /// Adds or replaces a prefix used when writing Turtle.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.retain(|(p, _)| p != prefix);
        self.prefixes.push((prefix.to_owned(), namespace.to_owned()));
        self
    }

    fn prefix_map(&self) -> Result<Vec<(Prefix<Box<str>>, Iri<Box<str>>)>, ExportError> {
        self.prefixes
            .iter()
            .map(|(p, ns)| {
                let prefix = Prefix::new(Box::from(p.as_str()))
                    .map_err(|e| ExportError::Serialization(e.to_string()))?;
                let iri = Iri::new(Box::from(ns.as_str()))
                    .map_err(|e| ExportError::Serialization(e.to_string()))?;
                Ok((prefix, iri))
            })
            .collect()
    }
}

impl RdfConverter for SophiaConverter {
    fn to_turtle(&self, document: &Value) -> Result<String, ExportError> {
        let text = serde_json::to_string(document)?;
        let quads: Vec<Spog<SimpleTerm<'static>>> = JsonLdParser::new()
            .parse_str(&text)
            .collect_quads()
            .map_err(|e| ExportError::Conversion(e.to_string()))?;
        let triples: Vec<[SimpleTerm<'static>; 3]> = quads
            .into_iter()
            .filter(|(_, graph)| graph.is_none())
            .map(|([s, p, o], _)| [s, p, keep_decimal(o)])
            .collect();
        tracing::debug!(triples = triples.len(), "converted JSON-LD to RDF");

        let config = TurtleConfig::new()
            .with_pretty(true)
            .with_own_prefix_map(self.prefix_map()?);
        let mut stringifier = TurtleSerializer::new_stringifier_with_config(config);
        stringifier
            .serialize_graph(&triples)
            .map_err(|e| ExportError::Serialization(e.to_string()))?;
        Ok(stringifier.as_str().to_owned())
    }
}

fn keep_decimal(term: SimpleTerm<'static>) -> SimpleTerm<'static> {
    match term {
        SimpleTerm::LiteralDatatype(lex, datatype)
            if datatype.as_str() == XSD_DECIMAL && is_integral(&lex) =>
        {
            SimpleTerm::LiteralDatatype(MownStr::from(format!("{lex}.0")), datatype)
        }
        other => other,
    }
}

fn is_integral(lex: &str) -> bool {
    let digits = lex.strip_prefix(['+', '-']).unwrap_or(lex);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_hcm_prefixed_turtle() {
        let document = json!({
            "@context": [{ "@vocab": iris::HCM, "hcm": iris::HCM,
                           "label": iris::RDFS_LABEL,
                           "hasSensor": { "@id": "hcm:hasSensor", "@type": "@id" } }],
            "@graph": [
                { "@id": "https://ex.org/id/sys", "@type": "System", "label": "Rig",
                  "hasSensor": [{ "@id": "https://ex.org/id/s1" }] },
                { "@id": "https://ex.org/id/s1", "@type": "Sensor" }
            ]
        });
        let turtle = SophiaConverter::default()
            .to_turtle(&document)
            .expect("converts");
        assert!(turtle.contains("hcm:System"), "{turtle}");
        assert!(turtle.contains("hcm:hasSensor"), "{turtle}");
        assert!(turtle.contains("\"Rig\""), "{turtle}");
        assert!(turtle.contains("<https://ex.org/id/s1>"), "{turtle}");
    }

    #[test]
    fn integral_decimals_keep_their_datatype() {
        use sophia_api::parser::TripleParser;
        use sophia_api::source::TripleSource;
        use sophia_api::term::Term;
        use sophia_turtle::parser::turtle::TurtleParser;

        let form: hcmo_ontology::FormInput = serde_json::from_value(json!({
            "baseIri": "https://mfg.example.com/hcm/id",
            "systemId": "sys", "hardwareId": "hw", "softwareId": "sw",
            "supplierId": "sup", "enclosureId": "enc", "animalId": "a",
            "behaviorId": "b", "intervalId": "ti",
            "width": "30", "length": "45", "height": "20", "unit": "cm",
            "durationHours": "24",
            "sessionStart": "2025-09-20T20:00", "sessionEnd": "2025-09-21T20:00",
            "sensors": [{ "id": "s1" }], "actuators": [{ "id": "x1" }]
        }))
        .expect("form parses");
        let document = hcmo_ontology::build_document(&form).expect("document builds");
        let text = SophiaConverter::default()
            .to_turtle(&document)
            .expect("converts");

        let triples: Vec<[SimpleTerm<'static>; 3]> = TurtleParser { base: None }
            .parse_str(&text)
            .collect_triples()
            .expect("output parses as Turtle");
        for property in ["height", "width", "durationHours"] {
            let predicate = format!("{}{property}", iris::HCM);
            let [_, _, object] = triples
                .iter()
                .find(|[_, p, _]| p.iri().is_some_and(|i| i.as_str() == predicate))
                .expect("decimal property present");
            assert_eq!(
                object.datatype().map(|d| d.as_str().to_owned()).as_deref(),
                Some(XSD_DECIMAL),
                "{property} in {text}"
            );
        }
    }

    #[test]
    fn only_integral_lexical_forms_are_padded() {
        assert!(is_integral("20"));
        assert!(is_integral("-5"));
        assert!(!is_integral("22.5"));
        assert!(!is_integral(""));
        assert!(!is_integral("1e5"));
    }

    #[test]
    fn non_decimal_literals_are_untouched() {
        let label = SimpleTerm::LiteralDatatype(
            MownStr::from("20"),
            sophia_iri::IriRef::new_unchecked(MownStr::from(
                "http://www.w3.org/2001/XMLSchema#string",
            )),
        );
        assert_eq!(keep_decimal(label.clone()), label);
    }

    #[test]
    fn invalid_json_ld_is_a_conversion_error() {
        let document = json!({ "@context": 42, "@graph": [] });
        assert!(matches!(
            SophiaConverter::default().to_turtle(&document),
            Err(ExportError::Conversion(_))
        ));
    }
}
