//! Serializers for record graphs.
//!
//! Only JSON-LD is produced here ([`jsonld`]). Turtle output is derived
//! from the JSON-LD document by the RDF toolkit in `hcmo-conformance`.

pub mod jsonld;
