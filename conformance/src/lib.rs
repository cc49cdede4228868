//! HCMO record conformance and export.
//!
//! This crate checks and packages the JSON-LD documents produced by
//! `hcmo-ontology`.
//!
//! # Conformance Scope
//!
//! | Artifact | Check |
//! |----------|-------|
//! | JSON-LD document | `@context`, `@graph`, absolute ids, closed references ([`validators::document`]) |
//! | Turtle | JSON-LD 1.1 expansion and pretty Turtle writing ([`rdf::SophiaConverter`]) |
//! | Instance graph | SHACL shapes via `pyshacl` ([`shacl::PyShaclValidator`]) |
//! | Export archive | `export.jsonld`, `export.ttl`, `validation.txt` ([`package`]) |
//!
//! # Entry Point
//!
//! ```no_run
//! use hcmo_conformance::{Exporter, PyShaclValidator};
//!
//! # async fn run(document: serde_json::Value) -> Result<(), hcmo_conformance::ExportError> {
//! let exporter = Exporter::with_pyshacl(PyShaclValidator::new("shapes/hcm-shapes.ttl"));
//! let bundle = exporter.export(&document).await?;
//! println!("{} conforms={}", bundle.zip_filename, bundle.conforms);
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod export;
pub mod package;
pub mod rdf;
pub mod report;
pub mod shacl;
pub mod validators;

pub use error::ExportError;
pub use export::{ExportBundle, Exporter};
pub use rdf::{RdfConverter, SophiaConverter};
pub use report::{ConformanceReport, Severity, TestResult};
pub use shacl::{PyShaclValidator, ShapeReport, ShapeValidator};
