//! Export orchestration: JSON-LD → Turtle → SHACL report → ZIP bundle.

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ExportError;
use crate::package::{self, names};
use crate::rdf::{RdfConverter, SophiaConverter};
use crate::shacl::{PyShaclValidator, ShapeValidator};

/// Prefix of temporary directories and archive names.
pub const EXPORT_PREFIX: &str = "hcmo-export-";

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// True when the SHACL validator reported conformance.
    pub conforms: bool,
    /// Turtle serialization of the document.
    pub turtle: String,
    /// SHACL validation report text.
    pub validation_report: String,
    /// Base64 of the ZIP archive.
    pub zip_base64: String,
    /// Suggested archive file name.
    pub zip_filename: String,
}

/// Runs exports through a converter and a shape validator.
#[derive(Clone)]
pub struct Exporter {
    converter: Arc<dyn RdfConverter>,
    validator: Arc<dyn ShapeValidator>,
    temp_root: Option<PathBuf>,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("temp_root", &self.temp_root)
            .finish_non_exhaustive()
    }
}

impl Exporter {
    /// Exporter over the given seams.
    pub fn new(converter: Arc<dyn RdfConverter>, validator: Arc<dyn ShapeValidator>) -> Self {
        Self {
            converter,
            validator,
            temp_root: None,
        }
    }

    /// Sophia conversion plus `pyshacl` validation.
    #[must_use]
    pub fn with_pyshacl(validator: PyShaclValidator) -> Self {
        Self::new(Arc::new(SophiaConverter::default()), Arc::new(validator))
    }

    /// Creates temporary directories under `root` instead of the system
    /// temporary directory.
    #[must_use]
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Exports `document`.
    ///
    /// The temporary directory holding `export.ttl` is removed before this
    /// returns, whether the export succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if conversion, validator invocation,
    /// file I/O or packaging fails. A non-conforming graph is not an error.
    pub async fn export(&self, document: &Value) -> Result<ExportBundle, ExportError> {
        let converter = Arc::clone(&self.converter);
        let owned = document.clone();
        let turtle = tokio::task::spawn_blocking(move || converter.to_turtle(&owned))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))??;
        let jsonld = serde_json::to_string_pretty(document)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(EXPORT_PREFIX);
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(ExportError::io("Failed to create temporary directory"))?;

        let data = dir.path().join(names::TURTLE);
        tokio::fs::write(&data, &turtle)
            .await
            .map_err(ExportError::io("Failed to write Turtle data"))?;
        let shapes = self.validator.validate(&data).await?;

        let zip = package::build_zip(&[
            (names::JSONLD, jsonld.as_str()),
            (names::TURTLE, turtle.as_str()),
            (names::VALIDATION, shapes.report.as_str()),
        ])?;
        if let Err(e) = dir.close() {
            tracing::warn!(error = %e, "failed to remove export directory");
        }

        let bundle = ExportBundle {
            conforms: shapes.conforms,
            turtle,
            validation_report: shapes.report,
            zip_base64: base64::engine::general_purpose::STANDARD.encode(&zip),
            zip_filename: format!("{EXPORT_PREFIX}{}.zip", Uuid::new_v4()),
        };
        tracing::info!(
            conforms = bundle.conforms,
            archive = %bundle.zip_filename,
            bytes = zip.len(),
            "export complete"
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shacl::ShapeReport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::{Cursor, Read};
    use std::path::Path;
    use std::sync::Mutex;

    struct FixedTurtle;

    impl RdfConverter for FixedTurtle {
        fn to_turtle(&self, _document: &Value) -> Result<String, ExportError> {
            Ok("<https://ex.org/a> a <https://ex.org/B> .\n".to_owned())
        }
    }

    struct FailingConverter;

    impl RdfConverter for FailingConverter {
        fn to_turtle(&self, _document: &Value) -> Result<String, ExportError> {
            Err(ExportError::Conversion("bad document".to_owned()))
        }
    }

    /// Records the data path and file contents it was given.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Option<(PathBuf, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl ShapeValidator for Recording {
        async fn validate(&self, data: &Path) -> Result<ShapeReport, ExportError> {
            let text = std::fs::read_to_string(data).unwrap_or_default();
            if let Ok(mut seen) = self.seen.lock() {
                *seen = Some((data.to_path_buf(), text));
            }
            if self.fail {
                return Err(ExportError::Validator(std::io::Error::other("boom")));
            }
            Ok(ShapeReport {
                conforms: false,
                report: "Conforms: False".to_owned(),
            })
        }
    }

    fn seen_path(validator: &Recording) -> (PathBuf, String) {
        validator
            .seen
            .lock()
            .expect("lock")
            .clone()
            .expect("validator ran")
    }

    #[tokio::test]
    async fn bundle_contains_all_artifacts_and_cleans_up() {
        let root = tempfile::tempdir().expect("temp root");
        let validator = Arc::new(Recording::default());
        let exporter = Exporter::new(Arc::new(FixedTurtle), validator.clone())
            .with_temp_root(root.path());

        let bundle = exporter
            .export(&json!({ "@graph": [] }))
            .await
            .expect("export succeeds");
        assert!(!bundle.conforms);
        assert_eq!(bundle.validation_report, "Conforms: False");
        assert!(bundle.zip_filename.starts_with(EXPORT_PREFIX));
        assert!(bundle.zip_filename.ends_with(".zip"));

        let (data, text) = seen_path(&validator);
        assert_eq!(text, bundle.turtle);
        assert!(data
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(EXPORT_PREFIX)));
        assert!(!data.exists());
        assert_eq!(std::fs::read_dir(root.path()).expect("lists").count(), 0);

        let zip = base64::engine::general_purpose::STANDARD
            .decode(&bundle.zip_base64)
            .expect("base64");
        let mut archive = zip::ZipArchive::new(Cursor::new(zip)).expect("zip");
        let mut jsonld = String::new();
        archive
            .by_name(names::JSONLD)
            .expect("jsonld member")
            .read_to_string(&mut jsonld)
            .expect("reads");
        assert_eq!(jsonld, "{\n  \"@graph\": []\n}");
        assert!(archive.by_name(names::TURTLE).is_ok());
        assert!(archive.by_name(names::VALIDATION).is_ok());
    }

    #[tokio::test]
    async fn validator_failure_still_removes_directory() {
        let root = tempfile::tempdir().expect("temp root");
        let validator = Arc::new(Recording {
            fail: true,
            ..Recording::default()
        });
        let exporter = Exporter::new(Arc::new(FixedTurtle), validator.clone())
            .with_temp_root(root.path());
        let err = exporter
            .export(&json!({}))
            .await
            .expect_err("validator fails");
        assert!(matches!(err, ExportError::Validator(_)));
        let (data, _) = seen_path(&validator);
        assert!(!data.exists());
        assert_eq!(std::fs::read_dir(root.path()).expect("lists").count(), 0);
    }

    #[tokio::test]
    async fn conversion_failure_creates_nothing() {
        let root = tempfile::tempdir().expect("temp root");
        let validator = Arc::new(Recording::default());
        let exporter = Exporter::new(Arc::new(FailingConverter), validator.clone())
            .with_temp_root(root.path());
        let err = exporter.export(&json!({})).await.expect_err("conversion fails");
        assert_eq!(err.to_string(), "JSON-LD to RDF conversion failed: bad document");
        assert!(validator.seen.lock().expect("lock").is_none());
        assert_eq!(std::fs::read_dir(root.path()).expect("lists").count(), 0);
    }

    #[test]
    fn bundle_serializes_camel_case() {
        let bundle = ExportBundle {
            conforms: true,
            turtle: String::new(),
            validation_report: "ok".to_owned(),
            zip_base64: String::new(),
            zip_filename: "hcmo-export-x.zip".to_owned(),
        };
        let json = serde_json::to_value(&bundle).expect("serializes");
        assert_eq!(json["validationReport"], "ok");
        assert_eq!(json["zipFilename"], "hcmo-export-x.zip");
        assert!(json.get("zipBase64").is_some());
    }
}
