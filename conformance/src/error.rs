//! Export error type.

/// Errors raised while converting, validating or packaging an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The JSON-LD document could not be parsed or converted to RDF.
    #[error("JSON-LD to RDF conversion failed: {0}")]
    Conversion(String),
    /// The Turtle serializer failed.
    #[error("Turtle serialization failed: {0}")]
    Serialization(String),
    /// A temporary file or directory operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The SHACL validator could not be run.
    #[error("Failed to run SHACL validator: {0}")]
    Validator(#[source] std::io::Error),
    /// The ZIP archive could not be written.
    #[error("Failed to build export archive: {0}")]
    Package(#[from] zip::result::ZipError),
    /// The document could not be re-serialized as JSON.
    #[error("Failed to serialize JSON-LD: {0}")]
    Json(#[from] serde_json::Error),
    /// A blocking conversion task was cancelled or panicked.
    #[error("Conversion task failed: {0}")]
    Task(String),
}

impl ExportError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| ExportError::Io { context, source }
    }
}
