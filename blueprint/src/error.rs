//! Blueprint error type.

use std::path::PathBuf;

/// Errors raised while loading or operating on a blueprint.
#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    /// A source file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The inventory source produced no fields.
    #[error("No blueprint fields found in {0}")]
    EmptyInventory(String),
    /// The examples file is not valid JSON of the expected shape.
    #[error("Failed to parse examples file {}: {source}", path.display())]
    Examples {
        /// Path of the examples file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// No example profile with this id.
    #[error("Unknown blueprint example: {0}")]
    UnknownExample(String),
    /// No field with this group and field id.
    #[error("Unknown blueprint field: {group}/{field}")]
    UnknownField {
        /// Group id.
        group: String,
        /// Field id.
        field: String,
    },
    /// A checklist had a header but no records.
    #[error("Checklist contains no records")]
    EmptyChecklist,
}
