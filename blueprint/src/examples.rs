//! Example profiles (`blueprint-examples.json`).
//!
//! The examples file holds optional status icon overrides and a list of
//! profiles, each a nested group → field → entry map:
//!
//! ```json
//! {
//!   "statusIcons": { "partial": "△" },
//!   "examples": [
//!     { "id": "example-minimal-mandatory", "label": "...", "description": "...",
//!       "fields": { "mandatory": { "system_identifier": { "status": "provided", "value": "..." } } } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BlueprintError;
use crate::model::{CoverageStatus, Inventory, StatusIcons};
use crate::session::FieldEntries;

/// One field entry of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleEntry {
    /// Explicit status; when absent the status follows the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CoverageStatus>,
    /// Value.
    pub value: String,
    /// Notes.
    pub notes: String,
}

/// A canned set of field values and statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleProfile {
    /// Profile id.
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Description shown when the profile is applied.
    #[serde(default)]
    pub description: String,
    /// Group → field → entry.
    #[serde(default)]
    pub fields: FieldEntries,
}

impl ExampleProfile {
    /// Entry for a field, if the profile has one.
    #[must_use]
    pub fn entry(&self, group_id: &str, field_id: &str) -> Option<&ExampleEntry> {
        self.fields.get(group_id)?.get(field_id)
    }

    /// `group/field` paths of entries that name no inventory field.
    #[must_use]
    pub fn unknown_entries(&self, inventory: &Inventory) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(group_id, fields)| {
                let group = inventory.group(group_id);
                fields
                    .keys()
                    .filter(move |field_id| group.and_then(|g| g.field(field_id)).is_none())
                    .map(move |field_id| format!("{group_id}/{field_id}"))
            })
            .collect()
    }
}

/// Profiles plus the status icons served alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExampleCatalog {
    /// Status icons (defaults merged with file overrides).
    pub status_icons: StatusIcons,
    /// Profiles in file order.
    pub examples: Vec<ExampleProfile>,
}

impl ExampleCatalog {
    /// Reads the examples file.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Io`] if the file cannot be read and
    /// [`BlueprintError::Examples`] if it is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self, BlueprintError> {
        let text = std::fs::read_to_string(path).map_err(|e| BlueprintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut catalog: ExampleCatalog =
            serde_json::from_str(&text).map_err(|e| BlueprintError::Examples {
                path: path.to_path_buf(),
                source: e,
            })?;
        catalog.status_icons = catalog.status_icons.decoded();
        tracing::info!(
            path = %path.display(),
            examples = catalog.examples.len(),
            "loaded blueprint examples"
        );
        Ok(catalog)
    }

    /// Looks up a profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownExample`] if no profile has this id.
    pub fn find(&self, id: &str) -> Result<&ExampleProfile, BlueprintError> {
        self.examples
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| BlueprintError::UnknownExample(id.to_owned()))
    }

    /// Logs profile entries that do not match the inventory.
    pub fn warn_unmatched(&self, inventory: &Inventory) {
        for profile in &self.examples {
            let unknown = profile.unknown_entries(inventory);
            if !unknown.is_empty() {
                tracing::warn!(
                    example = %profile.id,
                    entries = ?unknown,
                    "example entries do not match any inventory field"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "statusIcons": { "provided": "\\u2714" },
        "examples": [
            { "id": "demo", "label": "Demo",
              "fields": { "mandatory": {
                  "a": { "status": "Provided", "value": "x" },
                  "b": { "value": "y", "notes": "n" } } } }
        ]
    }"#;

    #[test]
    fn loads_catalog_and_decodes_icons() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(CATALOG.as_bytes()).expect("write");
        let catalog = ExampleCatalog::load(file.path()).expect("loads");
        assert_eq!(catalog.status_icons.provided, "\u{2714}");
        assert_eq!(catalog.status_icons.missing, "\u{25CB}");
        let demo = catalog.find("demo").expect("demo profile");
        assert_eq!(
            demo.entry("mandatory", "a").and_then(|e| e.status),
            Some(CoverageStatus::Provided)
        );
        assert_eq!(demo.entry("mandatory", "b").and_then(|e| e.status), None);
        assert!(demo.entry("optional", "a").is_none());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let catalog = ExampleCatalog::default();
        assert!(matches!(
            catalog.find("nope"),
            Err(BlueprintError::UnknownExample(id)) if id == "nope"
        ));
    }

    #[test]
    fn malformed_catalog_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write");
        assert!(matches!(
            ExampleCatalog::load(file.path()),
            Err(BlueprintError::Examples { .. })
        ));
    }
}
