//! Blueprint inventory loading.
//!
//! Two source shapes are supported, each behind [`InventoryParser`]:
//!
//! - [`tiers::TierDocumentParser`]: a Markdown document with one table per
//!   Mandatory / Recommended / Optional heading.
//! - [`domains::DomainTableParser`]: a tab-separated table with one row per
//!   field, grouped by its `domain` column.
//!
//! Both produce the same [`Inventory`] of [`Field`]s.

pub mod domains;
pub mod tiers;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::delimited::cell;
use crate::error::BlueprintError;
use crate::model::{Classification, Field, GroupKind, Inventory};

/// Parses inventory source text.
pub trait InventoryParser {
    /// Group shape this parser produces.
    fn kind(&self) -> GroupKind;

    /// Parses `text`. `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::EmptyInventory`] when no field row parses.
    fn parse(&self, text: &str, origin: &str) -> Result<Inventory, BlueprintError>;
}

/// Where an inventory comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    /// Tiered Markdown document (`FIELD-TIERS.md`).
    TierDocument(PathBuf),
    /// Domain-grouped tab-separated table (`hcmo-field-inventory.tsv`).
    DomainTable(PathBuf),
}

impl InventorySource {
    /// Path of the source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            InventorySource::TierDocument(p) | InventorySource::DomainTable(p) => p,
        }
    }

    /// Parser for this source shape.
    #[must_use]
    pub fn parser(&self) -> Box<dyn InventoryParser + Send + Sync> {
        match self {
            InventorySource::TierDocument(_) => Box::new(tiers::TierDocumentParser),
            InventorySource::DomainTable(_) => Box::new(domains::DomainTableParser),
        }
    }
}

/// Reads and parses an inventory source.
///
/// # Errors
///
/// Returns [`BlueprintError::Io`] if the file cannot be read and
/// [`BlueprintError::EmptyInventory`] if it holds no parseable field rows.
pub fn load_inventory(source: &InventorySource) -> Result<Inventory, BlueprintError> {
    let path = source.path();
    let text = std::fs::read_to_string(path).map_err(|e| BlueprintError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let inventory = source.parser().parse(&text, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        kind = inventory.kind.collection_key(),
        groups = inventory.groups.len(),
        fields = inventory.field_count(),
        "loaded blueprint inventory"
    );
    Ok(inventory)
}

/// Derives a field id: lower-case, runs of non-alphanumerics become one
/// `_`, leading and trailing `_` trimmed.
///
/// ```
/// use hcmo_blueprint::parser::slug;
///
/// assert_eq!(slug("Enclosure dimensions (W x L x H)"), "enclosure_dimensions_w_x_l_x_h");
/// assert_eq!(slug("  --ID--  "), "id");
/// ```
#[must_use]
pub fn slug(text: &str) -> String {
    static NON_ALNUM: OnceLock<Option<Regex>> = OnceLock::new();
    let lower = text.to_lowercase();
    let replaced = match NON_ALNUM
        .get_or_init(|| Regex::new("[^a-z0-9]+").ok())
        .as_ref()
    {
        Some(re) => re.replace_all(&lower, "_").into_owned(),
        None => lower,
    };
    replaced.trim_matches('_').to_owned()
}

/// Canonical inventory columns, matched by normalized header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Label,
    Identifier,
    Description,
    Rationale,
    Datatype,
    Example,
    Validation,
    Downstream,
    Classification,
    Domain,
    OntologyIri,
}

impl Column {
    const ALL: [Column; 11] = [
        Column::Label,
        Column::Identifier,
        Column::Description,
        Column::Rationale,
        Column::Datatype,
        Column::Example,
        Column::Validation,
        Column::Downstream,
        Column::Classification,
        Column::Domain,
        Column::OntologyIri,
    ];

    fn matches(self, header: &str) -> bool {
        let h: String = header
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        match self {
            Column::Label => matches!(h.as_str(), "field" | "label" | "fieldname" | "name"),
            Column::Identifier => matches!(h.as_str(), "identifier" | "id" | "fieldid"),
            Column::Description => h.starts_with("description"),
            Column::Rationale => h.starts_with("rationale"),
            Column::Datatype => h.contains("datatype") || h == "type",
            Column::Example => h.starts_with("example"),
            Column::Validation => h.starts_with("validation"),
            Column::Downstream => h.starts_with("downstream"),
            Column::Classification => matches!(h.as_str(), "classification" | "tier" | "level"),
            Column::Domain => h == "domain",
            Column::OntologyIri => matches!(h.as_str(), "ontologyiri" | "iri" | "ontologyterm"),
        }
    }
}

/// Header-to-column index map. Absent columns read as `""`.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnIndex {
    positions: Vec<(Column, usize)>,
}

impl ColumnIndex {
    pub(crate) fn from_header(header: &[String]) -> Self {
        let positions = Column::ALL
            .into_iter()
            .filter_map(|col| {
                header
                    .iter()
                    .position(|h| col.matches(h))
                    .map(|i| (col, i))
            })
            .collect();
        Self { positions }
    }

    pub(crate) fn get<'r>(&self, row: &'r [String], column: Column) -> &'r str {
        let index = self
            .positions
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, i)| *i);
        cell(row, index)
    }

    /// Builds a field from one row. Returns `None` when the row names no
    /// field (neither label nor identifier).
    pub(crate) fn field(
        &self,
        row: &[String],
        classification: Classification,
        group_id: &str,
    ) -> Option<Field> {
        let label = self.get(row, Column::Label);
        let identifier = self.get(row, Column::Identifier);
        let id = slug(if identifier.is_empty() { label } else { identifier });
        if id.is_empty() {
            return None;
        }
        Some(Field {
            id,
            label: if label.is_empty() { identifier } else { label }.to_owned(),
            classification,
            tier_label: classification.label(),
            group_id: group_id.to_owned(),
            description: self.get(row, Column::Description).to_owned(),
            rationale: self.get(row, Column::Rationale).to_owned(),
            datatype: self.get(row, Column::Datatype).to_owned(),
            example_value: self.get(row, Column::Example).to_owned(),
            validation_notes: self.get(row, Column::Validation).to_owned(),
            downstream_utility: self.get(row, Column::Downstream).to_owned(),
            ontology_iri: self.get(row, Column::OntologyIri).to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert_eq!(slug("System identifier"), "system_identifier");
        assert_eq!(slug("Base IRI / namespace"), "base_iri_namespace");
        assert_eq!(slug("__x__"), "x");
        assert_eq!(slug("***"), "");
    }

    #[test]
    fn header_matching_is_loose() {
        let header: Vec<String> = ["Field", "Expected datatype", "Example value", "Notes"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        let index = ColumnIndex::from_header(&header);
        let row: Vec<String> = ["Cage ID", "string", "C-12"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        let field = index
            .field(&row, Classification::Mandatory, "mandatory")
            .expect("field");
        assert_eq!(field.id, "cage_id");
        assert_eq!(field.datatype, "string");
        assert_eq!(field.example_value, "C-12");
        assert_eq!(field.rationale, "");
    }

    #[test]
    fn missing_inventory_file_is_io_error() {
        let source = InventorySource::DomainTable(PathBuf::from("/nonexistent/inventory.tsv"));
        assert!(matches!(
            load_inventory(&source),
            Err(BlueprintError::Io { .. })
        ));
    }
}
