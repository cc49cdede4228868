//! Blueprint inventory types.
//!
//! An [`Inventory`] is an ordered list of [`Group`]s, each holding the
//! [`Field`]s of one tier (mandatory/recommended/optional) or one subject
//! domain. Both inventory shapes feed the same field type, so scoring and
//! example application never branch on the source format.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field classification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Required for a record to be usable.
    Mandatory,
    /// Expected in a well-described record.
    Recommended,
    /// Nice to have.
    Optional,
}

impl Classification {
    /// Every classification, in tier order.
    pub const ALL: [Classification; 3] = [
        Classification::Mandatory,
        Classification::Recommended,
        Classification::Optional,
    ];

    /// Lower-case identifier, also used as the tier group id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Classification::Mandatory => "mandatory",
            Classification::Recommended => "recommended",
            Classification::Optional => "optional",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Classification::Mandatory => "Mandatory",
            Classification::Recommended => "Recommended",
            Classification::Optional => "Optional",
        }
    }

    /// Finds the first word of `text` that names a classification
    /// (case-insensitive). Hyphenated words count as one word, so
    /// `non-mandatory` names nothing.
    #[must_use]
    pub fn find_in(text: &str) -> Option<Classification> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .find_map(|word| {
                Classification::ALL
                    .into_iter()
                    .find(|c| word.eq_ignore_ascii_case(c.as_str()))
            })
    }

    /// Lenient parse: unrecognized values are [`Classification::Optional`].
    #[must_use]
    pub fn parse_lenient(text: &str) -> Classification {
        Classification::find_in(text).unwrap_or(Classification::Optional)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coverage status of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    /// Value supplied in full.
    Provided,
    /// Value supplied in part.
    Partial,
    /// No value.
    Missing,
    /// Not assessed.
    Unknown,
}

impl CoverageStatus {
    /// Every status, in display order.
    pub const ALL: [CoverageStatus; 4] = [
        CoverageStatus::Provided,
        CoverageStatus::Partial,
        CoverageStatus::Missing,
        CoverageStatus::Unknown,
    ];

    /// Lower-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CoverageStatus::Provided => "provided",
            CoverageStatus::Partial => "partial",
            CoverageStatus::Missing => "missing",
            CoverageStatus::Unknown => "unknown",
        }
    }

    /// Scoring weight: provided 1, partial 0.5, everything else 0.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            CoverageStatus::Provided => 1.0,
            CoverageStatus::Partial => 0.5,
            CoverageStatus::Missing | CoverageStatus::Unknown => 0.0,
        }
    }

    /// Normalizes free text or a status glyph to a status.
    ///
    /// ```
    /// use hcmo_blueprint::CoverageStatus;
    ///
    /// assert_eq!(CoverageStatus::normalize("Provided (lab)"), CoverageStatus::Provided);
    /// assert_eq!(CoverageStatus::normalize("\u{25B3}"), CoverageStatus::Partial);
    /// assert_eq!(CoverageStatus::normalize("n/a"), CoverageStatus::Unknown);
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> CoverageStatus {
        let defaults = StatusIcons::default();
        let lower = raw.to_lowercase();
        [
            CoverageStatus::Provided,
            CoverageStatus::Partial,
            CoverageStatus::Missing,
        ]
        .into_iter()
        .find(|s| lower.contains(s.as_str()) || raw.contains(defaults.icon(*s)))
        .unwrap_or(CoverageStatus::Unknown)
    }
}

impl<'de> Deserialize<'de> for CoverageStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CoverageStatus::normalize(&raw))
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display glyph per status. Missing entries fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusIcons {
    /// Glyph for provided.
    pub provided: String,
    /// Glyph for partial.
    pub partial: String,
    /// Glyph for missing.
    pub missing: String,
    /// Glyph for unknown.
    pub unknown: String,
}

impl Default for StatusIcons {
    fn default() -> Self {
        Self {
            provided: "\u{2713}".to_owned(),
            partial: "\u{25B3}".to_owned(),
            missing: "\u{25CB}".to_owned(),
            unknown: "?".to_owned(),
        }
    }
}

impl StatusIcons {
    /// Returns the glyph of `status`.
    #[must_use]
    pub fn icon(&self, status: CoverageStatus) -> &str {
        match status {
            CoverageStatus::Provided => &self.provided,
            CoverageStatus::Partial => &self.partial,
            CoverageStatus::Missing => &self.missing,
            CoverageStatus::Unknown => &self.unknown,
        }
    }

    /// Decodes literal `\uXXXX` escapes left in icon strings by hand-edited
    /// data files; an empty icon falls back to the unknown glyph.
    #[must_use]
    pub fn decoded(&self) -> StatusIcons {
        let fallback = StatusIcons::default().unknown;
        let decode = |raw: &str| {
            if raw.is_empty() {
                fallback.clone()
            } else {
                decode_escapes(raw)
            }
        };
        StatusIcons {
            provided: decode(&self.provided),
            partial: decode(&self.partial),
            missing: decode(&self.missing),
            unknown: decode(&self.unknown),
        }
    }
}

fn decode_escapes(raw: &str) -> String {
    static ESCAPE: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = ESCAPE
        .get_or_init(|| Regex::new(r"\\u([0-9a-fA-F]{4})").ok())
        .as_ref()
    else {
        return raw.to_owned();
    };
    re.replace_all(raw, |caps: &regex::Captures<'_>| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_owned(), String::from)
    })
    .into_owned()
}

/// Whether groups are classification tiers or subject domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Mandatory/recommended/optional tiers from the tier document.
    Tier,
    /// Subject-matter domains from the domain table.
    Domain,
}

impl GroupKind {
    /// Key of the group array in API payloads.
    #[must_use]
    pub const fn collection_key(self) -> &'static str {
        match self {
            GroupKind::Tier => "tiers",
            GroupKind::Domain => "domains",
        }
    }
}

/// One blueprint field. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Slug identifier, unique within its group.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Classification tier.
    #[serde(rename = "tierId")]
    pub classification: Classification,
    /// Display label of the classification.
    pub tier_label: &'static str,
    /// Id of the owning group.
    pub group_id: String,
    /// What the field captures.
    pub description: String,
    /// Why it is collected.
    pub rationale: String,
    /// Expected datatype.
    pub datatype: String,
    /// Example value.
    pub example_value: String,
    /// Validation notes.
    pub validation_notes: String,
    /// Downstream utility note.
    pub downstream_utility: String,
    /// Ontology term the field maps to; empty when unknown.
    pub ontology_iri: String,
}

/// An ordered bucket of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Group id (tier name or domain slug).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Fields in source order.
    pub fields: Vec<Field>,
}

impl Group {
    /// Looks up a field by id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Appends `field` unless the group already has a field with its id.
    /// Returns whether it was added.
    pub fn add_field(&mut self, field: Field) -> bool {
        if self.field(&field.id).is_some() {
            tracing::warn!(
                group = %self.id,
                field = %field.id,
                label = %field.label,
                "skipping duplicate blueprint field id"
            );
            return false;
        }
        self.fields.push(field);
        true
    }
}

/// A loaded field inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Shape of the groups.
    pub kind: GroupKind,
    /// Groups in source order.
    pub groups: Vec<Group>,
}

impl Inventory {
    /// Looks up a group by id.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Iterates over every field, group by group.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    /// Total number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.groups.iter().map(|g| g.fields.len()).sum()
    }
}

/// Serializes as `{ "tiers": [...] }` or `{ "domains": [...] }`.
impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.collection_key(), &self.groups)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_weights() {
        let weights: Vec<f64> = CoverageStatus::ALL.iter().map(|s| s.weight()).collect();
        assert_eq!(weights, [1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn normalize_accepts_words_and_glyphs() {
        assert_eq!(CoverageStatus::normalize("PROVIDED"), CoverageStatus::Provided);
        assert_eq!(CoverageStatus::normalize("\u{2713} done"), CoverageStatus::Provided);
        assert_eq!(CoverageStatus::normalize("partially"), CoverageStatus::Partial);
        assert_eq!(CoverageStatus::normalize("\u{25CB}"), CoverageStatus::Missing);
        assert_eq!(CoverageStatus::normalize(""), CoverageStatus::Unknown);
        assert_eq!(CoverageStatus::normalize("unknown"), CoverageStatus::Unknown);
    }

    #[test]
    fn status_deserializes_through_normalize() {
        let status: CoverageStatus = serde_json::from_str("\"Partial\"").expect("parses");
        assert_eq!(status, CoverageStatus::Partial);
    }

    #[test]
    fn classification_lenient_parse() {
        assert_eq!(Classification::parse_lenient("Mandatory (M)"), Classification::Mandatory);
        assert_eq!(Classification::parse_lenient("recommended"), Classification::Recommended);
        assert_eq!(Classification::parse_lenient("whatever"), Classification::Optional);
        assert_eq!(Classification::parse_lenient("non-mandatory"), Classification::Optional);
    }

    #[test]
    fn first_named_classification_wins() {
        assert_eq!(
            Classification::find_in("Optional (non-mandatory) fields"),
            Some(Classification::Optional)
        );
        assert_eq!(
            Classification::find_in("Tier 2: Recommended, not mandatory"),
            Some(Classification::Recommended)
        );
        assert_eq!(Classification::find_in("## Mandatory fields"), Some(Classification::Mandatory));
        assert_eq!(Classification::find_in("Notes"), None);
    }

    #[test]
    fn icons_fill_missing_entries_and_decode_escapes() {
        let icons: StatusIcons =
            serde_json::from_str(r#"{ "partial": "\\u25B2" }"#).expect("parses");
        let icons = icons.decoded();
        assert_eq!(icons.partial, "\u{25B2}");
        assert_eq!(icons.provided, "\u{2713}");
    }

    #[test]
    fn inventory_serializes_under_collection_key() {
        let inventory = Inventory {
            kind: GroupKind::Domain,
            groups: Vec::new(),
        };
        let json = serde_json::to_value(&inventory).expect("serializes");
        assert!(json["domains"].is_array());
        assert!(json.get("tiers").is_none());
    }
}
