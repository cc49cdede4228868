//! Identifier derivation for graph nodes.
//!
//! Every node identifier is the normalized base namespace followed by an
//! operator-supplied short name:
//!
//! ```text
//! https://mfg.example.com/hcm/id/Enc_01
//! https://mfg.example.com/hcm/id/Enc_01_Needs
//! ```
//!
//! Derived records (needs, dimensions, circadian rhythm, interval bounds,
//! annotations) append a fixed [`Suffix`] to their parent's short name.

/// Fixed suffixes of derived-entity identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suffix {
    /// Enclosure needs record.
    Needs,
    /// Enclosure dimensions record.
    Dimensions,
    /// Behavior circadian rhythm.
    CircadianRhythm,
    /// Session interval start instant.
    Start,
    /// Session interval end instant.
    End,
    /// Limited-interaction-with-humans annotation of the interval.
    LimitedInteraction,
    /// Operator contact annotation of the system.
    Contact,
    /// Data-product annotation of the system.
    DataProducts,
}

impl Suffix {
    /// Every suffix.
    pub const ALL: [Suffix; 8] = [
        Suffix::Needs,
        Suffix::Dimensions,
        Suffix::CircadianRhythm,
        Suffix::Start,
        Suffix::End,
        Suffix::LimitedInteraction,
        Suffix::Contact,
        Suffix::DataProducts,
    ];

    /// Returns the literal appended to the parent short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Suffix::Needs => "_Needs",
            Suffix::Dimensions => "_Dims",
            Suffix::CircadianRhythm => "_CR",
            Suffix::Start => "_Start",
            Suffix::End => "_End",
            Suffix::LimitedInteraction => "_LHI",
            Suffix::Contact => "_Contact",
            Suffix::DataProducts => "_DataProducts",
        }
    }
}

/// Ensures the base namespace ends with `/` or `#`.
///
/// An empty input is returned unchanged; callers reject it during form
/// validation.
///
/// # Example
///
/// ```
/// use hcmo_ontology::iri::resolve_base;
///
/// assert_eq!(resolve_base("https://ex.org/id"), "https://ex.org/id/");
/// assert_eq!(resolve_base("https://ex.org/id#"), "https://ex.org/id#");
/// assert_eq!(resolve_base(""), "");
/// ```
#[must_use]
pub fn resolve_base(raw: &str) -> String {
    if raw.is_empty() || raw.ends_with('/') || raw.ends_with('#') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    }
}

/// Concatenates a normalized base and a short name.
#[must_use]
pub fn derive_id(base: &str, short_name: &str) -> String {
    format!("{base}{short_name}")
}

/// Concatenates a normalized base, a parent short name, and a fixed suffix.
#[must_use]
pub fn derive_suffixed_id(base: &str, short_name: &str, suffix: Suffix) -> String {
    format!("{base}{short_name}{}", suffix.as_str())
}

/// Derives identifiers under one normalized base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IriBuilder {
    base: String,
}

impl IriBuilder {
    /// Creates a builder, normalizing `raw_base` with [`resolve_base`].
    #[must_use]
    pub fn new(raw_base: &str) -> Self {
        Self {
            base: resolve_base(raw_base),
        }
    }

    /// The normalized base.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// See [`derive_id`].
    #[must_use]
    pub fn id(&self, short_name: &str) -> String {
        derive_id(&self.base, short_name)
    }

    /// See [`derive_suffixed_id`].
    #[must_use]
    pub fn suffixed(&self, short_name: &str, suffix: Suffix) -> String {
        derive_suffixed_id(&self.base, short_name, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://mfg.example.com/hcm/id/";

    #[test]
    fn base_gets_trailing_slash() {
        assert_eq!(resolve_base("https://mfg.example.com/hcm/id"), BASE);
        assert_eq!(resolve_base(BASE), BASE);
    }

    #[test]
    fn derive_id_is_injective_for_distinct_short_names() {
        let names = ["Enc_01", "Enc_1", "enc_01", "Enc_01 ", "S-00123", "a", "ab"];
        let mut seen = std::collections::HashSet::new();
        for name in names {
            assert!(seen.insert(derive_id(BASE, name)), "collision for {name}");
        }
    }

    #[test]
    fn suffixes_are_distinct_per_parent() {
        let mut seen = std::collections::HashSet::new();
        for parent in ["Enc_01", "TI_24h", "Behav_Rec_1"] {
            for suffix in Suffix::ALL {
                assert!(seen.insert(derive_suffixed_id(BASE, parent, suffix)));
            }
        }
    }

    #[test]
    fn builder_normalizes_once() {
        let iris = IriBuilder::new("https://mfg.example.com/hcm/id");
        assert_eq!(iris.id("Enc_01"), format!("{BASE}Enc_01"));
        assert_eq!(
            iris.suffixed("Enc_01", Suffix::Dimensions),
            format!("{BASE}Enc_01_Dims")
        );
        assert_eq!(
            iris.suffixed("TI_24h", Suffix::LimitedInteraction),
            format!("{BASE}TI_24h_LHI")
        );
    }
}
