//! Form input normalization and validation.
//!
//! [`FormFields`] mirrors the raw field set posted by the entry form
//! (camelCase keys, loose scalar types). Deserializing a [`FormInput`]
//! goes through `FormFields` and normalizes every value once: strings are
//! trimmed, numeric fields parsed, checkbox values coerced to booleans and
//! timestamps parsed to UTC. The mapper only ever sees `FormInput`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;

/// A loosely typed scalar as it arrives from a form or JSON client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(f64),
    /// Any string, including checkbox `"on"` values.
    Text(String),
}

/// A repeated sensor or actuator row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityRow {
    /// Short name.
    pub id: Option<Scalar>,
    /// Human-readable label.
    pub label: Option<Scalar>,
}

/// The raw form field set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FormFields {
    pub base_iri: Option<Scalar>,
    pub system_id: Option<Scalar>,
    pub system_label: Option<Scalar>,
    pub hardware_id: Option<Scalar>,
    pub hardware_label: Option<Scalar>,
    pub software_id: Option<Scalar>,
    pub software_label: Option<Scalar>,
    pub supplier_id: Option<Scalar>,
    pub supplier_label: Option<Scalar>,
    pub protocol_id: Option<Scalar>,
    pub protocol_label: Option<Scalar>,
    pub enclosure_id: Option<Scalar>,
    pub enclosure_label: Option<Scalar>,
    pub width: Option<Scalar>,
    pub length: Option<Scalar>,
    pub height: Option<Scalar>,
    pub unit: Option<Scalar>,
    pub need_food: Option<Scalar>,
    pub need_water: Option<Scalar>,
    pub need_social: Option<Scalar>,
    pub need_safety: Option<Scalar>,
    pub need_enrichment: Option<Scalar>,
    pub animal_id: Option<Scalar>,
    pub animal_label: Option<Scalar>,
    pub behavior_id: Option<Scalar>,
    pub behavior_label: Option<Scalar>,
    pub circadian_label: Option<Scalar>,
    pub operator_contact: Option<Scalar>,
    pub data_product_links: Option<Scalar>,
    pub interval_id: Option<Scalar>,
    pub interval_label: Option<Scalar>,
    pub duration_hours: Option<Scalar>,
    pub is_extendable: Option<Scalar>,
    pub limited_interaction_label: Option<Scalar>,
    pub session_start: Option<Scalar>,
    pub session_end: Option<Scalar>,
    pub ingested_at: Option<Scalar>,
    #[serde(deserialize_with = "rows_or_empty")]
    pub sensors: Vec<EntityRow>,
    #[serde(deserialize_with = "rows_or_empty")]
    pub actuators: Vec<EntityRow>,
}

fn rows_or_empty<'de, D>(deserializer: D) -> Result<Vec<EntityRow>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let rows = Option::<Vec<Option<EntityRow>>>::deserialize(deserializer)?;
    Ok(rows.into_iter().flatten().flatten().collect())
}

/// A named entity: short name plus optional label (empty when absent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    /// Short name appended to the base namespace.
    pub id: String,
    /// Label; empty means no label is emitted.
    pub label: String,
}

impl Entity {
    fn trimmed(id: Option<&Scalar>, label: Option<&Scalar>) -> Self {
        Self {
            id: to_text(id),
            label: to_text(label),
        }
    }
}

/// The five welfare need flags of an enclosure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeedsInput {
    /// Food.
    pub food: bool,
    /// Water.
    pub water: bool,
    /// Social contacts.
    pub social: bool,
    /// Safety from threat.
    pub safety: bool,
    /// Environmental enrichment.
    pub enrichment: bool,
}

/// Enclosure dimensions; absent numbers are omitted from the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionsInput {
    /// Width.
    pub width: Option<f64>,
    /// Length.
    pub length: Option<f64>,
    /// Height.
    pub height: Option<f64>,
    /// Unit symbol; empty when not given.
    pub unit: String,
}

/// Bounds of the observation session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionInterval {
    /// Start instant.
    pub start: Option<DateTime<Utc>>,
    /// End instant.
    pub end: Option<DateTime<Utc>>,
}

/// Normalized form input consumed by [`crate::mapper::build_graph`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "FormFields")]
#[allow(missing_docs)]
pub struct FormInput {
    pub base_iri: String,
    pub system: Entity,
    pub hardware: Entity,
    pub software: Entity,
    pub supplier: Entity,
    pub protocol: Entity,
    pub enclosure: Entity,
    pub dimensions: DimensionsInput,
    pub needs: NeedsInput,
    pub animal: Entity,
    pub behavior: Entity,
    pub circadian_label: String,
    pub operator_contact: String,
    pub data_product_links: String,
    pub interval: Entity,
    pub duration_hours: Option<f64>,
    pub is_extendable: bool,
    pub limited_interaction_label: String,
    pub session: SessionInterval,
    pub ingested_at: Option<DateTime<Utc>>,
    pub sensors: Vec<Entity>,
    pub actuators: Vec<Entity>,
}

impl From<FormFields> for FormInput {
    fn from(f: FormFields) -> Self {
        let rows = |rows: &[EntityRow]| -> Vec<Entity> {
            rows.iter()
                .map(|r| Entity::trimmed(r.id.as_ref(), r.label.as_ref()))
                .filter(|e| !e.id.is_empty())
                .collect()
        };
        let timestamp = |raw: &Option<Scalar>| parse_timestamp(&to_text(raw.as_ref()));
        Self {
            base_iri: to_text(f.base_iri.as_ref()),
            system: Entity::trimmed(f.system_id.as_ref(), f.system_label.as_ref()),
            hardware: Entity::trimmed(f.hardware_id.as_ref(), f.hardware_label.as_ref()),
            software: Entity::trimmed(f.software_id.as_ref(), f.software_label.as_ref()),
            supplier: Entity::trimmed(f.supplier_id.as_ref(), f.supplier_label.as_ref()),
            protocol: Entity::trimmed(f.protocol_id.as_ref(), f.protocol_label.as_ref()),
            enclosure: Entity::trimmed(f.enclosure_id.as_ref(), f.enclosure_label.as_ref()),
            dimensions: DimensionsInput {
                width: parse_number(f.width.as_ref()),
                length: parse_number(f.length.as_ref()),
                height: parse_number(f.height.as_ref()),
                unit: to_text(f.unit.as_ref()),
            },
            needs: NeedsInput {
                food: parse_checkbox(f.need_food.as_ref()),
                water: parse_checkbox(f.need_water.as_ref()),
                social: parse_checkbox(f.need_social.as_ref()),
                safety: parse_checkbox(f.need_safety.as_ref()),
                enrichment: parse_checkbox(f.need_enrichment.as_ref()),
            },
            animal: Entity::trimmed(f.animal_id.as_ref(), f.animal_label.as_ref()),
            behavior: Entity::trimmed(f.behavior_id.as_ref(), f.behavior_label.as_ref()),
            circadian_label: to_text(f.circadian_label.as_ref()),
            operator_contact: to_text(f.operator_contact.as_ref()),
            data_product_links: to_text(f.data_product_links.as_ref()),
            interval: Entity::trimmed(f.interval_id.as_ref(), f.interval_label.as_ref()),
            duration_hours: parse_number(f.duration_hours.as_ref()),
            is_extendable: parse_extendable(f.is_extendable.as_ref()),
            limited_interaction_label: to_text(f.limited_interaction_label.as_ref()),
            session: SessionInterval {
                start: timestamp(&f.session_start),
                end: timestamp(&f.session_end),
            },
            ingested_at: timestamp(&f.ingested_at),
            sensors: rows(&f.sensors),
            actuators: rows(&f.actuators),
        }
    }
}

/// Errors reported before a form is mapped to a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A required field was empty.
    #[error("Missing required field: {0}.")]
    MissingField(&'static str),
    /// No sensor row with a short name.
    #[error("Add at least one sensor.")]
    NoSensors,
    /// No actuator row with a short name.
    #[error("Add at least one actuator.")]
    NoActuators,
    /// A session bound is missing or unparseable.
    #[error("Provide start and end timestamps for the session interval.")]
    MissingSessionInterval,
    /// The session end is not after its start.
    #[error("Session end must be later than the start timestamp.")]
    SessionOrder,
}

impl FormInput {
    /// Checks the invariants the mapper relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, in the order an operator
    /// would fix them: required fields, sensors, actuators, then the
    /// session interval.
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [
            ("baseIri", self.base_iri.as_str()),
            ("systemId", self.system.id.as_str()),
            ("hardwareId", self.hardware.id.as_str()),
            ("softwareId", self.software.id.as_str()),
            ("supplierId", self.supplier.id.as_str()),
            ("enclosureId", self.enclosure.id.as_str()),
            ("animalId", self.animal.id.as_str()),
            ("behaviorId", self.behavior.id.as_str()),
            ("intervalId", self.interval.id.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.is_empty()) {
            return Err(FormError::MissingField(*name));
        }
        if self.sensors.is_empty() {
            return Err(FormError::NoSensors);
        }
        if self.actuators.is_empty() {
            return Err(FormError::NoActuators);
        }
        match (self.session.start, self.session.end) {
            (Some(start), Some(end)) if start >= end => Err(FormError::SessionOrder),
            (Some(_), Some(_)) => Ok(()),
            _ => Err(FormError::MissingSessionInterval),
        }
    }
}

/// Text field semantics: trimmed string, numbers and booleans in their
/// JSON spelling, `null` or absent as empty.
#[must_use]
pub fn to_text(raw: Option<&Scalar>) -> String {
    match raw {
        Some(Scalar::Text(s)) => s.trim().to_owned(),
        Some(Scalar::Number(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        None => String::new(),
    }
}

/// Parses a numeric field. Blank, non-numeric and non-finite input yields
/// `None`.
#[must_use]
pub fn parse_number(raw: Option<&Scalar>) -> Option<f64> {
    let n = match raw? {
        Scalar::Number(n) => *n,
        Scalar::Text(s) if s.trim().is_empty() => return None,
        Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
        Scalar::Bool(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Checkbox semantics: `true`, `"on"`, `"true"` or a nonzero number.
#[must_use]
pub fn parse_checkbox(raw: Option<&Scalar>) -> bool {
    match raw {
        Some(Scalar::Bool(b)) => *b,
        Some(Scalar::Number(n)) => *n != 0.0,
        Some(Scalar::Text(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("on") || s.eq_ignore_ascii_case("true")
        }
        None => false,
    }
}

/// `isExtendable` semantics: only boolean `true` or case-insensitive
/// `"true"` count.
#[must_use]
pub fn parse_extendable(raw: Option<&Scalar>) -> bool {
    match raw {
        Some(Scalar::Bool(b)) => *b,
        Some(Scalar::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Parses an RFC 3339 timestamp or an HTML `datetime-local` value (read as
/// UTC). Returns `None` for blank or unparseable input.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[must_use]
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> Scalar {
        Scalar::Text(s.to_owned())
    }

    fn complete() -> serde_json::Value {
        json!({
            "baseIri": "https://mfg.example.com/hcm/id",
            "systemId": "sys", "hardwareId": "hw", "softwareId": "sw",
            "supplierId": "sup", "enclosureId": "enc", "animalId": "a",
            "behaviorId": "b", "intervalId": "ti",
            "sessionStart": "2025-09-20T20:00", "sessionEnd": "2025-09-21T20:00",
            "sensors": [{ "id": "s1" }], "actuators": [{ "id": "x1", "label": "X" }]
        })
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number(Some(&text("30"))), Some(30.0));
        assert_eq!(parse_number(Some(&text(" 2.5 "))), Some(2.5));
        assert_eq!(parse_number(Some(&Scalar::Number(4.0))), Some(4.0));
        assert_eq!(parse_number(Some(&text(""))), None);
        assert_eq!(parse_number(Some(&text("abc"))), None);
        assert_eq!(parse_number(Some(&text("NaN"))), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn extendable_only_accepts_true() {
        assert!(parse_extendable(Some(&text("TRUE"))));
        assert!(parse_extendable(Some(&Scalar::Bool(true))));
        for raw in ["1", "yes", "on", ""] {
            assert!(!parse_extendable(Some(&text(raw))), "{raw}");
        }
        assert!(!parse_extendable(None));
    }

    #[test]
    fn checkbox_values() {
        assert!(parse_checkbox(Some(&text("on"))));
        assert!(parse_checkbox(Some(&text("true"))));
        assert!(parse_checkbox(Some(&Scalar::Bool(true))));
        assert!(!parse_checkbox(Some(&text("off"))));
        assert!(!parse_checkbox(None));
    }

    #[test]
    fn timestamps_normalize_to_millis_utc() {
        let local = parse_timestamp("2025-09-20T20:00").map(|t| format_timestamp(&t));
        assert_eq!(local.as_deref(), Some("2025-09-20T20:00:00.000Z"));
        let offset = parse_timestamp("2025-09-20T22:00:00+02:00").map(|t| format_timestamp(&t));
        assert_eq!(offset.as_deref(), Some("2025-09-20T20:00:00.000Z"));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn deserialization_trims_and_drops_empty_rows() {
        let mut raw = complete();
        raw["systemLabel"] = json!("  System 1  ");
        raw["sensors"] = json!([{ "id": " s1 ", "label": "" }, { "id": "  ", "label": "x" }]);
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(form.system.label, "System 1");
        assert_eq!(form.sensors, vec![Entity { id: "s1".into(), label: String::new() }]);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn text_fields_accept_null_and_scalars() {
        let mut raw = complete();
        raw["protocolId"] = json!(null);
        raw["operatorContact"] = json!(null);
        raw["systemLabel"] = json!(null);
        raw["systemId"] = json!(12);
        raw["animalLabel"] = json!(true);
        raw["sensors"] = json!([{ "id": 7, "label": null }, null]);
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(form.protocol, Entity::default());
        assert_eq!(form.operator_contact, "");
        assert_eq!(form.system, Entity { id: "12".into(), label: String::new() });
        assert_eq!(form.animal.label, "true");
        assert_eq!(form.sensors, vec![Entity { id: "7".into(), label: String::new() }]);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn null_row_lists_are_empty() {
        let mut raw = complete();
        raw["actuators"] = json!(null);
        raw["sessionStart"] = json!(null);
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert!(form.actuators.is_empty());
        assert_eq!(form.session.start, None);
        assert_eq!(form.validate(), Err(FormError::NoActuators));
    }

    #[test]
    fn text_spelling_of_scalars() {
        assert_eq!(to_text(Some(&text("  x "))), "x");
        assert_eq!(to_text(Some(&Scalar::Number(12.0))), "12");
        assert_eq!(to_text(Some(&Scalar::Number(2.5))), "2.5");
        assert_eq!(to_text(Some(&Scalar::Bool(false))), "false");
        assert_eq!(to_text(None), "");
    }

    #[test]
    fn validation_messages() {
        let mut raw = complete();
        raw["sensors"] = json!([]);
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(form.validate().unwrap_err().to_string(), "Add at least one sensor.");

        let mut raw = complete();
        raw["actuators"] = json!([{ "id": "" }]);
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(form.validate(), Err(FormError::NoActuators));

        let mut raw = complete();
        raw["sessionEnd"] = json!("not a date");
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(form.validate(), Err(FormError::MissingSessionInterval));

        let mut raw = complete();
        raw["sessionEnd"] = raw["sessionStart"].clone();
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Session end must be later than the start timestamp."
        );

        let mut raw = complete();
        raw["baseIri"] = json!("   ");
        let form: FormInput = serde_json::from_value(raw).expect("form deserializes");
        assert_eq!(form.validate(), Err(FormError::MissingField("baseIri")));
    }
}
