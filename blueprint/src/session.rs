//! Per-session coverage state.
//!
//! A [`Session`] holds one [`FieldCoverageState`] per inventory field and
//! applies the status rules:
//!
//! - editing a value under [`StatusOrigin::Auto`] derives provided/missing
//!   from whether the value is empty;
//! - selecting a status switches the field to [`StatusOrigin::Manual`],
//!   which suspends inference except that clearing the value of a provided
//!   field forces missing;
//! - applying an example or resetting overwrites every field.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::BlueprintError;
use crate::examples::{ExampleEntry, ExampleProfile};
use crate::model::{Classification, CoverageStatus, Inventory};
use crate::scorer::{score, CoverageSummary};

/// Whether a field's status was inferred or chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusOrigin {
    /// Derived from the presence of a value.
    #[default]
    Auto,
    /// Set by explicit selection or an example entry with a status.
    Manual,
}

/// Coverage state of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCoverageState {
    /// Owning group id.
    pub group_id: String,
    /// Field id.
    pub field_id: String,
    /// Classification of the field.
    pub classification: Classification,
    /// Current status.
    pub status: CoverageStatus,
    /// Entered value, trimmed.
    pub value: String,
    /// Free-text notes.
    pub notes: String,
    /// How `status` was set.
    pub origin: StatusOrigin,
}

impl FieldCoverageState {
    /// A fresh state: missing, empty, auto.
    #[must_use]
    pub fn new(group_id: &str, field_id: &str, classification: Classification) -> Self {
        Self {
            group_id: group_id.to_owned(),
            field_id: field_id.to_owned(),
            classification,
            status: CoverageStatus::Missing,
            value: String::new(),
            notes: String::new(),
            origin: StatusOrigin::Auto,
        }
    }

    fn clear(&mut self) {
        self.status = CoverageStatus::Missing;
        self.value.clear();
        self.notes.clear();
        self.origin = StatusOrigin::Auto;
    }

    fn edit_value(&mut self, value: &str) {
        self.value = value.trim().to_owned();
        match self.origin {
            StatusOrigin::Auto => {
                self.status = if self.value.is_empty() {
                    CoverageStatus::Missing
                } else {
                    CoverageStatus::Provided
                };
            }
            StatusOrigin::Manual => {
                if self.value.is_empty() && self.status == CoverageStatus::Provided {
                    self.status = CoverageStatus::Missing;
                }
            }
        }
    }

    fn select_status(&mut self, status: CoverageStatus) {
        self.status = status;
        self.origin = StatusOrigin::Manual;
    }

    fn apply_entry(&mut self, entry: Option<&ExampleEntry>) {
        let Some(entry) = entry else {
            self.clear();
            return;
        };
        self.value = entry.value.clone();
        self.notes = entry.notes.clone();
        match entry.status {
            Some(status) => {
                self.status = status;
                self.origin = StatusOrigin::Manual;
            }
            None => {
                self.status = if self.value.is_empty() {
                    CoverageStatus::Missing
                } else {
                    CoverageStatus::Provided
                };
                self.origin = StatusOrigin::Auto;
            }
        }
    }
}

/// Nested group → field → entry map, as used by example profiles and
/// client-supplied overrides.
pub type FieldEntries = BTreeMap<String, BTreeMap<String, ExampleEntry>>;

/// Coverage state of every inventory field for one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    fields: Vec<FieldCoverageState>,
}

impl Session {
    /// Starts a session with every field missing.
    #[must_use]
    pub fn new(inventory: &Inventory) -> Self {
        let fields = inventory
            .groups
            .iter()
            .flat_map(|g| {
                g.fields
                    .iter()
                    .map(|f| FieldCoverageState::new(&g.id, &f.id, f.classification))
            })
            .collect();
        Self { fields }
    }

    /// Field states in inventory order.
    #[must_use]
    pub fn fields(&self) -> &[FieldCoverageState] {
        &self.fields
    }

    /// Looks up a field state.
    #[must_use]
    pub fn get(&self, group_id: &str, field_id: &str) -> Option<&FieldCoverageState> {
        self.fields
            .iter()
            .find(|f| f.group_id == group_id && f.field_id == field_id)
    }

    fn get_mut(
        &mut self,
        group_id: &str,
        field_id: &str,
    ) -> Result<&mut FieldCoverageState, BlueprintError> {
        self.fields
            .iter_mut()
            .find(|f| f.group_id == group_id && f.field_id == field_id)
            .ok_or_else(|| BlueprintError::UnknownField {
                group: group_id.to_owned(),
                field: field_id.to_owned(),
            })
    }

    /// Records an edited value and re-derives the status.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownField`] if the field does not exist.
    pub fn edit_value(
        &mut self,
        group_id: &str,
        field_id: &str,
        value: &str,
    ) -> Result<(), BlueprintError> {
        self.get_mut(group_id, field_id)?.edit_value(value);
        Ok(())
    }

    /// Sets a status explicitly, marking the field manual.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownField`] if the field does not exist.
    pub fn select_status(
        &mut self,
        group_id: &str,
        field_id: &str,
        status: CoverageStatus,
    ) -> Result<(), BlueprintError> {
        self.get_mut(group_id, field_id)?.select_status(status);
        Ok(())
    }

    /// Replaces the notes of a field.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownField`] if the field does not exist.
    pub fn set_notes(
        &mut self,
        group_id: &str,
        field_id: &str,
        notes: &str,
    ) -> Result<(), BlueprintError> {
        notes.trim().clone_into(&mut self.get_mut(group_id, field_id)?.notes);
        Ok(())
    }

    /// Restores every field to (missing, "", "", auto).
    pub fn reset(&mut self) {
        self.fields.iter_mut().for_each(FieldCoverageState::clear);
    }

    /// Overwrites every field from an example profile. Fields without an
    /// entry are cleared. Applying the same profile twice is a no-op.
    pub fn apply_example(&mut self, profile: &ExampleProfile) {
        for state in &mut self.fields {
            state.apply_entry(profile.entry(&state.group_id, &state.field_id));
        }
    }

    /// Replays client edits as if typed: value first, then notes, then an
    /// explicit status.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownField`] for the first entry naming a
    /// field that is not in the inventory; earlier entries stay applied.
    pub fn apply_edits(&mut self, edits: &FieldEntries) -> Result<(), BlueprintError> {
        for (group_id, fields) in edits {
            for (field_id, entry) in fields {
                let state = self.get_mut(group_id, field_id)?;
                state.edit_value(&entry.value);
                if !entry.notes.is_empty() {
                    entry.notes.trim().clone_into(&mut state.notes);
                }
                if let Some(status) = entry.status {
                    state.select_status(status);
                }
            }
        }
        Ok(())
    }

    /// Scores the current state.
    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        score(&self.fields)
    }
}
