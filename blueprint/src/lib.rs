//! HCMO metadata blueprint: field inventory, coverage sessions and scoring.
//!
//! A blueprint is a field [`Inventory`] loaded from either the tiered
//! Markdown document or the domain-grouped table, plus a catalog of
//! [`ExampleProfile`]s. A [`Session`] tracks the coverage state of every
//! field; [`scorer::score`] turns that state into a [`CoverageSummary`].
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use hcmo_blueprint::{Blueprint, InventorySource};
//!
//! let blueprint = Blueprint::load(
//!     &InventorySource::TierDocument(PathBuf::from("data/FIELD-TIERS.md")),
//!     Path::new("data/blueprint-examples.json"),
//! )?;
//! let summary = blueprint.score_example("example-minimal-mandatory")?;
//! println!("{}", summary.overall.coverage);
//! # Ok::<(), hcmo_blueprint::BlueprintError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod checklist;
pub mod delimited;
pub mod error;
pub mod examples;
pub mod model;
pub mod parser;
pub mod scorer;
pub mod session;
pub mod template;

pub use error::BlueprintError;
pub use examples::{ExampleCatalog, ExampleEntry, ExampleProfile};
pub use model::{
    Classification, CoverageStatus, Field, Group, GroupKind, Inventory, StatusIcons,
};
pub use parser::{load_inventory, InventorySource};
pub use scorer::{score, CoverageSummary};
pub use session::{FieldCoverageState, FieldEntries, Session, StatusOrigin};

use std::path::Path;

/// A loaded inventory together with its example catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    /// Field inventory.
    pub inventory: Inventory,
    /// Example profiles and status icons.
    pub catalog: ExampleCatalog,
}

impl Blueprint {
    /// Loads the inventory and the examples file. Example entries that
    /// name no inventory field are logged, not rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`BlueprintError`] if either file cannot be read or parsed.
    pub fn load(source: &InventorySource, examples: &Path) -> Result<Self, BlueprintError> {
        let inventory = load_inventory(source)?;
        let catalog = ExampleCatalog::load(examples)?;
        catalog.warn_unmatched(&inventory);
        Ok(Self { inventory, catalog })
    }

    /// A fresh session over the inventory.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(&self.inventory)
    }

    /// Applies an optional example, then the given edits, and scores the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownExample`] or
    /// [`BlueprintError::UnknownField`] for ids not in the blueprint.
    pub fn score_with(
        &self,
        example_id: Option<&str>,
        edits: &FieldEntries,
    ) -> Result<CoverageSummary, BlueprintError> {
        let mut session = self.session();
        if let Some(id) = example_id {
            session.apply_example(self.catalog.find(id)?);
        }
        session.apply_edits(edits)?;
        Ok(session.summary())
    }

    /// Scores a single example profile.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownExample`] if no profile has this id.
    pub fn score_example(&self, example_id: &str) -> Result<CoverageSummary, BlueprintError> {
        self.score_with(Some(example_id), &FieldEntries::new())
    }
}
