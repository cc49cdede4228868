//! Coverage scoring.
//!
//! Weights: provided 1, partial 0.5, missing 0, unknown 0. A group's
//! coverage is the mean weight of its fields as a percentage, rounded to
//! one decimal. Mandatory coverage counts only provided mandatory fields
//! and is 0.0 when a group has no mandatory fields.
//!
//! The overall `coverage` is the plain mean of the group percentages, so
//! small groups weigh as much as large ones. `weighted_coverage` is the
//! ratio over all fields and is reported next to it.

use serde::Serialize;

use crate::model::{Classification, CoverageStatus};
use crate::session::FieldCoverageState;

/// Status counts of a set of fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    /// Provided fields.
    pub provided: usize,
    /// Partial fields.
    pub partial: usize,
    /// Missing fields.
    pub missing: usize,
    /// Unknown fields.
    pub unknown: usize,
    /// All fields.
    pub total: usize,
    /// Mandatory fields.
    pub mandatory_total: usize,
    /// Mandatory fields with status provided.
    pub mandatory_provided: usize,
}

impl Tally {
    pub(crate) fn add(&mut self, status: CoverageStatus, classification: Classification) {
        match status {
            CoverageStatus::Provided => self.provided += 1,
            CoverageStatus::Partial => self.partial += 1,
            CoverageStatus::Missing => self.missing += 1,
            CoverageStatus::Unknown => self.unknown += 1,
        }
        self.total += 1;
        if classification == Classification::Mandatory {
            self.mandatory_total += 1;
            if status == CoverageStatus::Provided {
                self.mandatory_provided += 1;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn weighted_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let weight = self.provided as f64 * CoverageStatus::Provided.weight()
            + self.partial as f64 * CoverageStatus::Partial.weight();
        round1(weight / self.total as f64 * 100.0)
    }

    #[allow(clippy::cast_precision_loss)]
    fn mandatory_percent(&self) -> f64 {
        if self.mandatory_total == 0 {
            return 0.0;
        }
        round1(self.mandatory_provided as f64 / self.mandatory_total as f64 * 100.0)
    }
}

/// Coverage of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCoverage {
    /// Group id.
    pub group_id: String,
    /// Status counts.
    #[serde(flatten)]
    pub tally: Tally,
    /// Weighted coverage percentage.
    pub coverage: f64,
    /// Provided share of mandatory fields, as a percentage.
    pub mandatory_coverage: f64,
}

/// Coverage across all groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallCoverage {
    /// Status counts over every field.
    #[serde(flatten)]
    pub tally: Tally,
    /// Mean of the group coverage percentages.
    pub coverage: f64,
    /// Weighted coverage over every field.
    pub weighted_coverage: f64,
    /// Provided share of all mandatory fields, as a percentage.
    pub mandatory_coverage: f64,
}

/// Per-group and overall coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Groups in order of first appearance.
    pub groups: Vec<GroupCoverage>,
    /// Overall figures.
    pub overall: OverallCoverage,
}

impl CoverageSummary {
    /// Looks up a group by id.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&GroupCoverage> {
        self.groups.iter().find(|g| g.group_id == id)
    }
}

/// Rounds to one decimal.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scores field states. Groups keep the order in which they first appear.
#[must_use]
pub fn score(fields: &[FieldCoverageState]) -> CoverageSummary {
    let mut tallies: Vec<(&str, Tally)> = Vec::new();
    let mut totals = Tally::default();
    for field in fields {
        let index = match tallies.iter().position(|(id, _)| *id == field.group_id) {
            Some(i) => i,
            None => {
                tallies.push((field.group_id.as_str(), Tally::default()));
                tallies.len() - 1
            }
        };
        tallies[index].1.add(field.status, field.classification);
        totals.add(field.status, field.classification);
    }
    summarize(tallies, totals)
}

pub(crate) fn summarize(tallies: Vec<(&str, Tally)>, totals: Tally) -> CoverageSummary {
    let groups: Vec<GroupCoverage> = tallies
        .into_iter()
        .map(|(id, tally)| GroupCoverage {
            group_id: id.to_owned(),
            coverage: tally.weighted_percent(),
            mandatory_coverage: tally.mandatory_percent(),
            tally,
        })
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let mean = if groups.is_empty() {
        0.0
    } else {
        round1(groups.iter().map(|g| g.coverage).sum::<f64>() / groups.len() as f64)
    };
    CoverageSummary {
        overall: OverallCoverage {
            coverage: mean,
            weighted_coverage: totals.weighted_percent(),
            mandatory_coverage: totals.mandatory_percent(),
            tally: totals,
        },
        groups,
    }
}
