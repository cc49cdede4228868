//! Checklist scoring (`hcmo-blueprint-checklist.csv`).
//!
//! A checklist is a comma-separated file with at least the columns
//! `domain`, `classification` and `coverage_status`. Each row is one field.

use serde::Serialize;

use crate::delimited::{cell, Delimiter, Table};
use crate::error::BlueprintError;
use crate::model::{Classification, CoverageStatus};
use crate::scorer::{summarize, CoverageSummary, Tally};

/// One checklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistRecord {
    /// Domain the field belongs to.
    pub domain: String,
    /// Classification tier.
    pub classification: Classification,
    /// Recorded coverage status.
    pub coverage_status: CoverageStatus,
}

/// Parses checklist CSV text.
///
/// # Errors
///
/// Returns [`BlueprintError::EmptyChecklist`] when the text has no data rows.
pub fn parse_checklist(text: &str) -> Result<Vec<ChecklistRecord>, BlueprintError> {
    let table = Table::parse(text, Delimiter::Comma);
    let column = |name: &str| table.header.iter().position(|h| h.eq_ignore_ascii_case(name));
    let domain = column("domain");
    let classification = column("classification");
    let status = column("coverage_status");
    let records: Vec<ChecklistRecord> = table
        .rows
        .iter()
        .map(|row| ChecklistRecord {
            domain: cell(row, domain).to_owned(),
            classification: Classification::parse_lenient(cell(row, classification)),
            coverage_status: CoverageStatus::normalize(cell(row, status)),
        })
        .collect();
    if records.is_empty() {
        return Err(BlueprintError::EmptyChecklist);
    }
    Ok(records)
}

/// Scores checklist records grouped by domain; groups are sorted by domain
/// name.
#[must_use]
pub fn score_checklist(records: &[ChecklistRecord]) -> CoverageSummary {
    let mut tallies: Vec<(&str, Tally)> = Vec::new();
    let mut totals = Tally::default();
    for record in records {
        let index = match tallies.iter().position(|(d, _)| *d == record.domain) {
            Some(i) => i,
            None => {
                tallies.push((record.domain.as_str(), Tally::default()));
                tallies.len() - 1
            }
        };
        tallies[index]
            .1
            .add(record.coverage_status, record.classification);
        totals.add(record.coverage_status, record.classification);
    }
    tallies.sort_by(|a, b| a.0.cmp(b.0));
    summarize(tallies, totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
domain,field,classification,coverage_status,notes
system,system_id,mandatory,provided,\"ok, verified\"
system,vendor,optional,partial,
animal,species,mandatory,missing,
animal,strain,recommended,provided,
";

    #[test]
    fn parses_records() {
        let records = parse_checklist(CSV).expect("parses");
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].classification, Classification::Mandatory);
        assert_eq!(records[1].coverage_status, CoverageStatus::Partial);
    }

    #[test]
    fn scores_sorted_by_domain() {
        let summary = score_checklist(&parse_checklist(CSV).expect("parses"));
        let order: Vec<&str> = summary.groups.iter().map(|g| g.group_id.as_str()).collect();
        assert_eq!(order, ["animal", "system"]);
        let system = summary.group("system").expect("system");
        assert_eq!(system.coverage, 75.0);
        assert_eq!(system.mandatory_coverage, 100.0);
        let animal = summary.group("animal").expect("animal");
        assert_eq!(animal.coverage, 50.0);
        assert_eq!(animal.mandatory_coverage, 0.0);
        assert_eq!(summary.overall.coverage, 62.5);
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(
            parse_checklist("domain,classification,coverage_status\n"),
            Err(BlueprintError::EmptyChecklist)
        ));
    }
}
