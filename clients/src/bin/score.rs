//! `hcmo-score`: Prints blueprint coverage.
//!
//! Scores either a checklist CSV (`domain`, `classification`,
//! `coverage_status` columns) or an example profile applied to the field
//! inventory.
//!
//! **Usage:**
//! ```text
//! hcmo-score --checklist <file.csv> [--json]
//! hcmo-score --example <id> [--tiers <md> | --domains <tsv>] [--examples <json>] [--json]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hcmo_blueprint::checklist::{parse_checklist, score_checklist};
use hcmo_blueprint::{Blueprint, CoverageSummary, InventorySource};

/// Print blueprint coverage for a checklist or an example profile.
#[derive(Parser)]
#[command(name = "hcmo-score", about = "Score HCMO blueprint coverage")]
struct Args {
    /// Checklist CSV to score.
    #[arg(long, conflicts_with = "example")]
    checklist: Option<PathBuf>,

    /// Example profile to score against the inventory.
    #[arg(long, required_unless_present = "checklist")]
    example: Option<String>,

    /// Tiered Markdown field inventory.
    #[arg(long, default_value = "blueprint/data/FIELD-TIERS.md")]
    tiers: PathBuf,

    /// Domain-grouped TSV inventory; takes precedence over `--tiers`.
    #[arg(long)]
    domains: Option<PathBuf>,

    /// Example profiles file.
    #[arg(long, default_value = "blueprint/data/blueprint-examples.json")]
    examples: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

fn print_summary(summary: &CoverageSummary) {
    println!("Blueprint coverage summary (weighted by provided=1, partial=0.5):");
    for group in &summary.groups {
        println!(
            "- {}: coverage {:.1}% | mandatory provided {:.1}% ({} items)",
            group.group_id, group.coverage, group.mandatory_coverage, group.tally.total
        );
    }
    println!(
        "Overall coverage (simple mean): {:.1}%",
        summary.overall.coverage
    );
    println!(
        "Overall coverage (weighted over {} fields): {:.1}%",
        summary.overall.tally.total, summary.overall.weighted_coverage
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    let summary = match (&args.checklist, &args.example) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let records = parse_checklist(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            score_checklist(&records)
        }
        (None, example) => {
            let source = match &args.domains {
                Some(path) => InventorySource::DomainTable(path.clone()),
                None => InventorySource::TierDocument(args.tiers.clone()),
            };
            let blueprint = Blueprint::load(&source, &args.examples)
                .context("Failed to load blueprint")?;
            let id = example.as_deref().unwrap_or_default();
            let profile = blueprint.catalog.find(id)?;
            if !profile.description.is_empty() {
                println!("{}: {}", profile.label, profile.description);
            }
            blueprint.score_example(id)?
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize coverage summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}
