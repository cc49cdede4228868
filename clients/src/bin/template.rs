//! `hcmo-template`: Writes a blank metadata template for every inventory
//! field.
//!
//! **Usage:**
//! ```text
//! hcmo-template [--format jsonld|csv] [--out <path>] [--inventory <tsv> | --tiers <md>]
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
use clap::{Parser, ValueEnum};
use hcmo_blueprint::template::{to_csv_template, to_json_ld_template};
use hcmo_blueprint::{load_inventory, InventorySource};

/// Template format.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// `{"@context": ..., "metadata": {group: {field: ""}}}`.
    Jsonld,
    /// `domain,field,value,notes` rows.
    Csv,
}

/// Generate a blank metadata template from the field inventory.
#[derive(Parser)]
#[command(name = "hcmo-template", about = "Generate HCMO metadata entry templates")]
struct Args {
    /// Output format.
    #[arg(long, value_enum, default_value = "jsonld")]
    format: Format,

    /// Write to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Domain-grouped TSV inventory.
    #[arg(long, default_value = "blueprint/data/hcmo-field-inventory.tsv")]
    inventory: PathBuf,

    /// Use a tiered Markdown inventory instead.
    #[arg(long)]
    tiers: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let source = match &args.tiers {
        Some(path) => InventorySource::TierDocument(path.clone()),
        None => InventorySource::DomainTable(args.inventory.clone()),
    };
    let inventory = load_inventory(&source).context("Failed to load field inventory")?;

    let output = match args.format {
        Format::Jsonld => serde_json::to_string_pretty(&to_json_ld_template(&inventory))
            .context("Failed to serialize template")?,
        Format::Csv => to_csv_template(&inventory),
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {:?} template to {}", args.format, path.display());
        }
        None => println!("{output}"),
    }
    Ok(())
}
