//! `hcmo-build`: Builds an HCMO record from a form field file and writes the
//! artifacts to the output directory.
//!
//! **Outputs:**
//! - `<out>/<name>.jsonld`: JSON-LD document
//! - `<out>/<name>.ttl`: Turtle (with `--turtle` or `--export`)
//! - `<out>/hcmo-export-<uuid>.zip`: export archive (with `--export`)
//!
//! **Usage:**
//! ```text
//! hcmo-build <form.json> [--out <path>] [--turtle] [--export [--shapes <ttl>] [--python <bin>]]
//! ```
//!
//! Exits non-zero if the document fails the structural checks.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use base64::Engine as _;
use clap::Parser;
use hcmo_conformance::validators::document;
use hcmo_conformance::{Exporter, PyShaclValidator, RdfConverter, SophiaConverter};
use hcmo_ontology::FormInput;
use serde_json::Value;

/// Build HCMO record artifacts from a form field file.
#[derive(Parser)]
#[command(name = "hcmo-build", about = "Build HCMO record artifacts from form fields")]
struct Args {
    /// JSON file holding the form fields.
    form: PathBuf,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "public")]
    out: PathBuf,

    /// Also write the Turtle serialization.
    #[arg(long)]
    turtle: bool,

    /// Run the full export (Turtle, pyshacl, ZIP archive).
    #[arg(long)]
    export: bool,

    /// SHACL shape file used by `--export`.
    #[arg(long, default_value = "shapes/hcm-shapes.ttl")]
    shapes: PathBuf,

    /// Python interpreter with pyshacl installed.
    #[arg(long, default_value = "python")]
    python: PathBuf,
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  Written: {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let out = &args.out;

    let text = fs::read_to_string(&args.form)
        .with_context(|| format!("Failed to read {}", args.form.display()))?;
    let form: FormInput = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} as form fields", args.form.display()))?;
    let document = hcmo_ontology::build_document(&form).context("Form is incomplete")?;

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;
    let name = args
        .form
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("record");

    let nodes = document["@graph"].as_array().map_or(0, Vec::len);
    println!("HCMO record {}: {} nodes", form.system.id, nodes);

    let json_str =
        serde_json::to_string_pretty(&document).context("Failed to serialize JSON-LD")?;
    write(&out.join(format!("{name}.jsonld")), json_str.as_bytes())?;

    let report = document::validate(&document);
    for result in report.results.iter().filter(|r| r.is_failure()) {
        println!("{result}");
    }

    if args.export {
        export(&args, &document, out, name).await?;
    } else if args.turtle {
        let turtle = SophiaConverter::default()
            .to_turtle(&document)
            .context("Failed to convert to Turtle")?;
        write(&out.join(format!("{name}.ttl")), turtle.as_bytes())?;
    }

    if !report.all_passed() {
        eprintln!(
            "Structural checks FAILED: {} check(s) did not pass.",
            report.failure_count()
        );
        process::exit(1);
    }
    println!("Build complete.");
    Ok(())
}

async fn export(args: &Args, document: &Value, out: &Path, name: &str) -> Result<()> {
    let exporter = Exporter::with_pyshacl(
        PyShaclValidator::new(&args.shapes).with_python(&args.python),
    );
    let bundle = exporter
        .export(document)
        .await
        .context("Failed to process export")?;
    write(&out.join(format!("{name}.ttl")), bundle.turtle.as_bytes())?;
    let zip = base64::engine::general_purpose::STANDARD
        .decode(&bundle.zip_base64)
        .context("Export archive is not valid base64")?;
    write(&out.join(&bundle.zip_filename), &zip)?;
    println!("SHACL conforms: {}", bundle.conforms);
    if !bundle.conforms {
        println!("{}", bundle.validation_report);
    }
    Ok(())
}
