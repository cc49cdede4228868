//! Server configuration from flags and `HCMO_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use hcmo_blueprint::InventorySource;
use hcmo_conformance::{Exporter, PyShaclValidator};

/// HCMO form server configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hcmo-server",
    about = "Serve HCMO record export and blueprint coverage endpoints"
)]
pub struct Config {
    /// Listen address.
    #[arg(long, env = "HCMO_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Directory of static files served at `/`; skipped when absent.
    #[arg(long, env = "HCMO_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// Tiered Markdown field inventory.
    #[arg(long, env = "HCMO_TIERS", default_value = "blueprint/data/FIELD-TIERS.md")]
    pub tiers: PathBuf,

    /// Domain-grouped TSV inventory; takes precedence over `--tiers`.
    #[arg(long, env = "HCMO_DOMAINS")]
    pub domains: Option<PathBuf>,

    /// Example profiles file.
    #[arg(
        long,
        env = "HCMO_EXAMPLES",
        default_value = "blueprint/data/blueprint-examples.json"
    )]
    pub examples: PathBuf,

    /// SHACL shape file passed to pyshacl.
    #[arg(long, env = "HCMO_SHAPES", default_value = "shapes/hcm-shapes.ttl")]
    pub shapes: PathBuf,

    /// Python interpreter with pyshacl installed.
    #[arg(long, env = "HCMO_PYTHON", default_value = "python")]
    pub python: PathBuf,

    /// Working directory of the pyshacl process.
    #[arg(long, env = "HCMO_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,
}

impl Config {
    /// Inventory source selected by the flags.
    #[must_use]
    pub fn inventory_source(&self) -> InventorySource {
        match &self.domains {
            Some(path) => InventorySource::DomainTable(path.clone()),
            None => InventorySource::TierDocument(self.tiers.clone()),
        }
    }

    /// Exporter using sophia and pyshacl as configured.
    #[must_use]
    pub fn exporter(&self) -> Exporter {
        Exporter::with_pyshacl(
            PyShaclValidator::new(&self.shapes)
                .with_python(&self.python)
                .with_workdir(&self.workdir),
        )
    }
}
