//! SHACL validation through an external `pyshacl` process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ExportError;

/// Outcome of validating a data file against the shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeReport {
    /// True when the data conforms.
    pub conforms: bool,
    /// Human-readable validation report.
    pub report: String,
}

/// Validates a Turtle data file against a fixed shape graph.
#[async_trait]
pub trait ShapeValidator: Send + Sync {
    /// Validates the Turtle file at `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Validator`] if the validator cannot be run.
    /// A non-conforming graph is not an error.
    async fn validate(&self, data: &Path) -> Result<ShapeReport, ExportError>;
}

/// Runs `python -m pyshacl -s <shapes> -m -i rdfs -a -f human <data>`.
#[derive(Debug, Clone)]
pub struct PyShaclValidator {
    python: PathBuf,
    shapes: PathBuf,
    workdir: PathBuf,
}

impl PyShaclValidator {
    /// Validator using `python` and the given shape file, run from the
    /// current directory.
    #[must_use]
    pub fn new(shapes: impl Into<PathBuf>) -> Self {
        Self {
            python: PathBuf::from("python"),
            shapes: shapes.into(),
            workdir: PathBuf::from("."),
        }
    }

    /// Uses another Python interpreter.
    #[must_use]
    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = python.into();
        self
    }

    /// Runs the validator from `workdir`.
    #[must_use]
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Shape file path.
    #[must_use]
    pub fn shapes(&self) -> &Path {
        &self.shapes
    }

    fn args<'a>(&'a self, data: &'a Path) -> [&'a std::ffi::OsStr; 11] {
        [
            "-m".as_ref(),
            "pyshacl".as_ref(),
            "-s".as_ref(),
            self.shapes.as_os_str(),
            "-m".as_ref(),
            "-i".as_ref(),
            "rdfs".as_ref(),
            "-a".as_ref(),
            "-f".as_ref(),
            "human".as_ref(),
            data.as_os_str(),
        ]
    }
}

/// Joins stdout and stderr the way the report file shows them.
fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut report = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        report.push_str("\n[stderr]\n");
        report.push_str(&String::from_utf8_lossy(stderr));
    }
    report.trim().to_owned()
}

#[async_trait]
impl ShapeValidator for PyShaclValidator {
    async fn validate(&self, data: &Path) -> Result<ShapeReport, ExportError> {
        let output = Command::new(&self.python)
            .args(self.args(data))
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(ExportError::Validator)?;
        let conforms = output.status.code() == Some(0);
        tracing::info!(
            data = %data.display(),
            status = ?output.status.code(),
            conforms,
            "pyshacl finished"
        );
        Ok(ShapeReport {
            conforms,
            report: merge_output(&output.stdout, &output.stderr),
        })
    }
}
