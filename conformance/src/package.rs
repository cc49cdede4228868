//! ZIP packaging of export artifacts.

use std::io::{Cursor, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

/// Archive member names.
pub mod names {
    /// Pretty-printed JSON-LD document.
    pub const JSONLD: &str = "export.jsonld";
    /// Turtle serialization.
    pub const TURTLE: &str = "export.ttl";
    /// SHACL validation report.
    pub const VALIDATION: &str = "validation.txt";
}

/// Writes `entries` (name, contents) into an in-memory ZIP, deflated at
/// level 9, in the given order.
///
/// # Errors
///
/// Returns [`ExportError::Package`] if the archive cannot be written.
pub fn build_zip(entries: &[(&str, &str)]) -> Result<Vec<u8>, ExportError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, options)?;
        writer
            .write_all(contents.as_bytes())
            .map_err(ZipError::Io)?;
    }
    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn members_round_trip_in_order() {
        let bytes = build_zip(&[
            (names::JSONLD, "{}"),
            (names::TURTLE, "@prefix hcm: <https://w3id.org/hcmo/ontology/hcm#> ."),
            (names::VALIDATION, "Conforms: True"),
        ])
        .expect("zip builds");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip reads");
        let listed: Vec<&str> = archive.file_names().collect();
        assert_eq!(listed.len(), 3);

        let first = archive.by_index(0).expect("first member").name().to_owned();
        assert_eq!(first, names::JSONLD);

        let mut report = String::new();
        archive
            .by_name(names::VALIDATION)
            .expect("validation member")
            .read_to_string(&mut report)
            .expect("reads");
        assert_eq!(report, "Conforms: True");
    }
}
