//! # Reporter Module
//!
//! Serializes duplicate groups for sharing and archiving.
//!
//! The dump format is an indented JSON object mapping each digest (hex)
//! to the array of paths sharing it, sorted by digest for stable output.

use crate::core::collection::DoublesReport;
use crate::error::ReportError;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write the duplicate map as pretty-printed JSON.
pub fn dump_json<W: Write>(report: &DoublesReport, writer: W) -> Result<(), ReportError> {
    let map: BTreeMap<&str, &[PathBuf]> = report
        .iter()
        .map(|group| (group.digest.as_str(), group.paths.as_slice()))
        .collect();

    serde_json::to_writer_pretty(writer, &map)?;
    Ok(())
}

/// Write the duplicate map to a file.
pub fn dump_to_file(report: &DoublesReport, path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::WriteDump {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    dump_json(report, &mut writer)?;
    writer.flush().map_err(|e| ReportError::WriteDump {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collection::ImageCollection;
    use tempfile::TempDir;

    fn sample_report() -> DoublesReport {
        let collection = ImageCollection::new();
        collection.add_hash(&[0xAB], PathBuf::from("/photos/a.jpg"));
        collection.add_hash(&[0xAB], PathBuf::from("/photos/b.jpg"));
        collection.add_hash(&[0x01], PathBuf::from("/photos/unique.png"));
        collection.find_doubles()
    }

    #[test]
    fn dump_is_a_digest_keyed_object() {
        let mut output = Vec::new();
        dump_json(&sample_report(), &mut output).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 1);
        let paths = object.get("ab").unwrap().as_array().unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn dump_is_indented() {
        let mut output = Vec::new();
        dump_json(&sample_report(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn empty_report_dumps_an_empty_object() {
        let mut output = Vec::new();
        dump_json(&DoublesReport::default(), &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "{}");
    }

    #[test]
    fn dump_to_file_writes_readable_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doubles.json");

        dump_to_file(&sample_report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(json.get("ab").is_some());
    }

    #[test]
    fn dump_to_unwritable_path_is_an_error() {
        let result = dump_to_file(
            &sample_report(),
            Path::new("/nonexistent/dir/doubles.json"),
        );
        assert!(matches!(result, Err(ReportError::WriteDump { .. })));
    }
}
