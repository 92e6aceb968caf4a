//! Capture record discovery.
//!
//! Test workers write one uniquely-named `.json` record per capture into
//! the results directory. After the all-tests barrier this module reads
//! them back: every `.json` file must parse to exactly one record, other
//! files are expected noise and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::report::types::{CaptureResult, ReportError, ReportResult};

/// Read every capture record below `dir`.
///
/// Directory entries are visited in sorted name order so the same tree
/// always enumerates identically. A missing directory yields zero records
/// (a run producing no captures is valid); a `.json` file that does not
/// parse is a [`ReportError::MalformedRecord`].
pub fn read_results_dir(dir: &Path) -> ReportResult<Vec<CaptureResult>> {
    let mut results = Vec::new();
    if !dir.exists() {
        return Ok(results);
    }

    for path in collect_record_files(dir)? {
        let contents = fs::read_to_string(&path)?;
        let result: CaptureResult = serde_json::from_str(&contents)
            .map_err(|err| ReportError::MalformedRecord(path.clone(), err))?;
        results.push(result);
    }

    Ok(results)
}

/// Walk the tree below `dir`, collecting `.json` files in sorted order
fn collect_record_files(dir: &Path) -> ReportResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries: Vec<PathBuf> = fs::read_dir(&current)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        for path in entries {
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().map(|e| e == "json").unwrap_or(false) {
                files.push(path);
            } else {
                debug!(path = %path.display(), "skipping non-record file");
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::Outcome;
    use std::fs;
    use tempfile::TempDir;

    fn write_record(dir: &Path, name: &str, identifier: &str, outcome: &str) {
        let json = format!(
            r#"{{"identifier":"{}","outcome":"{}","timestamp":1700000000}}"#,
            identifier, outcome
        );
        fs::write(dir.join(name), json).expect("Failed to write record");
    }

    #[test]
    fn test_reads_records_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        write_record(temp.path(), "b.json", "second", "unchanged");
        write_record(temp.path(), "a.json", "first", "added");

        let results = read_results_dir(temp.path()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].identifier, "first");
        assert_eq!(results[0].outcome, Outcome::Added);
        assert_eq!(results[1].identifier, "second");
    }

    #[test]
    fn test_walks_subdirectories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("variantDebug");
        fs::create_dir_all(&nested).unwrap();
        write_record(temp.path(), "top.json", "top", "recorded");
        write_record(&nested, "deep.json", "deep", "failed");

        let results = read_results_dir(temp.path()).unwrap();
        assert_eq!(results.len(), 2);
        let identifiers: Vec<&str> =
            results.iter().map(|r| r.identifier.as_str()).collect();
        assert!(identifiers.contains(&"top"));
        assert!(identifiers.contains(&"deep"));
    }

    #[test]
    fn test_skips_non_json_files() {
        let temp = TempDir::new().unwrap();
        write_record(temp.path(), "ok.json", "ok", "unchanged");
        fs::write(temp.path().join("capture.png"), b"not json").unwrap();
        fs::write(temp.path().join("notes.txt"), "scratch").unwrap();

        let results = read_results_dir(temp.path()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].identifier, "ok");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let temp = TempDir::new().unwrap();
        write_record(temp.path(), "ok.json", "ok", "unchanged");
        fs::write(temp.path().join("broken.json"), "{ not json").unwrap();

        let err = read_results_dir(temp.path()).unwrap_err();
        match err {
            ReportError::MalformedRecord(path, _) => {
                assert!(path.ends_with("broken.json"));
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_directory_yields_zero_records() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("never-created");
        let results = read_results_dir(&missing).unwrap();
        assert!(results.is_empty());
    }
}
