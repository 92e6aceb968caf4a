//! Integration tests for the aggregation and report pipeline

use std::collections::BTreeMap;
use std::fs;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use snap_report::mode::{SignalRegistry, SystemProperties, prepare_test_invocation};
use snap_report::report::{
    CaptureResult, CaptureResults, Outcome, RenderOptions, ReportError, finalize_run,
};
use snap_report::workspace::RunPaths;

fn record(identifier: &str, outcome: Outcome) -> CaptureResult {
    CaptureResult {
        identifier: identifier.to_string(),
        outcome,
        golden_image_path: None,
        actual_image_path: None,
        comparison_image_path: None,
        diff_percentage: None,
        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

fn write_record(paths: &RunPaths, name: &str, result: &CaptureResult) {
    fs::create_dir_all(&paths.results_dir).expect("Failed to create results dir");
    let json = serde_json::to_string(result).expect("Failed to serialize record");
    fs::write(paths.results_dir.join(name), json).expect("Failed to write record");
}

#[test]
fn test_mixed_outcome_end_to_end() {
    let temp = TempDir::new().unwrap();
    let paths = RunPaths::from_build_dir(temp.path());

    // Filenames sort in write order so the report order is predictable
    write_record(&paths, "01_login.json", &record("LoginTest.launch", Outcome::Added));
    write_record(&paths, "02_signup.json", &record("SignupTest.launch", Outcome::Added));
    write_record(&paths, "03_home.json", &record("HomeTest.scroll", Outcome::Changed));
    write_record(&paths, "04_detail.json", &record("DetailTest.open", Outcome::Unchanged));
    write_record(&paths, "05_crash.json", &record("CrashTest.boom", Outcome::Failed));

    let results = finalize_run(&paths, &RenderOptions::default()).unwrap();

    assert_eq!(results.summary.added, 2);
    assert_eq!(results.summary.changed, 1);
    assert_eq!(results.summary.unchanged, 1);
    assert_eq!(results.summary.failed, 1);
    assert_eq!(results.summary.total, 5);
    assert!(results.summary.has_changes);

    // Report contains all five entries in discovery order
    let report = fs::read_to_string(&paths.report_file).unwrap();
    let positions: Vec<usize> = [
        "LoginTest.launch",
        "SignupTest.launch",
        "HomeTest.scroll",
        "DetailTest.open",
        "CrashTest.boom",
    ]
    .iter()
    .map(|id| report.find(id).unwrap_or_else(|| panic!("{} missing from report", id)))
    .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);

    // Summary file round-trips to an equal aggregate
    let reparsed =
        CaptureResults::from_json(&fs::read_to_string(&paths.summary_file).unwrap()).unwrap();
    assert_eq!(results, reparsed);
}

#[test]
fn test_clean_slate_excludes_previous_run() {
    let temp = TempDir::new().unwrap();
    let paths = RunPaths::from_build_dir(temp.path());

    // A previous run left records behind
    write_record(&paths, "old1.json", &record("old.one", Outcome::Changed));
    write_record(&paths, "old2.json", &record("old.two", Outcome::Failed));
    write_record(&paths, "old3.json", &record("old.three", Outcome::Added));

    // Signals resolve through the two-phase registry, after the stale
    // files already exist (the graph-finalized barrier)
    let signals = SignalRegistry::new().watch_verify(|| true).resolve();
    let mut sink = SystemProperties::new();
    let prepared =
        prepare_test_invocation(&signals, &BTreeMap::new(), &paths, &mut sink).unwrap();
    assert!(prepared);
    assert!(paths.results_dir.exists());
    assert_eq!(fs::read_dir(&paths.results_dir).unwrap().count(), 0);

    // The new run writes one record; only it is aggregated
    write_record(&paths, "new.json", &record("new.case", Outcome::Unchanged));
    let results = finalize_run(&paths, &RenderOptions::default()).unwrap();
    assert_eq!(results.summary.total, 1);
    assert_eq!(results.summary.unchanged, 1);
    assert!(!results.summary.has_changes);
}

#[test]
fn test_run_without_results_directory() {
    let temp = TempDir::new().unwrap();
    let paths = RunPaths::from_build_dir(temp.path());

    let results = finalize_run(&paths, &RenderOptions::default()).unwrap();

    assert!(results.results.is_empty());
    assert_eq!(results.summary.total, 0);

    let report = fs::read_to_string(&paths.report_file).unwrap();
    assert!(report.contains("No capture results"));
    assert!(paths.summary_file.exists());
}

#[test]
fn test_malformed_record_fails_finalize() {
    let temp = TempDir::new().unwrap();
    let paths = RunPaths::from_build_dir(temp.path());

    write_record(&paths, "fine.json", &record("fine", Outcome::Recorded));
    fs::write(paths.results_dir.join("corrupt.json"), "{ \"identifier\": ").unwrap();

    let err = finalize_run(&paths, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, ReportError::MalformedRecord(_, _)));

    // Nothing was written: corruption must not be reported as a valid run
    assert!(!paths.summary_file.exists());
    assert!(!paths.report_file.exists());
}

#[test]
fn test_non_record_files_are_tolerated() {
    let temp = TempDir::new().unwrap();
    let paths = RunPaths::from_build_dir(temp.path());

    write_record(&paths, "shot.json", &record("shot", Outcome::Added));
    fs::write(paths.results_dir.join("shot.png"), b"\x89PNG").unwrap();

    let results = finalize_run(&paths, &RenderOptions::default()).unwrap();
    assert_eq!(results.summary.total, 1);
}
