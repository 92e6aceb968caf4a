//! Durable output artifacts.
//!
//! Writes the two per-run artifacts: the structured summary file (full
//! fidelity JSON) and the static report file, produced by substituting
//! the rendered body into [`REPORT_TEMPLATE`] at the placeholder token.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::report::reader::read_results_dir;
use crate::report::render::{RenderOptions, render_report_body};
use crate::report::types::{CaptureResults, ReportResult};
use crate::workspace::RunPaths;

/// Literal token replaced by the rendered report body
pub const REPORT_BODY_PLACEHOLDER: &str = "REPORT_TEMPLATE_BODY";

/// Fixed report document. Self-contained: inline CSS, no scripts, no
/// network assets, so the report opens offline from a build directory.
pub const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Snapshot Report</title>
<style>
  body { font-family: sans-serif; margin: 2rem; color: #222; }
  h1 { font-size: 1.4rem; }
  .summary { margin: 1rem 0; }
  .badge { display: inline-block; padding: 0.15rem 0.6rem; margin-right: 0.4rem;
           border-radius: 0.8rem; font-size: 0.85rem; background: #eee; }
  .badge.added { background: #d8ecd8; }
  .badge.changed { background: #fde2b8; }
  .badge.unchanged { background: #e2e8f0; }
  .badge.recorded { background: #d8e4f5; }
  .badge.failed { background: #f5d8d8; }
  .result { border: 1px solid #ddd; border-radius: 4px; padding: 1rem; margin: 1rem 0; }
  .result h3 { margin: 0 0 0.5rem 0; font-size: 1rem; word-break: break-all; }
  .result figure { display: inline-block; margin: 0.5rem 1rem 0.5rem 0; vertical-align: top; }
  .result img { max-width: 320px; height: auto; border: 1px solid #ccc; }
  .result figcaption { font-size: 0.8rem; color: #666; text-align: center; }
  .diff { font-size: 0.85rem; color: #a05a00; }
  .empty { color: #666; }
</style>
</head>
<body>
<h1>Snapshot Report</h1>
REPORT_TEMPLATE_BODY
</body>
</html>
"#;

/// Write the structured summary file, creating parent directories
pub fn write_summary(results: &CaptureResults, path: &Path) -> ReportResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, results.to_json()?)?;
    Ok(())
}

/// Write the report file, creating parent directories. Image links are
/// resolved against the report file's directory.
pub fn write_report(
    results: &CaptureResults,
    path: &Path,
    options: &RenderOptions,
) -> ReportResult<()> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(base_dir)?;
    let body = render_report_body(results, base_dir, options);
    let document = REPORT_TEMPLATE.replace(REPORT_BODY_PLACEHOLDER, &body);
    fs::write(path, document)?;
    Ok(())
}

/// The post-barrier pipeline: read all capture records, aggregate them,
/// and write both artifacts.
///
/// Must only run after the external test execution has finished writing
/// records; reading a partial set would silently under-report.
pub fn finalize_run(paths: &RunPaths, options: &RenderOptions) -> ReportResult<CaptureResults> {
    let records = read_results_dir(&paths.results_dir)?;
    let aggregated = CaptureResults::from_results(records);

    info!(
        results = aggregated.summary.total,
        summary = ?aggregated.summary,
        path = %paths.summary_file.display(),
        "saving result summary"
    );
    write_summary(&aggregated, &paths.summary_file)?;

    info!(path = %paths.report_file.display(), "writing report");
    write_report(&aggregated, &paths.report_file, options)?;

    Ok(aggregated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{CaptureResult, Outcome};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn result(identifier: &str, outcome: Outcome) -> CaptureResult {
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

    #[test]
    fn test_write_summary_creates_parents_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/results-summary.json");
        let aggregated = CaptureResults::from_results(vec![
            result("a", Outcome::Added),
            result("b", Outcome::Failed),
        ]);

        write_summary(&aggregated, &path).unwrap();

        let reparsed =
            CaptureResults::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(aggregated, reparsed);
    }

    #[test]
    fn test_write_report_substitutes_placeholder() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports/index.html");
        let aggregated =
            CaptureResults::from_results(vec![result("com.example.Test", Outcome::Changed)]);

        write_report(&aggregated, &path, &RenderOptions::default()).unwrap();

        let document = fs::read_to_string(&path).unwrap();
        assert!(document.contains("com.example.Test"));
        assert!(document.contains("<!DOCTYPE html>"));
        assert!(!document.contains(REPORT_BODY_PLACEHOLDER));
    }

    #[test]
    fn test_template_contains_placeholder_once() {
        assert_eq!(REPORT_TEMPLATE.matches(REPORT_BODY_PLACEHOLDER).count(), 1);
    }
}
