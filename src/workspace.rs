//! Run directory layout and lifecycle.
//!
//! Derives the fixed artifact locations for one test run from a build
//! directory root and owns the pre-run clean-slate step: the results
//! directory only ever contains records from the current run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Results directory, relative to the build directory
pub const RESULTS_DIR_FROM_BUILD: &str = "test-results/snapreport/results";

/// Summary file, relative to the build directory
pub const SUMMARY_FILE_FROM_BUILD: &str = "test-results/snapreport/results-summary.json";

/// Report file, relative to the build directory
pub const REPORT_FILE_FROM_BUILD: &str = "reports/snapreport/index.html";

/// Snapshot output directory, relative to the build directory
pub const DEFAULT_OUTPUT_DIR: &str = "outputs/snapshots";

/// Artifact locations for one run
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Directory the capture step writes record files into
    pub results_dir: PathBuf,

    /// Structured summary artifact
    pub summary_file: PathBuf,

    /// Static report artifact
    pub report_file: PathBuf,

    /// Directory golden/actual/comparison images live under
    pub output_dir: PathBuf,

    /// Project root, passed through to the test invocation
    pub project_dir: PathBuf,
}

impl RunPaths {
    /// Derive the standard layout below `build_dir`
    pub fn from_build_dir(build_dir: impl AsRef<Path>) -> Self {
        let build_dir = build_dir.as_ref();
        Self {
            results_dir: build_dir.join(RESULTS_DIR_FROM_BUILD),
            summary_file: build_dir.join(SUMMARY_FILE_FROM_BUILD),
            report_file: build_dir.join(REPORT_FILE_FROM_BUILD),
            output_dir: build_dir.join(DEFAULT_OUTPUT_DIR),
            project_dir: PathBuf::from("."),
        }
    }

    /// Derive the layout from environment-backed configuration
    pub fn from_config(config: &Config) -> Self {
        Self::from_build_dir(&config.build_dir)
            .output_dir(Path::new(&config.build_dir).join(&config.output_dir))
            .project_dir(&config.project_dir)
    }

    /// Override the snapshot output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override the project root
    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Delete and recreate the results directory.
    ///
    /// Runs before any test worker writes a record. Failure is fatal to
    /// the run: proceeding with possibly-stale leftover files would let a
    /// previous run's records leak into this run's summary.
    pub fn clear_results_dir(&self) -> std::io::Result<()> {
        clear_dir(&self.results_dir)
    }
}

/// Delete `dir` if present, then recreate it empty
pub fn clear_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}
