//! snap-report - Snapshot test result aggregation and report generation.
//!
//! This crate provides:
//! - Run-mode resolution (record / verify / compare / verify-and-record)
//!   from task-scheduling signals and property overrides
//! - Capture record reading from a per-run results directory
//! - Deterministic aggregation of per-test capture results
//! - Self-contained static HTML report rendering
//! - Durable summary/report artifacts with a clean-slate results lifecycle
//!
//! # Example
//!
//! ```rust,no_run
//! use snap_report::report::{RenderOptions, finalize_run};
//! use snap_report::workspace::RunPaths;
//!
//! let paths = RunPaths::from_build_dir("build");
//! let results = finalize_run(&paths, &RenderOptions::default()).unwrap();
//! println!("captures: {}", results.summary.total);
//! ```

pub mod config;
pub mod mode;
pub mod report;
pub mod workspace;

// Re-export mode types
pub use mode::{
    ChildEnvProperties, EffectiveFlags, ModeError, PropertySink, SignalRegistry, SystemProperties,
    TaskSignals, apply_to_test, effective_flags, is_active, prepare_test_invocation,
    sink_for_backend,
};

// Re-export report types and operations
pub use report::{
    CaptureResult, CaptureResults, Outcome, RenderOptions, ReportError, ReportResult,
    ResultSummary, finalize_run, read_results_dir, render_report_body, write_report,
    write_summary,
};

// Re-export workspace paths
pub use workspace::RunPaths;
