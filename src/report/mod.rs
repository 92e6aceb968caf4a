pub mod reader;
pub mod render;
pub mod sink;
pub mod types;

pub use reader::read_results_dir;
pub use render::{RenderOptions, render_report_body};
pub use sink::{REPORT_BODY_PLACEHOLDER, REPORT_TEMPLATE, finalize_run, write_report, write_summary};
pub use types::{CaptureResult, CaptureResults, Outcome, ReportError, ReportResult, ResultSummary};
