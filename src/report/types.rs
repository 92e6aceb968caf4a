// Core types for capture results and run summaries

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification of a single capture comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No golden image existed; a new one was produced
    Added,

    /// The capture differs from the golden image
    Changed,

    /// The capture matches the golden image
    Unchanged,

    /// A golden image was (re)written in record mode
    Recorded,

    /// The capture step itself failed
    Failed,
}

impl Outcome {
    /// Lowercase label used in summaries and report markup
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Added => "added",
            Outcome::Changed => "changed",
            Outcome::Unchanged => "unchanged",
            Outcome::Recorded => "recorded",
            Outcome::Failed => "failed",
        }
    }
}

/// One outcome for one test-identified capture.
///
/// Written as a single JSON file by the capture step, read exactly once
/// during finalization, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    /// Key uniquely naming the capture within a run
    /// (e.g. test class + method + capture index)
    pub identifier: String,

    /// Comparison outcome
    pub outcome: Outcome,

    /// Baseline image, when one exists for this capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golden_image_path: Option<PathBuf>,

    /// Image produced by this run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_image_path: Option<PathBuf>,

    /// Diff visualization produced by the comparator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_image_path: Option<PathBuf>,

    /// Pixel difference ratio reported by the comparator, when computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_percentage: Option<f64>,

    /// Creation time, informational only
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl CaptureResult {
    /// Create a result with no image references, timestamped now.
    ///
    /// The timestamp is truncated to whole seconds, the precision the
    /// record file format carries.
    pub fn new(identifier: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            identifier: identifier.into(),
            outcome,
            golden_image_path: None,
            actual_image_path: None,
            comparison_image_path: None,
            diff_percentage: None,
            timestamp: Utc::now().trunc_subsecs(0),
        }
    }
}

/// Derived counts for one run.
///
/// Always a pure function of the result list; never updated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub added: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub recorded: usize,
    pub failed: usize,
    pub total: usize,

    /// True when any result is Changed or Failed
    pub has_changes: bool,
}

impl ResultSummary {
    /// Compute the summary for a set of results
    pub fn of(results: &[CaptureResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.outcome {
                Outcome::Added => summary.added += 1,
                Outcome::Changed => summary.changed += 1,
                Outcome::Unchanged => summary.unchanged += 1,
                Outcome::Recorded => summary.recorded += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
        summary.total = results.len();
        summary.has_changes = summary.changed > 0 || summary.failed > 0;
        summary
    }
}

/// The aggregate of all capture results for one run.
///
/// `summary` is recomputable from `results` alone; construct through
/// [`CaptureResults::from_results`] so the two can never drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResults {
    /// All results in discovery order. The order is not significant for
    /// the counts but is preserved so rendered reports are reproducible.
    pub results: Vec<CaptureResult>,

    /// Counts derived from `results`
    pub summary: ResultSummary,
}

impl CaptureResults {
    /// Aggregate a set of results, computing the summary
    pub fn from_results(results: Vec<CaptureResult>) -> Self {
        let summary = ResultSummary::of(&results);
        Self { results, summary }
    }

    /// Serialize to the summary-file JSON document
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a summary-file JSON document
    pub fn from_json(json: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Result type for aggregation and report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Error types for aggregation and report operations
#[derive(Debug)]
pub enum ReportError {
    /// I/O error
    Io(std::io::Error),

    /// Serialization error
    Json(serde_json::Error),

    /// A record file matched the expected extension but did not parse,
    /// signaling corrupted output from the capture step
    MalformedRecord(PathBuf, serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "I/O error: {}", err),
            ReportError::Json(err) => write!(f, "Serialization error: {}", err),
            ReportError::MalformedRecord(path, err) => {
                write!(f, "Malformed capture record {}: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Json(err) => Some(err),
            ReportError::MalformedRecord(_, err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Json(err)
    }
}
