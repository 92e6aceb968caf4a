//! Effective run-mode resolution.
//!
//! Combines the resolved task-scheduling signals with externally supplied
//! property overrides into the effective flags for one test invocation.
//! Scheduled tasks win: if any signal is set, every test-scoped override
//! is dropped for the whole run rather than merged, so a stale command
//! line can never combine with a freshly scheduled task into an
//! inconsistent mode.

use std::collections::BTreeMap;

use tracing::debug;

use crate::mode::properties::PropertySink;
use crate::mode::signals::TaskSignals;
use crate::workspace::RunPaths;

/// Namespace of override keys owned by mode resolution
pub const TEST_PROPERTY_NAMESPACE: &str = "snapreport.test";

/// Effective record flag passed to the test invocation
pub const PROP_TEST_RECORD: &str = "snapreport.test.record";

/// Effective verify flag passed to the test invocation
pub const PROP_TEST_VERIFY: &str = "snapreport.test.verify";

/// Effective compare flag passed to the test invocation
pub const PROP_TEST_COMPARE: &str = "snapreport.test.compare";

/// Snapshot output directory passed to the test invocation
pub const PROP_OUTPUT_DIR: &str = "snapreport.output.dir";

/// Results directory passed to the test invocation
pub const PROP_RESULT_DIR: &str = "snapreport.result.dir";

/// Project root passed to the test invocation
pub const PROP_PROJECT_PATH: &str = "snapreport.project.path";

/// The resolved mode flags for one test invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectiveFlags {
    pub record: bool,
    pub verify: bool,
    pub compare: bool,
}

/// True when `value` enables a boolean-like override. Only the literal
/// `"true"` counts.
fn is_enabled(value: Option<&String>) -> bool {
    value.map(|v| v == "true").unwrap_or(false)
}

/// True when any test-scoped override key requests a mode
fn has_mode_override(overrides: &BTreeMap<String, String>) -> bool {
    is_enabled(overrides.get(PROP_TEST_RECORD))
        || is_enabled(overrides.get(PROP_TEST_VERIFY))
        || is_enabled(overrides.get(PROP_TEST_COMPARE))
}

/// Master gate: does the snapshot workflow run at all for this
/// invocation? When false, no mode configuration is applied and the
/// results directory is left untouched.
pub fn is_active(signals: &TaskSignals, overrides: &BTreeMap<String, String>) -> bool {
    signals.any_scheduled() || has_mode_override(overrides)
}

/// Resolve the effective flags.
///
/// With any signal scheduled, the flags derive from the signals alone
/// (verify-and-record implies both) and test-scoped overrides are
/// ignored. With no signal scheduled, the flags come verbatim from the
/// overrides.
pub fn effective_flags(
    signals: &TaskSignals,
    overrides: &BTreeMap<String, String>,
) -> EffectiveFlags {
    if signals.any_scheduled() {
        EffectiveFlags {
            record: signals.record || signals.verify_and_record,
            verify: signals.verify || signals.verify_and_record,
            compare: signals.compare,
        }
    } else {
        EffectiveFlags {
            record: is_enabled(overrides.get(PROP_TEST_RECORD)),
            verify: is_enabled(overrides.get(PROP_TEST_VERIFY)),
            compare: is_enabled(overrides.get(PROP_TEST_COMPARE)),
        }
    }
}

/// Write the mode configuration for one test invocation into `sink`.
///
/// Returns false without touching the sink when the master gate is
/// closed. Otherwise applies the precedence rule, then the pass-through
/// path properties.
pub fn apply_to_test(
    signals: &TaskSignals,
    overrides: &BTreeMap<String, String>,
    paths: &RunPaths,
    sink: &mut dyn PropertySink,
) -> bool {
    if !is_active(signals, overrides) {
        return false;
    }

    if !signals.any_scheduled() {
        // No scheduled task: overrides pass through verbatim,
        // test-scoped keys included
        for (key, value) in overrides {
            sink.set_property(key, value.clone());
        }
    } else {
        let mut dropped = 0usize;
        for (key, value) in overrides {
            if key.starts_with(TEST_PROPERTY_NAMESPACE) {
                dropped += 1;
            } else {
                sink.set_property(key, value.clone());
            }
        }
        if dropped > 0 {
            debug!(dropped, "scheduled task present, dropping test-scoped overrides");
        }

        let flags = effective_flags(signals, overrides);
        sink.set_property(PROP_TEST_RECORD, flags.record.to_string());
        sink.set_property(PROP_TEST_COMPARE, flags.compare.to_string());
        sink.set_property(PROP_TEST_VERIFY, flags.verify.to_string());
    }

    sink.set_property(
        PROP_OUTPUT_DIR,
        paths.output_dir.to_string_lossy().into_owned(),
    );
    sink.set_property(
        PROP_RESULT_DIR,
        paths.results_dir.to_string_lossy().into_owned(),
    );
    sink.set_property(
        PROP_PROJECT_PATH,
        paths.project_dir.to_string_lossy().into_owned(),
    );
    true
}

/// Configure one test invocation and, when the gate is open, establish
/// the clean-slate results directory.
///
/// The directory clear is scoped resource acquisition: it must complete
/// (or visibly fail) before any test worker writes a record, and its
/// failure is fatal to the run.
pub fn prepare_test_invocation(
    signals: &TaskSignals,
    overrides: &BTreeMap<String, String>,
    paths: &RunPaths,
    sink: &mut dyn PropertySink,
) -> std::io::Result<bool> {
    if !apply_to_test(signals, overrides, paths, sink) {
        return Ok(false);
    }
    paths.clear_results_dir()?;
    Ok(true)
}
