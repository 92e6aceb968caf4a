//! Two-phase task-signal resolution.
//!
//! Whether a record/verify/compare task is scheduled is only knowable
//! once the host build system has finalized its task graph. Reading the
//! signals earlier is a bug class this module rules out structurally:
//! probes are registered while the graph is still being built, and
//! evaluated exactly once when the registry is consumed by
//! [`SignalRegistry::resolve`], after the graph-finalized barrier.

/// Immutable resolved scheduling signals for one test invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSignals {
    /// A record task is scheduled
    pub record: bool,

    /// A verify task is scheduled
    pub verify: bool,

    /// A compare task is scheduled
    pub compare: bool,

    /// A verify-and-record task is scheduled
    pub verify_and_record: bool,
}

impl TaskSignals {
    /// True when any task-scheduling signal is set
    pub fn any_scheduled(&self) -> bool {
        self.record || self.verify || self.compare || self.verify_and_record
    }
}

type Probe = Box<dyn FnOnce() -> bool>;

/// Registration phase of the two-phase protocol.
///
/// Each `watch_*` records a lazy probe; none of them run until
/// [`resolve`](Self::resolve) consumes the registry. An unregistered
/// signal resolves to false.
#[derive(Default)]
pub struct SignalRegistry {
    record: Option<Probe>,
    verify: Option<Probe>,
    compare: Option<Probe>,
    verify_and_record: Option<Probe>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch_record(mut self, probe: impl FnOnce() -> bool + 'static) -> Self {
        self.record = Some(Box::new(probe));
        self
    }

    pub fn watch_verify(mut self, probe: impl FnOnce() -> bool + 'static) -> Self {
        self.verify = Some(Box::new(probe));
        self
    }

    pub fn watch_compare(mut self, probe: impl FnOnce() -> bool + 'static) -> Self {
        self.compare = Some(Box::new(probe));
        self
    }

    pub fn watch_verify_and_record(mut self, probe: impl FnOnce() -> bool + 'static) -> Self {
        self.verify_and_record = Some(Box::new(probe));
        self
    }

    /// Resolution phase: evaluate every registered probe exactly once and
    /// return the immutable signal set. Consuming `self` makes a second
    /// or premature read unrepresentable.
    pub fn resolve(self) -> TaskSignals {
        TaskSignals {
            record: self.record.map(|probe| probe()).unwrap_or(false),
            verify: self.verify.map(|probe| probe()).unwrap_or(false),
            compare: self.compare.map(|probe| probe()).unwrap_or(false),
            verify_and_record: self
                .verify_and_record
                .map(|probe| probe())
                .unwrap_or(false),
        }
    }
}

impl std::fmt::Debug for SignalRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalRegistry")
            .field("record", &self.record.is_some())
            .field("verify", &self.verify.is_some())
            .field("compare", &self.compare.is_some())
            .field("verify_and_record", &self.verify_and_record.is_some())
            .finish()
    }
}
