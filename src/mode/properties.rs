//! Property pass-through into test invocations.
//!
//! The resolver communicates the effective mode to test workers through
//! key/value properties. Two structurally different test backends share
//! that contract: one accepts per-process properties directly, the other
//! can only be reached through its child environment, so its sink is an
//! adapter mapping each property onto a prefixed environment variable.

use std::collections::BTreeMap;

/// Environment prefix used by the child-env adapter
pub const CHILD_ENV_PREFIX: &str = "SNAP_CHILD_";

/// A destination for test-invocation properties
pub trait PropertySink: std::fmt::Debug {
    /// Set one property on the test invocation
    fn set_property(&mut self, key: &str, value: String);

    /// All properties set so far, keyed by property name
    fn properties(&self) -> BTreeMap<String, String>;
}

/// Plain per-process property map
#[derive(Debug, Default)]
pub struct SystemProperties {
    properties: BTreeMap<String, String>,
}

impl SystemProperties {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertySink for SystemProperties {
    fn set_property(&mut self, key: &str, value: String) {
        self.properties.insert(key.to_string(), value);
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.properties.clone()
    }
}

/// Adapter for backends without real process properties: each property
/// becomes an environment variable under [`CHILD_ENV_PREFIX`], and
/// `properties()` strips the prefix back off.
#[derive(Debug)]
pub struct ChildEnvProperties {
    prefix: String,
    environment: BTreeMap<String, String>,
}

impl ChildEnvProperties {
    pub fn new() -> Self {
        Self::with_prefix(CHILD_ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            environment: BTreeMap::new(),
        }
    }

    /// The raw environment map handed to the child process
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }
}

impl Default for ChildEnvProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySink for ChildEnvProperties {
    fn set_property(&mut self, key: &str, value: String) {
        self.environment
            .insert(format!("{}{}", self.prefix, key), value);
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.environment
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&self.prefix)
                    .map(|stripped| (stripped.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Result type for mode configuration
pub type ModeResult<T> = Result<T, ModeError>;

/// Errors raised while configuring a test invocation
#[derive(Debug)]
pub enum ModeError {
    /// The test backend kind is not one this crate knows how to drive.
    /// Raised at configuration time, never deferred to the run.
    UnsupportedBackend(String),
}

impl std::fmt::Display for ModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeError::UnsupportedBackend(kind) => {
                write!(f, "Unsupported test backend: {}", kind)
            }
        }
    }
}

impl std::error::Error for ModeError {}

/// Construct the property sink for a configured backend kind
pub fn sink_for_backend(kind: &str) -> ModeResult<Box<dyn PropertySink>> {
    match kind {
        "process" => Ok(Box::new(SystemProperties::new())),
        "child-env" => Ok(Box::new(ChildEnvProperties::new())),
        other => Err(ModeError::UnsupportedBackend(other.to_string())),
    }
}
