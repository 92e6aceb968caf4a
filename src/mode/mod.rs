pub mod properties;
pub mod resolver;
pub mod signals;

pub use properties::{
    CHILD_ENV_PREFIX, ChildEnvProperties, ModeError, ModeResult, PropertySink, SystemProperties,
    sink_for_backend,
};
pub use resolver::{
    EffectiveFlags, PROP_OUTPUT_DIR, PROP_PROJECT_PATH, PROP_RESULT_DIR, PROP_TEST_COMPARE,
    PROP_TEST_RECORD, PROP_TEST_VERIFY, TEST_PROPERTY_NAMESPACE, apply_to_test, effective_flags,
    is_active, prepare_test_invocation,
};
pub use signals::{SignalRegistry, TaskSignals};
