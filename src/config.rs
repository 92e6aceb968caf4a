//! Configuration management with environment variable support.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SNAPREPORT_BUILD_DIR` | Build directory artifacts live under | `build` |
//! | `SNAPREPORT_OUTPUT_DIR` | Snapshot output directory (relative to build dir) | `outputs/snapshots` |
//! | `SNAPREPORT_PROJECT_DIR` | Project root passed to test invocations | `.` |

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default build directory
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default snapshot output directory, relative to the build directory
pub const DEFAULT_OUTPUT_DIR: &str = "outputs/snapshots";

/// Default project root
pub const DEFAULT_PROJECT_DIR: &str = ".";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the build directory
pub const ENV_BUILD_DIR: &str = "SNAPREPORT_BUILD_DIR";

/// Environment variable for the snapshot output directory
pub const ENV_OUTPUT_DIR: &str = "SNAPREPORT_OUTPUT_DIR";

/// Environment variable for the project root
pub const ENV_PROJECT_DIR: &str = "SNAPREPORT_PROJECT_DIR";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for snap-report
#[derive(Debug, Clone)]
pub struct Config {
    /// Build directory artifacts live under
    pub build_dir: String,
    /// Snapshot output directory, relative to the build directory
    pub output_dir: String,
    /// Project root passed to test invocations
    pub project_dir: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            build_dir: env::var(ENV_BUILD_DIR).unwrap_or_else(|_| DEFAULT_BUILD_DIR.to_string()),
            output_dir: env::var(ENV_OUTPUT_DIR)
                .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string()),
            project_dir: env::var(ENV_PROJECT_DIR)
                .unwrap_or_else(|_| DEFAULT_PROJECT_DIR.to_string()),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            project_dir: DEFAULT_PROJECT_DIR.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Get the build directory (convenience function)
pub fn build_dir() -> String {
    get().build_dir.clone()
}

/// Get the project root (convenience function)
pub fn project_dir() -> String {
    get().project_dir.clone()
}
