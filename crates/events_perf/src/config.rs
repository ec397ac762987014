//! Instrumentation configuration
//!
//! The facade never reads the process environment. A config is built once,
//! from the environment, from JSON, or in code, and injected at construction.

use crate::error::{PerfError, PerfResult};
use perf_marks::DEFAULT_MAX_OPEN_MARKS;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable holding the process runtime mode.
pub const RUNTIME_MODE_ENV: &str = "APP_ENV";

/// Mode the process is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Test and instrumentation runs
    Test,
    /// Local development
    Development,
    /// Pre-production
    Staging,
    /// Normal production operation
    #[default]
    Production,
}

impl RuntimeMode {
    /// Check if timing instrumentation is active in this mode.
    pub fn is_instrumented(self) -> bool {
        matches!(self, RuntimeMode::Test)
    }

    /// Read a mode from an environment value.
    ///
    /// Unrecognized values never fail; they select production mode so
    /// instrumentation stays off.
    pub fn from_env_value(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            tracing::debug!(target: "perf", %err, "treating runtime mode as production");
            RuntimeMode::Production
        })
    }
}

impl FromStr for RuntimeMode {
    type Err = PerfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(RuntimeMode::Test),
            "development" => Ok(RuntimeMode::Development),
            "staging" => Ok(RuntimeMode::Staging),
            "production" => Ok(RuntimeMode::Production),
            _ => Err(PerfError::UnknownRuntimeMode(s.to_string())),
        }
    }
}

/// Which store contents are logged during a reporting cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogOptions {
    /// Log every tracked mark
    pub show_marks: bool,
    /// Log every measure with its duration
    pub show_measures: bool,
}

impl LogOptions {
    /// Log nothing.
    pub fn off() -> Self {
        Self::default()
    }

    /// Log marks and measures.
    pub fn all() -> Self {
        Self {
            show_marks: true,
            show_measures: true,
        }
    }
}

/// Instrumentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentationConfig {
    /// Runtime mode; instrumentation runs only in test mode
    pub mode: RuntimeMode,
    /// Logging applied by `publish_results`
    pub logging: LogOptions,
    /// Maximum simultaneously open marks before the oldest is evicted
    pub max_open_marks: usize,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Production,
            logging: LogOptions::off(),
            max_open_marks: DEFAULT_MAX_OPEN_MARKS,
        }
    }
}

impl InstrumentationConfig {
    /// Create a config for the given runtime mode.
    pub fn new(mode: RuntimeMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Create a config with instrumentation active.
    pub fn for_tests() -> Self {
        Self::new(RuntimeMode::Test)
    }

    /// Load the runtime mode from [`RUNTIME_MODE_ENV`].
    ///
    /// Only the exact value `test` enables instrumentation. Any other value,
    /// or an unset variable, means production mode.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(RUNTIME_MODE_ENV).ok().as_deref())
    }

    /// Build a config from the raw value of [`RUNTIME_MODE_ENV`].
    pub fn from_env_value(value: Option<&str>) -> Self {
        Self::new(value.map(RuntimeMode::from_env_value).unwrap_or_default())
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> PerfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder method to set logging options.
    pub fn with_logging(mut self, logging: LogOptions) -> Self {
        self.logging = logging;
        self
    }

    /// Check if instrumentation is active.
    pub fn is_enabled(&self) -> bool {
        self.mode.is_instrumented()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_mode_parsing() {
        assert_eq!("test".parse::<RuntimeMode>().unwrap(), RuntimeMode::Test);
        assert_eq!("development".parse::<RuntimeMode>().unwrap(), RuntimeMode::Development);
        assert_eq!("production".parse::<RuntimeMode>().unwrap(), RuntimeMode::Production);
        assert!(" TEST ".parse::<RuntimeMode>().is_err());
        assert!(matches!(
            "qa".parse::<RuntimeMode>(),
            Err(PerfError::UnknownRuntimeMode(_))
        ));
    }

    #[test]
    fn test_only_test_mode_is_instrumented() {
        assert!(RuntimeMode::Test.is_instrumented());
        assert!(!RuntimeMode::Development.is_instrumented());
        assert!(!RuntimeMode::Staging.is_instrumented());
        assert!(!RuntimeMode::Production.is_instrumented());
    }

    #[test]
    fn test_env_value_enables_only_exact_test() {
        assert!(InstrumentationConfig::from_env_value(Some("test")).is_enabled());

        for value in ["qa", " TEST ", "Test", "test ", ""] {
            let config = InstrumentationConfig::from_env_value(Some(value));
            assert!(!config.is_enabled(), "{:?} must not enable instrumentation", value);
            assert_eq!(config.mode, RuntimeMode::Production);
        }

        assert_eq!(
            InstrumentationConfig::from_env_value(Some("staging")).mode,
            RuntimeMode::Staging
        );
        assert_eq!(InstrumentationConfig::from_env_value(None), InstrumentationConfig::default());
    }

    #[test]
    fn test_default_is_disabled() {
        let config = InstrumentationConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.logging, LogOptions::off());
        assert!(InstrumentationConfig::for_tests().is_enabled());
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = InstrumentationConfig::from_json(
            r#"{"mode":"test","logging":{"showMeasures":true}}"#,
        )
        .unwrap();

        assert!(config.is_enabled());
        assert!(config.logging.show_measures);
        assert!(!config.logging.show_marks);
        assert_eq!(config.max_open_marks, DEFAULT_MAX_OPEN_MARKS);
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let result = InstrumentationConfig::from_json(r#"{"mode":"qa"}"#);
        assert!(matches!(result, Err(PerfError::Config(_))));
    }
}
