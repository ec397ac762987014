//! Error types for pipeline instrumentation.

use thiserror::Error;

/// Errors that can occur while configuring instrumentation or exporting results.
///
/// Instrumentation itself never fails; only loading configuration and
/// serializing reports can.
#[derive(Debug, Error)]
pub enum PerfError {
    /// Runtime mode string is not recognized
    #[error("Unknown runtime mode: {0}")]
    UnknownRuntimeMode(String),

    /// Failed to parse configuration or serialize a report
    #[error("Serialization error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for instrumentation setup.
pub type PerfResult<T> = Result<T, PerfError>;
