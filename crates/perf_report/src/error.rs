//! Error types for performance reporting.

use thiserror::Error;

/// Errors that can occur while recording or publishing measurements.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The underlying timeline rejected a measure request
    #[error("timeline error: {0}")]
    Timeline(#[from] timeline::TimelineError),

    /// A sampling probe could not be started
    #[error("probe error: {0}")]
    Probe(#[from] loop_probe::ProbeError),
}

/// Result type for reporting operations.
pub type ReportResult<T> = Result<T, ReportError>;
