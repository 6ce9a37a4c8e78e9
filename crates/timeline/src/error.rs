//! Error types for the timeline.

use thiserror::Error;

/// Errors that can occur when recording timeline entries.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A measure referenced a mark label that was never recorded
    #[error("no mark recorded for label: {label}")]
    MissingMark {
        /// The absent label
        label: String,
    },
}

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;
