//! Error types for the probes.

use thiserror::Error;

/// Errors that can occur when starting a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Sampling tasks require a running tokio runtime
    #[error("no tokio runtime available to spawn the sampler")]
    NoRuntime,
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProbeError::NoRuntime.to_string(),
            "no tokio runtime available to spawn the sampler"
        );
    }
}
