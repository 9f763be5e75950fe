//! Error types for rayo-bench

use thiserror::Error;

/// Errors that can occur while configuring a sweep
#[derive(Error, Debug)]
pub enum BenchError {
    /// Sweep step of zero would never terminate
    #[error("Invalid step: must be >= 1")]
    ZeroStep,

    /// At least one timed repetition is required
    #[error("Invalid loop count: must be >= 1")]
    ZeroLoops,

    /// Requested backend is not part of this build
    #[error("Backend unavailable: {0}")]
    Backend(#[from] rayo::Level1Error),
}

/// Result type alias for rayo-bench configuration
pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(BenchError::ZeroStep.to_string().contains("step"));
        assert!(BenchError::ZeroLoops.to_string().contains("loop"));
    }

    #[test]
    fn test_backend_error_from() {
        let err: BenchError = rayo::Level1Error::UnsupportedBackend(rayo::Backend::NEON).into();
        assert!(err.to_string().contains("NEON"));
    }
}
