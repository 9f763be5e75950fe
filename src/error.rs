//! Error types for rayo operations
//!
//! The BLAS-style entry points never fail: degenerate input is answered with
//! a sentinel (`0`, `0.0`, or a no-op). Errors only arise from the checked
//! descriptor API and from explicit backend selection.

use thiserror::Error;

use crate::Backend;

/// Result type for rayo operations
pub type Result<T> = std::result::Result<T, Level1Error>;

/// Errors that can occur when building descriptors or selecting a backend
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Level1Error {
    /// Backend not compiled into this build
    #[error("Backend not compiled into this build: {0:?}")]
    UnsupportedBackend(Backend),

    /// Stride is zero or negative
    #[error("Invalid stride: {0} (must be >= 1)")]
    InvalidStride(isize),

    /// Buffer cannot hold the described vector
    #[error("Buffer too short: need {required} elements, got {actual}")]
    BufferTooShort {
        /// Elements the descriptor reaches
        required: usize,
        /// Elements in the buffer
        actual: usize,
    },

    /// Last element offset does not fit in `usize`
    #[error("Descriptor reach overflows: {len} elements at stride {stride}")]
    ReachOverflow {
        /// Logical element count
        len: usize,
        /// Step between elements
        stride: usize,
    },

    /// Two vectors of one operation differ in logical length
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the source vector
        expected: usize,
        /// Length of the destination vector
        actual: usize,
    },
}
