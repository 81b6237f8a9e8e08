//! Error taxonomy for the numeric core.
//!
//! Every variant is a deterministic precondition failure. Nothing here is
//! retried or recovered inside the crate; the caller fixes its input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    /// Fit needs at least 2 points, misfit at least 1.
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    /// All x values identical, so the slope is undefined.
    #[error("Degenerate input: x variance is {variance}, slope is undefined")]
    DegenerateInput { variance: f64 },

    #[error("Index out of range: index {index} for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Mismatched lengths: x has {x_len} values, y has {y_len}")]
    MismatchedLengths { x_len: usize, y_len: usize },

    #[error("Non-finite value at index {index}")]
    NonFiniteValue { index: usize },
}

pub type Result<T> = std::result::Result<T, TrendError>;
