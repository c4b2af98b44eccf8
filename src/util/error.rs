//! Error types for detnms.

use thiserror::Error;

/// Result alias for detnms operations.
pub type NmsResult<T> = std::result::Result<T, NmsError>;

/// Errors that can occur when running suppression or overlap routines.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NmsError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A threshold or decay parameter is outside its valid range.
    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    /// The soft-NMS decay method name is not recognized.
    #[error("invalid soft-NMS method {0:?} (expected \"linear\" or \"gaussian\")")]
    UnknownDecayMethod(String),
    /// Candidate rows do not have the column count the routine expects.
    #[error("shape mismatch for {what}: expected {expected} columns, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// Scores and candidates have different lengths.
    #[error("length mismatch: {candidates} candidates but {scores} scores")]
    LengthMismatch { candidates: usize, scores: usize },
    /// Per-keypoint sigmas are empty, non-finite or not positive.
    #[error("invalid keypoint sigmas: {0}")]
    InvalidSigmas(&'static str),
    /// The requested execution backend is not compiled in.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(&'static str),
}
