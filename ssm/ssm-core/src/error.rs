//! Error types for the SSM sampling pipeline.

use thiserror::Error;

/// Errors that can occur while building a shape model or generating a shape.
///
/// Every variant is fatal for the generation request it occurs in: the
/// pipeline never falls back to a default shape or writes a partially
/// reconstructed mesh.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SsmError {
    /// The mean shape has no vertices.
    #[error("mean shape has no vertices")]
    EmptyMeanShape,

    /// A mode vector's length does not match the mean shape.
    #[error(
        "mode {mode_index} has {actual} coordinates, expected {expected} \
         (3 x mean vertex count)"
    )]
    ModeLengthMismatch {
        /// Index of the offending mode.
        mode_index: usize,
        /// Expected flat length (3N).
        expected: usize,
        /// Actual flat length.
        actual: usize,
    },

    /// The flat mode matrix does not factor into the declared mode count.
    #[error("mode matrix has {actual} values, expected {expected} ({mode_count} modes x 3N)")]
    ModeMatrixShape {
        /// Declared number of modes.
        mode_count: usize,
        /// Expected total length.
        expected: usize,
        /// Actual total length.
        actual: usize,
    },

    /// A score vector's length does not match the model's mode count.
    #[error("score vector has {actual} entries, expected {expected} (model mode count)")]
    ScoreCountMismatch {
        /// Expected number of scores.
        expected: usize,
        /// Actual number of scores.
        actual: usize,
    },

    /// The raw score vector does not match the predictor's input size.
    #[error("predictor expects {expected} input scores, got {actual}")]
    PredictorInputMismatch {
        /// Input dimensionality the predictor was trained on.
        expected: usize,
        /// Length of the vector supplied.
        actual: usize,
    },

    /// The predictor's weight matrix and intercept disagree.
    #[error("regressor weights have {rows} rows but intercept has {intercept_len} entries")]
    RegressorShape {
        /// Rows of the coefficient matrix.
        rows: usize,
        /// Length of the intercept vector.
        intercept_len: usize,
    },

    /// An enabled mode index is outside the model's mode range.
    #[error("mode index {index} out of range (model has {mode_count} modes)")]
    ModeIndexOutOfRange {
        /// The invalid index.
        index: usize,
        /// Number of modes in the model.
        mode_count: usize,
    },

    /// The range table has no entries.
    #[error("range table is empty")]
    EmptyRangeTable,

    /// A range table entry is not a finite interval.
    #[error("range table entry {index} is not finite: [{lo}, {hi}]")]
    NonFiniteRange {
        /// Index of the offending entry.
        index: usize,
        /// Lower bound as given.
        lo: f64,
        /// Upper bound as given.
        hi: f64,
    },

    /// A scale factor was zero, negative, or not finite.
    #[error("scale factor must be strictly positive and finite, got {0}")]
    InvalidScaleFactor(f64),
}

/// Result type for SSM operations.
pub type SsmResult<T> = Result<T, SsmError>;
