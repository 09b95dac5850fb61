//! Mapping reduced-basis scores to full-mode scores.
//!
//! Sampling the full mode basis directly can produce self-intersecting or
//! otherwise anatomically impossible limbs. The released models therefore
//! sample a reduced "skin-only" basis and project the sample into the
//! manifold of plausible full-mode combinations with a regression model
//! trained jointly on reduced and full scores from real scans.

use nalgebra::{DMatrix, DVector};

use crate::error::{SsmError, SsmResult};

/// A pre-trained mapping from raw reduced-basis scores to full-mode scores.
///
/// The model is opaque at this layer: anything exposing a fixed-size
/// vector-to-vector mapping qualifies. Input and output dimensionality need
/// not agree; the output length must equal the shape model's mode count for
/// reconstruction to proceed.
///
/// Any inference failure is fatal for the generation request. There is no
/// principled default prediction to fall back to.
pub trait ScorePredictor {
    /// Input dimensionality the model was trained on.
    fn input_len(&self) -> usize;

    /// Output dimensionality (full-mode score count).
    fn output_len(&self) -> usize;

    /// Map a raw score vector to a full-mode score vector.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw.len() != self.input_len()`.
    fn predict(&self, raw: &DVector<f64>) -> SsmResult<DVector<f64>>;
}

/// A linear regression predictor: `y = W·x + b`.
///
/// This is the Rust rendition of the released models' pickled scikit-learn
/// `LinearRegression` artifact: a coefficient matrix of shape
/// `output_len x input_len` and an intercept of length `output_len`.
///
/// # Example
///
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use ssm_core::{LinearRegressor, ScorePredictor};
///
/// // 2 outputs from 3 inputs.
/// let weights = DMatrix::from_row_slice(2, 3, &[
///     1.0, 0.0, 0.0,
///     0.0, 2.0, 0.0,
/// ]);
/// let intercept = DVector::from_vec(vec![0.5, -0.5]);
/// let model = LinearRegressor::new(weights, intercept).unwrap();
///
/// let y = model.predict(&DVector::from_vec(vec![1.0, 1.0, 9.0])).unwrap();
/// assert_eq!(y[0], 1.5);
/// assert_eq!(y[1], 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    weights: DMatrix<f64>,
    intercept: DVector<f64>,
}

impl LinearRegressor {
    /// Build a regressor from a coefficient matrix and intercept vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix row count and intercept length differ.
    pub fn new(weights: DMatrix<f64>, intercept: DVector<f64>) -> SsmResult<Self> {
        if weights.nrows() != intercept.len() {
            return Err(SsmError::RegressorShape {
                rows: weights.nrows(),
                intercept_len: intercept.len(),
            });
        }
        Ok(Self { weights, intercept })
    }

    /// The identity mapping on `len` scores.
    ///
    /// Useful for tests and for driving the full basis directly when the
    /// raw and full bases coincide.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            weights: DMatrix::identity(len, len),
            intercept: DVector::zeros(len),
        }
    }
}

impl ScorePredictor for LinearRegressor {
    fn input_len(&self) -> usize {
        self.weights.ncols()
    }

    fn output_len(&self) -> usize {
        self.weights.nrows()
    }

    fn predict(&self, raw: &DVector<f64>) -> SsmResult<DVector<f64>> {
        if raw.len() != self.input_len() {
            return Err(SsmError::PredictorInputMismatch {
                expected: self.input_len(),
                actual: raw.len(),
            });
        }
        Ok(&self.weights * raw + &self.intercept)
    }
}
