//! JSON artifacts: the trained regression model and the score range table.
//!
//! Both files are small JSON documents exported from the training pipeline.
//! The regression artifact holds the affine map from reduced-basis scores
//! to full-mode scores as a dense weight matrix plus an intercept vector;
//! the range artifact holds one `[lo, hi]` pair per sampled component.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use ssm_core::{LinearRegressor, RangeTable};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// On-disk form of the regression artifact.
#[derive(Debug, Deserialize)]
struct RegressorFile {
    /// Weight matrix, one row per output mode score.
    weights: Vec<Vec<f64>>,
    /// Intercept vector, one entry per output mode score.
    intercept: Vec<f64>,
}

/// Load the trained regression model from a JSON file.
///
/// The document holds `weights` (an array of rows, one per predicted mode
/// score) and `intercept` (one value per predicted mode score). Row lengths
/// must agree; the shared row length is the regressor's input size.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, has
/// ragged rows, or fails the regressor's own shape check.
pub fn load_regressor<P: AsRef<Path>>(path: P) -> IoResult<LinearRegressor> {
    let path = path.as_ref();
    let file = open(path)?;
    let parsed: RegressorFile = serde_json::from_reader(BufReader::new(file))?;

    let rows = parsed.weights.len();
    let cols = parsed.weights.first().map_or(0, Vec::len);
    for (index, row) in parsed.weights.iter().enumerate() {
        if row.len() != cols {
            return Err(IoError::invalid_content(format!(
                "weight row {index} has {} entries, expected {cols}",
                row.len()
            )));
        }
    }

    let weights = DMatrix::from_fn(rows, cols, |r, c| parsed.weights[r][c]);
    let intercept = DVector::from_vec(parsed.intercept);

    debug!(outputs = rows, inputs = cols, path = %path.display(), "loaded regression model");
    LinearRegressor::new(weights, intercept).map_err(IoError::from)
}

/// Load the per-component score ranges from a JSON file.
///
/// The document is an array of two-element `[lo, hi]` arrays, one per
/// reduced component, in component order. Degenerate entries (`lo == hi`)
/// are valid.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, is
/// empty, or contains a non-finite bound.
pub fn load_range_table<P: AsRef<Path>>(path: P) -> IoResult<RangeTable> {
    let path = path.as_ref();
    let file = open(path)?;
    let pairs: Vec<(f64, f64)> = serde_json::from_reader(BufReader::new(file))?;

    debug!(components = pairs.len(), path = %path.display(), "loaded range table");
    RangeTable::from_pairs(&pairs).map_err(IoError::from)
}

fn open(path: &Path) -> IoResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })
}
