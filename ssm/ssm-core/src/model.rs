//! The shape model: mean mesh plus deformation modes.

use nalgebra::DVector;
use ssm_types::LimbMesh;
use tracing::info;

use crate::error::{SsmError, SsmResult};

/// Layout of a flat mode matrix artifact.
///
/// Different model releases store the same logical `M x 3N` matrix with
/// modes as rows or as columns; orientation is a property of the loaded
/// artifact, never an assumption of the core. The 2022-10 release indexes
/// modes as columns (`X[:, i]`), 2023-06 and later as rows (`X[i, :]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOrientation {
    /// Each of the `M` rows is one mode vector of length `3N`.
    RowMajor,
    /// Each of the `M` columns is one mode vector of length `3N`.
    ColumnMajor,
}

/// The loaded statistical shape model: mean mesh and mode vectors.
///
/// Owns the size-normalised mean limb mesh and the `M` deformation mode
/// vectors, each of flat length `3N` where `N` is the mean's vertex count.
/// `N` and `M` are derived from the loaded artifacts at runtime; they vary
/// across model releases (N of 98412 and 46665 and M of 10, 32, and 34 have
/// all shipped) and are never constants in the core.
///
/// A `ShapeModel` is immutable after construction. Generation runs borrow it
/// read-only, so one model can be shared across worker threads without
/// locking.
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use ssm_core::ShapeModel;
/// use ssm_types::{LimbMesh, Vertex};
///
/// let mean = LimbMesh::from_parts(
///     vec![Vertex::from_coords(0.0, 0.0, 0.0); 4],
///     vec![[0, 1, 2], [0, 2, 3]],
/// );
/// let modes = vec![DVector::from_element(12, 1.0), DVector::zeros(12)];
///
/// let model = ShapeModel::new(mean, modes).unwrap();
/// assert_eq!(model.vertex_count(), 4);
/// assert_eq!(model.mode_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ShapeModel {
    mean: LimbMesh,
    modes: Vec<DVector<f64>>,
}

impl ShapeModel {
    /// Build a model from a mean mesh and per-mode displacement vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the mean has no vertices or any mode's length is
    /// not exactly three times the mean's vertex count.
    pub fn new(mean: LimbMesh, modes: Vec<DVector<f64>>) -> SsmResult<Self> {
        if mean.is_empty() {
            return Err(SsmError::EmptyMeanShape);
        }

        let expected = mean.vertex_count() * 3;
        for (mode_index, mode) in modes.iter().enumerate() {
            if mode.len() != expected {
                return Err(SsmError::ModeLengthMismatch {
                    mode_index,
                    expected,
                    actual: mode.len(),
                });
            }
        }

        info!(
            vertices = mean.vertex_count(),
            modes = modes.len(),
            "shape model loaded"
        );

        Ok(Self { mean, modes })
    }

    /// Build a model from a flat mode matrix in the given orientation.
    ///
    /// `data` holds `mode_count * 3N` values; rows or columns are taken as
    /// modes according to `orientation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mean is empty or `data` does not factor into
    /// `mode_count` vectors of length `3N`.
    pub fn from_matrix(
        mean: LimbMesh,
        data: &[f64],
        mode_count: usize,
        orientation: ModeOrientation,
    ) -> SsmResult<Self> {
        if mean.is_empty() {
            return Err(SsmError::EmptyMeanShape);
        }

        let coord_count = mean.vertex_count() * 3;
        let expected = mode_count
            .checked_mul(coord_count)
            .ok_or(SsmError::ModeMatrixShape {
                mode_count,
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(SsmError::ModeMatrixShape {
                mode_count,
                expected,
                actual: data.len(),
            });
        }

        let modes: Vec<DVector<f64>> = match orientation {
            ModeOrientation::RowMajor => data
                .chunks_exact(coord_count)
                .map(DVector::from_row_slice)
                .collect(),
            ModeOrientation::ColumnMajor => (0..mode_count)
                .map(|m| {
                    DVector::from_iterator(
                        coord_count,
                        (0..coord_count).map(|c| data[c * mode_count + m]),
                    )
                })
                .collect(),
        };

        Self::new(mean, modes)
    }

    /// The size-normalised mean mesh.
    #[inline]
    #[must_use]
    pub const fn mean(&self) -> &LimbMesh {
        &self.mean
    }

    /// Number of vertices `N` in the mean mesh.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.mean.vertex_count()
    }

    /// Flat coordinate count `3N`.
    #[inline]
    #[must_use]
    pub fn coord_count(&self) -> usize {
        self.mean.vertex_count() * 3
    }

    /// Number of deformation modes `M`.
    #[inline]
    #[must_use]
    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// One mode's flat displacement vector.
    #[inline]
    #[must_use]
    pub fn mode(&self, index: usize) -> Option<&DVector<f64>> {
        self.modes.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ssm_types::Vertex;

    fn four_point_mean() -> LimbMesh {
        LimbMesh::from_parts(
            vec![Vertex::from_coords(0.0, 0.0, 0.0); 4],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn new_rejects_empty_mean() {
        let result = ShapeModel::new(LimbMesh::new(), vec![]);
        assert!(matches!(result, Err(SsmError::EmptyMeanShape)));
    }

    #[test]
    fn new_rejects_short_mode() {
        let result = ShapeModel::new(four_point_mean(), vec![DVector::zeros(11)]);
        assert!(matches!(
            result,
            Err(SsmError::ModeLengthMismatch {
                mode_index: 0,
                expected: 12,
                actual: 11,
            })
        ));
    }

    #[test]
    fn new_accepts_zero_modes() {
        // A model with no modes is valid; reconstruction returns the mean.
        let model = ShapeModel::new(four_point_mean(), vec![]);
        assert!(model.is_ok());
    }

    #[test]
    fn from_matrix_row_major() {
        // 2 modes x 12 coords, mode 0 all ones, mode 1 all twos.
        let mut data = vec![1.0; 12];
        data.extend(std::iter::repeat(2.0).take(12));

        let model = ShapeModel::from_matrix(four_point_mean(), &data, 2, ModeOrientation::RowMajor);
        assert!(model.is_ok());
        if let Ok(model) = model {
            assert_eq!(model.mode_count(), 2);
            if let (Some(m0), Some(m1)) = (model.mode(0), model.mode(1)) {
                assert_relative_eq!(m0[5], 1.0);
                assert_relative_eq!(m1[5], 2.0);
            }
        }
    }

    #[test]
    fn from_matrix_column_major() {
        // 3N x M layout: interleaved [1, 2, 1, 2, ...] for 2 modes.
        let mut data = Vec::with_capacity(24);
        for _ in 0..12 {
            data.push(1.0);
            data.push(2.0);
        }

        let model =
            ShapeModel::from_matrix(four_point_mean(), &data, 2, ModeOrientation::ColumnMajor);
        assert!(model.is_ok());
        if let Ok(model) = model {
            if let (Some(m0), Some(m1)) = (model.mode(0), model.mode(1)) {
                assert!(m0.iter().all(|&v| (v - 1.0).abs() < f64::EPSILON));
                assert!(m1.iter().all(|&v| (v - 2.0).abs() < f64::EPSILON));
            }
        }
    }

    #[test]
    fn from_matrix_orientations_agree_on_symmetric_data() {
        // A matrix equal to its transpose-relayout gives the same modes.
        let data = vec![0.5; 24];
        let row =
            ShapeModel::from_matrix(four_point_mean(), &data, 2, ModeOrientation::RowMajor);
        let col =
            ShapeModel::from_matrix(four_point_mean(), &data, 2, ModeOrientation::ColumnMajor);
        assert!(row.is_ok() && col.is_ok());
        if let (Ok(row), Ok(col)) = (row, col) {
            for i in 0..2 {
                assert_eq!(row.mode(i), col.mode(i));
            }
        }
    }

    #[test]
    fn from_matrix_rejects_wrong_size() {
        let result =
            ShapeModel::from_matrix(four_point_mean(), &[0.0; 20], 2, ModeOrientation::RowMajor);
        assert!(matches!(
            result,
            Err(SsmError::ModeMatrixShape {
                mode_count: 2,
                expected: 24,
                actual: 20,
            })
        ));
    }

    #[test]
    fn mode_out_of_range_is_none() {
        let model = ShapeModel::new(four_point_mean(), vec![DVector::zeros(12)]);
        assert!(model.is_ok());
        if let Ok(model) = model {
            assert!(model.mode(0).is_some());
            assert!(model.mode(1).is_none());
        }
    }
}
