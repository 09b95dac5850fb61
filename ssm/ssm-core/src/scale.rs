//! Uniform rescaling of reconstructed shapes.
//!
//! A freshly reconstructed shape is in the model's size-normalised space.
//! Multiplying every coordinate by a target intact-tibia length (in
//! millimetres) produces a real-size subject. The factor may be fixed or
//! itself drawn from a per-release empirical range (342.8-439.8 mm for
//! 2023-06, 313.05-466.34 mm for 2025-03).

use rand::Rng;
use ssm_types::LimbMesh;

use crate::error::{SsmError, SsmResult};
use crate::ranges::SampleRange;
use crate::sampler::sample_one;

/// Scale every coordinate of the shape by `factor`, in place.
///
/// Isotropic and origin-centred; no translation is applied.
///
/// # Errors
///
/// Returns an error, leaving the shape untouched, if `factor` is zero,
/// negative, or not finite.
///
/// # Example
///
/// ```
/// use ssm_core::scale_shape;
/// use ssm_types::{LimbMesh, Vertex};
///
/// let mut shape = LimbMesh::from_parts(
///     vec![Vertex::from_coords(1.0, -0.5, 0.25)],
///     vec![],
/// );
/// scale_shape(&mut shape, 383.0).unwrap();
/// assert_eq!(shape.vertices[0].position.x, 383.0);
/// assert_eq!(shape.vertices[0].position.y, -191.5);
/// ```
pub fn scale_shape(shape: &mut LimbMesh, factor: f64) -> SsmResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(SsmError::InvalidScaleFactor(factor));
    }
    for v in &mut shape.vertices {
        v.position.x *= factor;
        v.position.y *= factor;
        v.position.z *= factor;
    }
    Ok(())
}

/// Draw a scale factor from an empirical tibia-length range.
///
/// Uses the same 100-step discretization as score sampling.
///
/// # Errors
///
/// Returns an error if the range is not finite or spans non-positive values.
pub fn sample_scale_factor<R: Rng + ?Sized>(
    range: &SampleRange,
    rng: &mut R,
) -> SsmResult<f64> {
    if !range.is_finite() || range.min() <= 0.0 {
        return Err(SsmError::InvalidScaleFactor(range.min()));
    }
    Ok(sample_one(range, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ssm_types::Vertex;

    fn unit_cube_corner_shape() -> LimbMesh {
        LimbMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 1.0, 1.0),
                Vertex::from_coords(0.5, 0.25, -0.75),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn scale_by_one_is_identity() {
        let mut shape = unit_cube_corner_shape();
        let before = shape.clone();
        let result = scale_shape(&mut shape, 1.0);
        assert!(result.is_ok());
        assert_eq!(shape, before);
    }

    #[test]
    fn scale_composes_multiplicatively() {
        let mut twice = unit_cube_corner_shape();
        assert!(scale_shape(&mut twice, 2.0).is_ok());
        assert!(scale_shape(&mut twice, 3.5).is_ok());

        let mut once = unit_cube_corner_shape();
        assert!(scale_shape(&mut once, 7.0).is_ok());

        for (a, b) in twice.vertices.iter().zip(&once.vertices) {
            assert_relative_eq!(a.position.x, b.position.x, epsilon = 1e-12);
            assert_relative_eq!(a.position.y, b.position.y, epsilon = 1e-12);
            assert_relative_eq!(a.position.z, b.position.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn tibia_length_scales_unit_shape_exactly() {
        let mut shape = unit_cube_corner_shape();
        let result = scale_shape(&mut shape, 383.0);
        assert!(result.is_ok());
        assert_relative_eq!(shape.vertices[1].position.x, 383.0);
        assert_relative_eq!(shape.vertices[2].position.z, -287.25);
    }

    #[test]
    fn invalid_factors_leave_shape_untouched() {
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut shape = unit_cube_corner_shape();
            let before = shape.clone();
            let result = scale_shape(&mut shape, factor);
            assert!(matches!(result, Err(SsmError::InvalidScaleFactor(_))));
            assert_eq!(shape, before);
        }
    }

    #[test]
    fn sampled_factor_stays_in_tibia_range() {
        let range = SampleRange::new(342.8, 439.8);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let factor = sample_scale_factor(&range, &mut rng);
            assert!(factor.is_ok());
            if let Ok(factor) = factor {
                assert!((342.8..=439.8).contains(&factor));
                assert!(range.on_grid(factor, 1e-9));
            }
        }
    }

    #[test]
    fn sampled_factor_rejects_non_positive_range() {
        let range = SampleRange::new(-1.0, 10.0);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(sample_scale_factor(&range, &mut rng).is_err());
    }
}
