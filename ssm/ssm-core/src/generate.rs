//! The end-to-end generation pipeline.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use ssm_types::LimbMesh;
use tracing::{debug, info};

use crate::error::{SsmError, SsmResult};
use crate::model::ShapeModel;
use crate::params::{GenerateParams, ScalePolicy};
use crate::predictor::ScorePredictor;
use crate::ranges::RangeTable;
use crate::reconstruct::reconstruct;
use crate::sampler::sample_scores;
use crate::scale::{sample_scale_factor, scale_shape};

/// One finished synthetic shape and the scores that produced it.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// The synthetic limb mesh, scaled per the request's policy.
    pub mesh: LimbMesh,
    /// The sampled reduced-basis scores.
    pub raw_scores: DVector<f64>,
    /// The predicted full-mode scores driving the reconstruction.
    pub predicted_scores: DVector<f64>,
    /// The applied scale factor, if the shape was rescaled.
    pub scale_factor: Option<f64>,
}

impl Synthesis {
    /// One-line description of the generation for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Synthesis: {} vertices, {} raw scores -> {} mode scores, scale: {}",
            self.mesh.vertex_count(),
            self.raw_scores.len(),
            self.predicted_scores.len(),
            self.scale_factor
                .map_or_else(|| "size-normalised".to_string(), |f| format!("{f:.2} mm")),
        )
    }
}

/// Generate one synthetic limb shape.
///
/// Runs the single-pass pipeline: sample raw scores from the range table,
/// predict full-mode scores, reconstruct the mesh from the model, and apply
/// the scaling policy. Each call is independent and stateless with respect
/// to prior calls; the model, table, and predictor are only read, so callers
/// may run generations concurrently against the same loaded artifacts.
///
/// # Errors
///
/// Returns an error, with no partial output, if:
/// - the raw score count does not match the predictor's input size
/// - the predicted score count does not match the model's mode count
/// - the mode selection names a mode the model does not have
/// - the scale policy yields a non-positive or non-finite factor
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use ssm_core::{
///     generate, GenerateParams, LinearRegressor, RangeTable, ShapeModel,
/// };
/// use ssm_types::{LimbMesh, Vertex};
///
/// let mean = LimbMesh::from_parts(
///     vec![Vertex::from_coords(0.0, 0.0, 0.0); 4],
///     vec![[0, 1, 2], [0, 2, 3]],
/// );
/// let model = ShapeModel::new(
///     mean,
///     vec![DVector::from_element(12, 1.0), DVector::zeros(12)],
/// )
/// .unwrap();
/// let table = RangeTable::from_pairs(&[(-1.0, 1.0), (-0.5, 0.5)]).unwrap();
/// let predictor = LinearRegressor::identity(2);
///
/// let params = GenerateParams::new().with_seed(42);
/// let result = generate(&model, &table, &predictor, &params).unwrap();
/// assert_eq!(result.mesh.vertex_count(), 4);
/// ```
pub fn generate<P: ScorePredictor + ?Sized>(
    model: &ShapeModel,
    table: &RangeTable,
    predictor: &P,
    params: &GenerateParams,
) -> SsmResult<Synthesis> {
    // Reject a bad fixed factor up front, before any work.
    if let ScalePolicy::Fixed(factor) = params.scale {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(SsmError::InvalidScaleFactor(factor));
        }
    }

    let mut rng: Box<dyn RngCore> = if let Some(seed) = params.seed {
        Box::new(StdRng::seed_from_u64(seed))
    } else {
        Box::new(rand::thread_rng())
    };

    let raw_scores = sample_scores(table, &mut rng)?;
    debug!(components = raw_scores.len(), "sampled raw scores");

    if raw_scores.len() != predictor.input_len() {
        return Err(SsmError::PredictorInputMismatch {
            expected: predictor.input_len(),
            actual: raw_scores.len(),
        });
    }

    let predicted_scores = predictor.predict(&raw_scores)?;
    if predicted_scores.len() != model.mode_count() {
        return Err(SsmError::ScoreCountMismatch {
            expected: model.mode_count(),
            actual: predicted_scores.len(),
        });
    }

    let mut mesh = reconstruct(model, &predicted_scores, &params.selection)?;

    let scale_factor = match params.scale {
        ScalePolicy::Unscaled => None,
        ScalePolicy::Fixed(factor) => {
            scale_shape(&mut mesh, factor)?;
            Some(factor)
        }
        ScalePolicy::Sampled(range) => {
            let factor = sample_scale_factor(&range, &mut rng)?;
            scale_shape(&mut mesh, factor)?;
            Some(factor)
        }
    };

    info!(
        vertices = mesh.vertex_count(),
        scale = ?scale_factor,
        "synthetic shape generated"
    );

    Ok(Synthesis {
        mesh,
        raw_scores,
        predicted_scores,
        scale_factor,
    })
}
