//! Constrained shape sampling for a residual-limb statistical shape model.
//!
//! This crate is the core of the synthetic limb generator. A statistical
//! shape model (SSM) represents a training population as a mean mesh plus
//! `M` deformation modes; weighting the modes and adding them to the mean
//! produces a new, plausible limb. The pipeline is:
//!
//! 1. **Sample** - draw one score per reduced ("skin-only") component from
//!    its empirical training range, discretized into a fixed 100-value grid
//!    ([`sample_scores`], [`RangeTable`]).
//! 2. **Predict** - map the reduced scores to full-mode scores with a
//!    pre-trained regression model, which rejects anatomically impossible
//!    combinations by construction ([`ScorePredictor`], [`LinearRegressor`]).
//! 3. **Reconstruct** - mean + weighted mode sum over an explicit set of
//!    enabled modes ([`reconstruct`], [`ModeSelection`]).
//! 4. **Scale** (optional) - uniform rescale to a real intact-tibia length
//!    in millimetres ([`scale_shape`], [`ScalePolicy`]).
//!
//! [`generate`] runs all four stages for one request.
//!
//! # Quick Start
//!
//! ```
//! use nalgebra::DVector;
//! use ssm_core::{generate, GenerateParams, LinearRegressor, RangeTable, ShapeModel};
//! use ssm_types::{LimbMesh, Vertex};
//!
//! // A toy model: 4 vertices, 2 modes.
//! let mean = LimbMesh::from_parts(
//!     vec![Vertex::from_coords(0.0, 0.0, 0.0); 4],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! );
//! let model = ShapeModel::new(
//!     mean,
//!     vec![DVector::from_element(12, 1.0), DVector::zeros(12)],
//! ).unwrap();
//!
//! let table = RangeTable::from_pairs(&[(-1.0, 1.0), (-0.5, 0.5)]).unwrap();
//! let predictor = LinearRegressor::identity(2);
//!
//! let params = GenerateParams::new()
//!     .with_leading_modes(2)
//!     .with_seed(42);
//!
//! let synthesis = generate(&model, &table, &predictor, &params).unwrap();
//! assert_eq!(synthesis.mesh.vertex_count(), 4);
//! ```
//!
//! # Model dimensions are data
//!
//! `N` (vertex count) and `M` (mode count) are properties of the loaded
//! artifacts, not constants: released models have shipped with 98412 and
//! 46665 vertices and with 10, 32, and 34 modes. Every dimension check in
//! this crate derives its expectations from the loaded [`ShapeModel`].
//!
//! # Independent sampling caveat
//!
//! Scores are sampled independently per component; there is no joint
//! distribution. Release notes may flag anatomically interacting mode pairs
//! (the 2023-06 model advises against enabling modes 6 and 7 together).
//! That guidance is advisory and intentionally not enforced here - choose
//! your [`ModeSelection`] accordingly.
//!
//! # Concurrency
//!
//! A [`ShapeModel`], [`RangeTable`], and predictor are immutable after
//! construction. Generation runs borrow them read-only, so callers may run
//! [`generate`] from many threads against one loaded model with no locking.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod generate;
mod model;
mod params;
mod predictor;
mod ranges;
mod reconstruct;
mod sampler;
mod scale;

pub use error::{SsmError, SsmResult};
pub use generate::{generate, Synthesis};
pub use model::{ModeOrientation, ShapeModel};
pub use params::{GenerateParams, ScalePolicy};
pub use predictor::{LinearRegressor, ScorePredictor};
pub use ranges::{RangeTable, SampleRange, GRID_STEPS};
pub use reconstruct::{reconstruct, ModeSelection};
pub use sampler::sample_scores;
pub use scale::{sample_scale_factor, scale_shape};
