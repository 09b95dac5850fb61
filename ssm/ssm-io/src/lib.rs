//! Artifact I/O for the residual-limb statistical shape model.
//!
//! The generator consumes four artifact files exported from the training
//! pipeline and this crate loads all of them:
//!
//! - the **mean mesh** as STL, loaded without vertex welding so that vertex
//!   order matches the mode vectors ([`load_stl`])
//! - the **mode matrix** as a 2-D `float64` NPY array in either orientation,
//!   resolved against the mean's coordinate count ([`load_mode_matrix`])
//! - the **regression model** as JSON weights and intercept
//!   ([`load_regressor`])
//! - the **score range table** as a JSON array of `[lo, hi]` pairs
//!   ([`load_range_table`])
//!
//! Generated meshes are written back out as binary STL ([`save_stl`]) under
//! incrementing `Random<i>.stl` names ([`next_random_path`]).
//!
//! Artifacts are static local files; every load failure is surfaced
//! immediately as an [`IoError`] with no retry.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod artifacts;
mod error;
mod npy;
mod save;
mod stl;

pub use artifacts::{load_range_table, load_regressor};
pub use error::{IoError, IoResult};
pub use npy::{load_mode_matrix, load_npy, NpyMatrix};
pub use save::next_random_path;
pub use stl::{load_stl, save_stl};
