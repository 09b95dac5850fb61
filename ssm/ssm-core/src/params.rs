//! Generation parameters.

use std::collections::HashSet;

use crate::ranges::SampleRange;
use crate::reconstruct::ModeSelection;

/// How to size the finished shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalePolicy {
    /// Leave the shape in the model's size-normalised space (the default).
    Unscaled,
    /// Scale by a fixed intact-tibia length in millimetres.
    Fixed(f64),
    /// Draw the tibia length from an empirical range per generation.
    Sampled(SampleRange),
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self::Unscaled
    }
}

/// Parameters for one generation request.
///
/// Use the builder methods to configure the run.
///
/// # Examples
///
/// ```
/// use ssm_core::GenerateParams;
///
/// // First four modes, real-size output, reproducible.
/// let params = GenerateParams::new()
///     .with_leading_modes(4)
///     .with_scale_factor(383.0)
///     .with_seed(42);
/// ```
///
/// ```
/// use ssm_core::GenerateParams;
///
/// // Explicit opt-in mode set with a sampled tibia length.
/// let params = GenerateParams::new()
///     .with_mode_indices([0, 1, 2, 3, 4, 5, 8, 9])
///     .with_sampled_scale(342.8, 439.8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    /// Which modes the reconstructor applies.
    pub selection: ModeSelection,
    /// Output sizing policy.
    pub scale: ScalePolicy,
    /// Optional RNG seed for reproducible generations.
    pub seed: Option<u64>,
}

impl GenerateParams {
    /// Default parameters: all modes, size-normalised output, unseeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode selection directly.
    #[must_use]
    pub fn with_mode_selection(mut self, selection: ModeSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Apply only modes `0..k`.
    #[must_use]
    pub fn with_leading_modes(mut self, k: usize) -> Self {
        self.selection = ModeSelection::Leading(k);
        self
    }

    /// Apply exactly the given mode indices.
    #[must_use]
    pub fn with_mode_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.selection = ModeSelection::Indices(indices.into_iter().collect::<HashSet<_>>());
        self
    }

    /// Scale the output by a fixed tibia length in millimetres.
    #[must_use]
    pub const fn with_scale_factor(mut self, factor: f64) -> Self {
        self.scale = ScalePolicy::Fixed(factor);
        self
    }

    /// Draw the tibia length from `[lo, hi]` per generation.
    #[must_use]
    pub const fn with_sampled_scale(mut self, lo: f64, hi: f64) -> Self {
        self.scale = ScalePolicy::Sampled(SampleRange::new(lo, hi));
        self
    }

    /// Seed the RNG for a reproducible generation.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
