//! Empirical value ranges and their fixed discretization.
//!
//! Every sampled quantity in the pipeline (per-mode scores, and optionally
//! the tibia-length scale factor) is drawn from a training-derived `[lo, hi]`
//! interval discretized into a fixed grid of evenly spaced values, rather
//! than sampled continuously. The grid bounds the space of distinct raw
//! samples to `GRID_STEPS^M` and never extrapolates beyond the extremes
//! observed in training, which the downstream regression model was not fit
//! to handle.

use crate::error::{SsmError, SsmResult};

/// Number of evenly spaced values in every sampling grid.
pub const GRID_STEPS: usize = 100;

/// An inclusive empirical interval with a fixed discretization.
///
/// Bounds may be given in either order; the span is always
/// `[min(lo, hi), max(lo, hi)]`. A degenerate range (`lo == hi`) is valid
/// and yields a single repeated grid value.
///
/// # Example
///
/// ```
/// use ssm_core::{SampleRange, GRID_STEPS};
///
/// let range = SampleRange::new(-1.0, 1.0);
/// assert_eq!(range.grid_value(0), -1.0);
/// assert_eq!(range.grid_value(GRID_STEPS - 1), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    /// Lower bound as given.
    pub lo: f64,
    /// Upper bound as given.
    pub hi: f64,
}

impl SampleRange {
    /// Create a new range.
    #[inline]
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Smaller of the two bounds.
    #[inline]
    #[must_use]
    pub fn min(&self) -> f64 {
        self.lo.min(self.hi)
    }

    /// Larger of the two bounds.
    #[inline]
    #[must_use]
    pub fn max(&self) -> f64 {
        self.lo.max(self.hi)
    }

    /// Whether the range collapses to a single value.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }

    /// Whether both bounds are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    /// The spacing between adjacent grid values.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision loss: GRID_STEPS is far below 2^52
    pub fn step_size(&self) -> f64 {
        (self.max() - self.min()) / (GRID_STEPS - 1) as f64
    }

    /// The `step`-th of the `GRID_STEPS` evenly spaced values in the range.
    ///
    /// `step` is clamped to the grid; `grid_value(0)` is the minimum and
    /// `grid_value(GRID_STEPS - 1)` is exactly the maximum.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    // Precision loss: GRID_STEPS is far below 2^52
    pub fn grid_value(&self, step: usize) -> f64 {
        let step = step.min(GRID_STEPS - 1);
        if self.is_degenerate() {
            return self.lo;
        }
        // Endpoints exact; interior points interpolated.
        if step == GRID_STEPS - 1 {
            self.max()
        } else {
            self.min() + self.step_size() * step as f64
        }
    }

    /// Whether `value` lies on the grid, within `tolerance` of a grid point.
    #[must_use]
    pub fn on_grid(&self, value: f64, tolerance: f64) -> bool {
        if self.is_degenerate() {
            return (value - self.lo).abs() <= tolerance;
        }
        if value < self.min() - tolerance || value > self.max() + tolerance {
            return false;
        }
        let steps = (value - self.min()) / self.step_size();
        (steps - steps.round()).abs() * self.step_size() <= tolerance
    }
}

/// Per-mode empirical score bounds for the reduced ("skin-only") basis.
///
/// One entry per sampled component, in component order. The entry count is a
/// property of the released range artifact, not of the full mode matrix: a
/// release may sample 10 reduced components and predict a different number
/// of full-mode scores.
///
/// # Example
///
/// ```
/// use ssm_core::RangeTable;
///
/// let table = RangeTable::from_pairs(&[(-1.0, 1.0), (0.48, 0.48)]).unwrap();
/// assert_eq!(table.len(), 2);
/// assert!(table.entry(1).unwrap().is_degenerate());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    entries: Vec<SampleRange>,
}

impl RangeTable {
    /// Build a table from `(lo, hi)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty or any bound is not finite.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> SsmResult<Self> {
        let entries: Vec<SampleRange> = pairs
            .iter()
            .map(|&(lo, hi)| SampleRange::new(lo, hi))
            .collect();
        Self::from_ranges(entries)
    }

    /// Build a table from ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is empty or any bound is not finite.
    pub fn from_ranges(entries: Vec<SampleRange>) -> SsmResult<Self> {
        if entries.is_empty() {
            return Err(SsmError::EmptyRangeTable);
        }
        for (index, range) in entries.iter().enumerate() {
            if !range.is_finite() {
                return Err(SsmError::NonFiniteRange {
                    index,
                    lo: range.lo,
                    hi: range.hi,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Number of entries (reduced components).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty. Always `false` for a constructed table.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The range for one component.
    #[inline]
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&SampleRange> {
        self.entries.get(index)
    }

    /// Iterate over the component ranges in order.
    pub fn iter(&self) -> impl Iterator<Item = &SampleRange> {
        self.entries.iter()
    }
}
