//! Square, padded cost matrix between predicted targets and new vectors.
//!
//! # Layout
//! - Row `i < n_old` is old target `i` (at its predicted position).
//! - Column `j < n_new` is new vector `j`.
//! - Every other cell is a padding cell holding `large_distance`.
//!
//! A target matched to a padding column disappeared; a vector matched to a
//! padding row is a newborn target.
//!
//! # Caller contract
//! `large_distance` must be orders of magnitude above any real cost (at
//! least 100x the largest plausible distance). Otherwise the solver may
//! prefer a padding cell over a legitimate match. The scale of real
//! distances is domain-specific, so the builder cannot check this.

use crate::{
    distance::DistanceMetric,
    extrapolation::{predict_into, ExtrapolationMask},
    target::TargetTable,
    types::{FeatureVec, Polarity},
};

/// Row-major `n × n` matrix backed by a reusable buffer.
#[derive(Clone, Debug, Default)]
pub struct CostMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from row-major values (mostly for tests and tools).
    pub fn from_row_slice(n: usize, values: &[f64]) -> Self {
        assert_eq!(values.len(), n * n, "expected {n}x{n} values");
        Self {
            n,
            data: values.to_vec(),
        }
    }

    /// Resize to `n × n` filled with `fill`. Keeps the allocation when the
    /// buffer is already large enough.
    pub fn reset(&mut self, n: usize, fill: f64) {
        self.n = n;
        self.data.clear();
        self.data.resize(n * n, fill);
    }

    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

}

/// Builds [`CostMatrix`] instances into buffers it owns.
///
/// Besides the cost it keeps the raw metric value of every real cell: that
/// is the match score reported back to callers.
#[derive(Clone, Debug, Default)]
pub struct CostMatrixBuilder {
    costs: CostMatrix,
    scores: Vec<f64>,
    predicted: Vec<FeatureVec>,
    n_old: usize,
    n_new: usize,
}

impl CostMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the matrix for this frame.
    ///
    /// For [`Polarity::Quality`] metrics the cost of a real cell is the
    /// negated quality; for [`Polarity::Distance`] it is the distance itself.
    /// A non-finite score costs `large_distance`; the raw value is kept as
    /// the cell's score.
    pub fn build(
        &mut self,
        targets: &TargetTable,
        new_vectors: &[FeatureVec],
        metric: &dyn DistanceMetric,
        mask: &ExtrapolationMask,
        large_distance: f64,
    ) -> &CostMatrix {
        let n_old = targets.len();
        let n_new = new_vectors.len();
        let n = n_old.max(n_new);
        self.n_old = n_old;
        self.n_new = n_new;

        self.predicted.resize_with(n_old, || FeatureVec::zeros(0));
        for (pred, target) in self.predicted.iter_mut().zip(targets.iter()) {
            predict_into(target, mask, pred);
        }

        self.costs.reset(n, large_distance);
        self.scores.clear();
        self.scores.resize(n_old * n_new, large_distance);

        let polarity = metric.polarity();
        for (i, pred) in self.predicted.iter().enumerate() {
            for (j, vector) in new_vectors.iter().enumerate() {
                let score = metric.distance(pred.as_slice(), vector.as_slice());
                let cost = match polarity {
                    Polarity::Distance => score,
                    Polarity::Quality => -score,
                };
                // Non-finite scores (gated pairs, NaN inputs) cost as much as padding
                let cost = if cost.is_finite() { cost } else { large_distance };
                self.scores[i * n_new + j] = score;
                self.costs.set(i, j, cost);
            }
        }
        &self.costs
    }

    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// Raw metric value between old target `row` and new vector `col`, or
    /// `None` if either index is padding.
    pub fn score(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.n_old && col < self.n_new).then(|| self.scores[row * self.n_new + col])
    }

    /// Number of real rows / columns in the last build.
    pub fn real_dims(&self) -> (usize, usize) {
        (self.n_old, self.n_new)
    }

}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
