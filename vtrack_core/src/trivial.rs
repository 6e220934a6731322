//! Fast path that skips the solver for unambiguous frames.
//!
//! Applies only when the old and new sets have the same size. Each old
//! target must have a strictly unique nearest new vector, that vector must
//! have the target as its strictly unique nearest old target, the resulting
//! pairs must form a bijection, and each pair's raw score must pass the
//! threshold gate.
//!
//! A bijection made of row minima has a total cost no larger than any other
//! assignment, and with strict minima it is the only optimum. The fast path
//! therefore returns exactly what the solver would.

use crate::{cost_matrix::CostMatrixBuilder, types::Polarity};

/// Configuration of the fast path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrivialAssignmentOptimizer {
    pub enabled: bool,
    /// Gate on the raw score: `score < threshold` for distances,
    /// `score > threshold` for quality functions.
    pub threshold: f64,
}

impl TrivialAssignmentOptimizer {
    pub fn new(enabled: bool, threshold: f64) -> Self {
        Self { enabled, threshold }
    }

    /// Try to resolve the frame without the solver. On success `out` holds
    /// `perm[row] = col` for the real `n × n` block.
    pub fn try_assign(
        &self,
        built: &CostMatrixBuilder,
        polarity: Polarity,
        out: &mut Vec<usize>,
    ) -> bool {
        let (n_old, n_new) = built.real_dims();
        if !self.enabled || n_old != n_new || n_old == 0 {
            return false;
        }
        let n = n_old;
        let costs = built.costs();

        out.clear();
        let mut col_taken = vec![false; n];
        for row in 0..n {
            let Some(col) = unique_argmin((0..n).map(|c| costs.get(row, c))) else {
                return false;
            };
            if col_taken[col] {
                return false;
            }
            if unique_argmin((0..n).map(|r| costs.get(r, col))) != Some(row) {
                return false;
            }
            let passes = match (built.score(row, col), polarity) {
                (Some(s), Polarity::Distance) => s < self.threshold,
                (Some(s), Polarity::Quality) => s > self.threshold,
                (None, _) => false,
            };
            if !passes {
                return false;
            }
            col_taken[col] = true;
            out.push(col);
        }
        true
    }
}

/// Index of the strictly smallest value, `None` on ties, NaN or empty input.
fn unique_argmin(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    let mut tied = false;
    for (i, x) in values.enumerate() {
        if x.is_nan() {
            return None;
        }
        match best {
            None => best = Some((i, x)),
            Some((_, b)) if x < b => {
                best = Some((i, x));
                tied = false;
            }
            Some((_, b)) if x == b => tied = true,
            _ => {}
        }
    }
    if tied {
        None
    } else {
        best.map(|(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        distance::{DistanceFunction, NormalizedEuclidean},
        extrapolation::ExtrapolationMask,
        target::{Target, TargetTable},
        types::{FeatureVec, TargetId},
    };

    fn build(old: &[(f64, f64)], new: &[(f64, f64)]) -> CostMatrixBuilder {
        let mut table = TargetTable::new();
        for (i, &(x, y)) in old.iter().enumerate() {
            table.push(Target::new(TargetId(i as u64), FeatureVec::from_vec(vec![x, y]), 0.0));
        }
        let new: Vec<_> = new.iter().map(|&(x, y)| FeatureVec::from_vec(vec![x, y])).collect();
        let mut b = CostMatrixBuilder::new();
        b.build(
            &table,
            &new,
            &NormalizedEuclidean::euclidean(),
            &ExtrapolationMask::all(2),
            1e6,
        );
        b
    }

    #[test]
    fn fires_on_mutual_nearest_pairs() {
        let b = build(&[(0.0, 0.0), (10.0, 10.0)], &[(9.0, 9.0), (1.0, 1.0)]);
        let opt = TrivialAssignmentOptimizer::new(true, 5.0);
        let mut perm = Vec::new();
        assert!(opt.try_assign(&b, Polarity::Distance, &mut perm));
        assert_eq!(perm, vec![1, 0]);
    }

    #[test]
    fn threshold_blocks_far_pairs() {
        let b = build(&[(0.0, 0.0), (10.0, 10.0)], &[(9.0, 9.0), (1.0, 1.0)]);
        let opt = TrivialAssignmentOptimizer::new(true, 1.0);
        assert!(!opt.try_assign(&b, Polarity::Distance, &mut Vec::new()));
    }

    #[test]
    fn shared_nearest_neighbour_falls_through() {
        // Both targets are closest to the vector at (1, 0)
        let b = build(&[(0.0, 0.0), (2.0, 0.0)], &[(1.2, 0.0), (10.0, 0.0)]);
        let opt = TrivialAssignmentOptimizer::new(true, 100.0);
        assert!(!opt.try_assign(&b, Polarity::Distance, &mut Vec::new()));
    }

    #[test]
    fn ties_fall_through() {
        let b = build(&[(0.0, 0.0), (2.0, 0.0)], &[(1.0, 0.0), (1.0, 0.0)]);
        let opt = TrivialAssignmentOptimizer::new(true, 100.0);
        assert!(!opt.try_assign(&b, Polarity::Distance, &mut Vec::new()));
    }

    #[test]
    fn size_mismatch_or_disabled_never_fires() {
        let b = build(&[(0.0, 0.0)], &[(0.0, 0.0), (5.0, 5.0)]);
        assert!(!TrivialAssignmentOptimizer::new(true, 100.0).try_assign(
            &b,
            Polarity::Distance,
            &mut Vec::new()
        ));
        let b = build(&[(0.0, 0.0)], &[(0.0, 0.0)]);
        assert!(!TrivialAssignmentOptimizer::new(false, 100.0).try_assign(
            &b,
            Polarity::Distance,
            &mut Vec::new()
        ));
    }

    #[test]
    fn quality_gate_uses_greater_than() {
        let mut table = TargetTable::new();
        table.push(Target::new(TargetId(0), FeatureVec::from_vec(vec![0.0]), 0.0));
        let new = vec![FeatureVec::from_vec(vec![1.0])];
        let q = DistanceFunction::from_quality(|a, b| 10.0 - (a[0] - b[0]).abs());
        let mut b = CostMatrixBuilder::new();
        b.build(&table, &new, &q, &ExtrapolationMask::all(1), 1e6);

        let mut perm = Vec::new();
        assert!(TrivialAssignmentOptimizer::new(true, 5.0).try_assign(&b, Polarity::Quality, &mut perm));
        assert_eq!(perm, vec![0]);
        assert!(!TrivialAssignmentOptimizer::new(true, 9.5).try_assign(&b, Polarity::Quality, &mut perm));
    }

    #[test]
    fn unique_argmin_cases() {
        assert_eq!(unique_argmin([3.0, 1.0, 2.0].into_iter()), Some(1));
        assert_eq!(unique_argmin([1.0, 1.0].into_iter()), None);
        assert_eq!(unique_argmin([1.0, 0.5, 0.5, 0.1].into_iter()), Some(3));
        assert_eq!(unique_argmin(std::iter::empty()), None);
        assert_eq!(unique_argmin([f64::NAN].into_iter()), None);
    }
}
