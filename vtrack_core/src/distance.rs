//! Dissimilarity between feature vectors.
//!
//! The built-in metric is a per-dimension normalized Euclidean distance that
//! is root-compressed by default: the final value is the square root of the
//! Euclidean norm. Without the compression, cost differences between matches
//! that involve very different numbers of well-fitting dimensions get swamped
//! and the solver starts trading correct matches for spurious ones whenever
//! the target count fluctuates.
//!
//! Callers may replace the metric with any [`DistanceFunction`]. A custom
//! function always carries an explicit [`Polarity`]; the cost-matrix builder
//! branches on it exactly once.

use crate::{
    error::{Result, TrackerError},
    types::Polarity,
};
use std::{fmt, sync::Arc};

/// Anything that can score a pair of equally sized vectors.
pub trait DistanceMetric: Send + Sync {
    /// Score `a` against `b`. Must be symmetric.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Orientation of the returned score.
    fn polarity(&self) -> Polarity {
        Polarity::Distance
    }
}

// ---------------------------------------------------------------------------
// Built-in metric
// ---------------------------------------------------------------------------

/// `sqrt(sum(((a_i - b_i) / sigma_i)^2))`, optionally root-compressed.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedEuclidean {
    /// `None` when every factor is one (division skipped).
    norm_factors: Option<Vec<f64>>,
    root_compressed: bool,
}

impl NormalizedEuclidean {
    /// Build the metric for `dim` dimensions.
    ///
    /// An empty `norm_factors` slice means "all ones". Otherwise it must have
    /// exactly `dim` finite, non-zero entries.
    pub fn new(dim: usize, norm_factors: &[f64], root_compressed: bool) -> Result<Self> {
        if !norm_factors.is_empty() && norm_factors.len() != dim {
            return Err(TrackerError::InvalidConfiguration(format!(
                "norm_factors has {} entries, expected {dim}",
                norm_factors.len()
            )));
        }
        if let Some(i) = norm_factors.iter().position(|&f| f == 0.0 || !f.is_finite()) {
            return Err(TrackerError::InvalidConfiguration(format!(
                "norm_factors[{i}] = {} (must be finite and non-zero)",
                norm_factors[i]
            )));
        }
        let all_ones = norm_factors.iter().all(|&f| f == 1.0);
        Ok(Self {
            norm_factors: (!all_ones).then(|| norm_factors.to_vec()),
            root_compressed,
        })
    }

    /// Plain Euclidean distance with unit factors.
    pub fn euclidean() -> Self {
        Self {
            norm_factors: None,
            root_compressed: false,
        }
    }

}

impl DistanceMetric for NormalizedEuclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let sum: f64 = match &self.norm_factors {
            Some(sigma) => a
                .iter()
                .zip(b)
                .zip(sigma)
                .map(|((x, y), s)| {
                    let d = (x - y) / s;
                    d * d
                })
                .sum(),
            None => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
        };
        let e = sum.sqrt();
        if self.root_compressed {
            e.sqrt()
        } else {
            e
        }
    }
}

// ---------------------------------------------------------------------------
// Caller-supplied function
// ---------------------------------------------------------------------------

type ScoreFn = dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync;

/// A caller-supplied scoring closure tagged with its polarity.
///
/// Cloning shares the closure; the closure itself must be stateless from the
/// tracker's point of view.
#[derive(Clone)]
pub struct DistanceFunction {
    func: Arc<ScoreFn>,
    polarity: Polarity,
}

impl DistanceFunction {
    pub fn new<F>(func: F, polarity: Polarity) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            polarity,
        }
    }

    /// A genuine distance: smaller is better.
    pub fn from_distance<F>(func: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::new(func, Polarity::Distance)
    }

    /// A quality function: larger is better.
    pub fn from_quality<F>(func: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::new(func, Polarity::Quality)
    }
}

impl DistanceMetric for DistanceFunction {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.func)(a, b)
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }
}

impl fmt::Debug for DistanceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceFunction")
            .field("polarity", &self.polarity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn root_compressed_is_sqrt_of_euclidean() {
        let m = NormalizedEuclidean::new(2, &[], true).unwrap();
        // Euclidean distance 5, compressed sqrt(5)
        assert_abs_diff_eq!(m.distance(&[0.0, 0.0], &[3.0, 4.0]), 5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(NormalizedEuclidean::euclidean().distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn norm_factors_scale_each_dimension() {
        let m = NormalizedEuclidean::new(2, &[3.0, 0.5], false).unwrap();
        // (3/3)^2 + (1/0.5)^2 = 1 + 4
        assert_abs_diff_eq!(m.distance(&[0.0, 0.0], &[3.0, 1.0]), 5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn unit_factors_are_dropped() {
        let m = NormalizedEuclidean::new(3, &[1.0, 1.0, 1.0], true).unwrap();
        assert!(m.norm_factors.is_none());
    }

    #[test]
    fn zero_factor_rejected() {
        let err = NormalizedEuclidean::new(2, &[1.0, 0.0], true).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfiguration(_)));
    }

    #[test]
    fn factor_length_must_match_dim() {
        assert!(NormalizedEuclidean::new(3, &[1.0, 2.0], true).is_err());
    }

    #[test]
    fn metric_is_symmetric_and_zero_on_identity() {
        let m = NormalizedEuclidean::new(3, &[2.0, 1.0, 4.0], true).unwrap();
        let a = [1.0, -2.0, 7.5];
        let b = [0.5, 3.0, -1.0];
        assert_abs_diff_eq!(m.distance(&a, &b), m.distance(&b, &a));
        assert_eq!(m.distance(&a, &a), 0.0);
        assert!(m.distance(&a, &b) > 0.0);
    }

    #[test]
    fn custom_function_keeps_polarity() {
        let q = DistanceFunction::from_quality(|a, b| -(a[0] - b[0]).abs());
        assert_eq!(q.polarity(), Polarity::Quality);
        assert_eq!(q.distance(&[1.0], &[4.0]), -3.0);
        let d = DistanceFunction::from_distance(|a, b| (a[0] - b[0]).abs());
        assert_eq!(d.polarity(), Polarity::Distance);
    }
}
