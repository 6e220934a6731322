//! Motion extrapolation: where a target should be in the current frame.
//!
//! Masked dimensions of targets with at least two observations follow a
//! constant-velocity step `2*p - p_prev`; everything else is assumed
//! stationary. Newborn targets are never extrapolated, which keeps detector
//! noise from being amplified into a bogus velocity.

use crate::{
    error::{Result, TrackerError},
    target::Target,
    types::FeatureVec,
};
use serde::{Deserialize, Serialize};

/// Per-dimension switch for linear extrapolation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrapolationMask(Vec<bool>);

impl ExtrapolationMask {
    /// Extrapolate every dimension.
    pub fn all(dim: usize) -> Self {
        Self(vec![true; dim])
    }

    /// Build from explicit flags; length must equal `dim`.
    pub fn from_flags(dim: usize, flags: &[bool]) -> Result<Self> {
        if flags.len() != dim {
            return Err(TrackerError::DimensionMismatch {
                expected: dim,
                got: flags.len(),
                index: 0,
            });
        }
        Ok(Self(flags.to_vec()))
    }

    pub fn flags(&self) -> &[bool] {
        &self.0
    }
}

/// Predict the current-frame position of `target` into `out`.
///
/// `out` is resized to the target's dimension; reusing it across targets
/// avoids per-row allocation.
pub fn predict_into(target: &Target, mask: &ExtrapolationMask, out: &mut FeatureVec) {
    let dim = target.position.len();
    if out.len() != dim {
        *out = FeatureVec::zeros(dim);
    }
    match (&target.previous_position, target.age >= 2) {
        (Some(prev), true) => {
            for i in 0..dim {
                let p = target.position[i];
                out[i] = if mask.0[i] { 2.0 * p - prev[i] } else { p };
            }
        }
        _ => out.copy_from(&target.position),
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetId;
    use approx::assert_abs_diff_eq;

    fn v(xs: &[f64]) -> FeatureVec {
        FeatureVec::from_column_slice(xs)
    }

    fn predict(target: &Target, mask: &ExtrapolationMask) -> FeatureVec {
        let mut out = FeatureVec::zeros(target.position.len());
        predict_into(target, mask, &mut out);
        out
    }

    #[test]
    fn newborn_target_is_stationary() {
        let t = Target::new(TargetId(0), v(&[5.0, 5.0]), 0.0);
        let p = predict(&t, &ExtrapolationMask::all(2));
        assert_eq!(p, v(&[5.0, 5.0]));
    }

    #[test]
    fn linear_step_after_two_observations() {
        let mut t = Target::new(TargetId(0), v(&[0.0, 10.0]), 0.0);
        t.observe(&v(&[2.0, 7.0]), 0.0);
        let p = predict(&t, &ExtrapolationMask::all(2));
        assert_abs_diff_eq!(p[0], 4.0);
        assert_abs_diff_eq!(p[1], 4.0);
    }

    #[test]
    fn masked_dimensions_stay_put() {
        let mut t = Target::new(TargetId(0), v(&[0.0, 0.0, 0.0]), 0.0);
        t.observe(&v(&[1.0, 1.0, 1.0]), 0.0);
        let mask = ExtrapolationMask::from_flags(3, &[true, false, true]).unwrap();
        let p = predict(&t, &mask);
        assert_eq!(p, v(&[2.0, 1.0, 2.0]));
    }

    #[test]
    fn mask_length_checked() {
        assert!(matches!(
            ExtrapolationMask::from_flags(3, &[true]),
            Err(TrackerError::DimensionMismatch { expected: 3, got: 1, .. })
        ));
    }

    #[test]
    fn predict_into_reuses_buffer() {
        let mut t = Target::new(TargetId(0), v(&[1.0]), 0.0);
        t.observe(&v(&[3.0]), 0.0);
        let mut out = FeatureVec::zeros(1);
        predict_into(&t, &ExtrapolationMask::all(1), &mut out);
        assert_eq!(out[0], 5.0);
    }
}
