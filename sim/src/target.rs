//! Simulated vector sources and their trajectories.
//!
//! Each source has an N-dimensional origin and a `MotionSpec`. Positions are
//! closed-form in the frame index, so any frame can be sampled directly.

use serde::{Deserialize, Serialize};

/// How a source moves from frame to frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum MotionSpec {
    /// Stays at its origin.
    Stationary,
    /// Moves by `velocity` every frame.
    ConstantVelocity { velocity: Vec<f64> },
    /// Sinusoid around the origin: `origin + amplitude * sin(2π k / period)`.
    Oscillating { amplitude: Vec<f64>, period: f64 },
}

/// A simulated source with a ground-truth label.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SimTarget {
    /// Ground-truth label (used for metrics)
    pub label: u64,
    /// Position at frame 0
    pub origin: Vec<f64>,
    pub motion: MotionSpec,
    /// Optional: no vectors before this frame
    pub appear_at: Option<u64>,
    /// Optional: no vectors from this frame on
    pub disappear_at: Option<u64>,
}

impl SimTarget {
    pub fn new(label: u64, origin: Vec<f64>, motion: MotionSpec) -> Self {
        Self {
            label,
            origin,
            motion,
            appear_at: None,
            disappear_at: None,
        }
    }

    /// Restrict the source to frames `[appear_at, disappear_at)`.
    pub fn alive_between(mut self, appear_at: Option<u64>, disappear_at: Option<u64>) -> Self {
        self.appear_at = appear_at;
        self.disappear_at = disappear_at;
        self
    }

    pub fn dim(&self) -> usize {
        self.origin.len()
    }

    /// True position at frame `k`.
    pub fn position_at(&self, k: u64) -> Vec<f64> {
        let t = k as f64;
        match &self.motion {
            MotionSpec::Stationary => self.origin.clone(),
            MotionSpec::ConstantVelocity { velocity } => self
                .origin
                .iter()
                .zip(velocity)
                .map(|(p, v)| p + v * t)
                .collect(),
            MotionSpec::Oscillating { amplitude, period } => {
                let phase = (std::f64::consts::TAU * t / period).sin();
                self.origin
                    .iter()
                    .zip(amplitude)
                    .map(|(p, a)| p + a * phase)
                    .collect()
            }
        }
    }

    /// True if the source emits a vector at frame `k`.
    pub fn is_active(&self, k: u64) -> bool {
        if let Some(appear) = self.appear_at {
            if k < appear {
                return false;
            }
        }
        if let Some(disappear) = self.disappear_at {
            if k >= disappear {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_velocity_is_linear() {
        let t = SimTarget::new(
            0,
            vec![1.0, 2.0, 3.0],
            MotionSpec::ConstantVelocity {
                velocity: vec![0.5, -1.0, 0.0],
            },
        );
        assert_eq!(t.position_at(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(t.position_at(4), vec![3.0, -2.0, 3.0]);
    }

    #[test]
    fn oscillation_returns_to_origin() {
        let t = SimTarget::new(
            0,
            vec![10.0, 0.0],
            MotionSpec::Oscillating {
                amplitude: vec![5.0, 2.0],
                period: 20.0,
            },
        );
        let quarter = t.position_at(5);
        assert_abs_diff_eq!(quarter[0], 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(quarter[1], 2.0, epsilon = 1e-9);
        let full = t.position_at(20);
        assert_abs_diff_eq!(full[0], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn activity_window_is_half_open() {
        let t = SimTarget::new(0, vec![0.0], MotionSpec::Stationary).alive_between(Some(3), Some(6));
        assert!(!t.is_active(2));
        assert!(t.is_active(3));
        assert!(t.is_active(5));
        assert!(!t.is_active(6));
    }
}
