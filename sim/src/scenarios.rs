//! Scenario definitions.
//!
//! Each scenario is a named set of sources plus stream parameters.
//! All scenarios are deterministic given the same seed.

use crate::{
    stream::{Frame, StreamParams, VectorStream},
    target::{MotionSpec, SimTarget},
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use vtrack_core::VectorTrackerConfig;

/// Which pre-defined scenario to load.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// 5 sources, 2-D, straight lines, low noise
    Simple,
    /// 8 sources on a ring converging on the centre
    Crossing,
    /// 12 sources in 3-D appearing and disappearing, with misses
    Churn,
    /// 200 sources in 4-D, scalability stress test
    Dense,
}

/// A fully configured scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    pub dim: usize,
    pub frames: u64,
    /// Padding cost suited to the scenario's spatial scale
    pub large_distance: f64,
    /// Fast-path gate suited to the scenario's noise
    pub distance_threshold: f64,
    pub params: StreamParams,
    pub targets: Vec<SimTarget>,
}

impl Scenario {
    /// Build the named scenario. Uses `seed` for repeatability.
    pub fn build(kind: ScenarioKind, seed: u64) -> Self {
        match kind {
            ScenarioKind::Simple => Self::simple(seed),
            ScenarioKind::Crossing => Self::crossing(seed),
            ScenarioKind::Churn => Self::churn(seed),
            ScenarioKind::Dense => Self::dense(seed),
        }
    }

    /// Tracker configuration matching the scenario's scale.
    pub fn tracker_config(&self) -> VectorTrackerConfig {
        VectorTrackerConfig {
            distance_threshold: self.distance_threshold,
            ..VectorTrackerConfig::new(self.dim, self.large_distance)
        }
    }

    /// Frame generator seeded from the scenario seed.
    pub fn stream(&self) -> VectorStream {
        VectorStream::new(self.targets.clone(), self.params.clone(), self.seed)
    }

    /// All frames of the scenario.
    pub fn generate(&self) -> Vec<Frame> {
        self.stream().take_frames(self.frames)
    }

    // -----------------------------------------------------------------------
    // Scenario 1: Simple
    // -----------------------------------------------------------------------
    fn simple(seed: u64) -> Self {
        let cv = |vx: f64, vy: f64| MotionSpec::ConstantVelocity {
            velocity: vec![vx, vy],
        };
        let targets = vec![
            SimTarget::new(0, vec![-200.0, 0.0], cv(1.5, 0.0)),
            SimTarget::new(1, vec![0.0, -200.0], cv(0.0, 1.5)),
            SimTarget::new(2, vec![100.0, 100.0], cv(-0.8, -0.8)),
            SimTarget::new(3, vec![-50.0, 150.0], cv(1.0, -0.5)),
            SimTarget::new(4, vec![150.0, -50.0], cv(-0.5, 1.2)),
        ];

        Scenario {
            name: "simple".into(),
            seed,
            dim: 2,
            frames: 100,
            large_distance: 1.0e6,
            distance_threshold: 2.0,
            params: StreamParams {
                noise: 0.3,
                ..Default::default()
            },
            targets,
        }
    }

    // -----------------------------------------------------------------------
    // Scenario 2: Crossing
    // -----------------------------------------------------------------------
    fn crossing(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

        let targets = (0..8)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / 8.0;
                let r = 300.0_f64;
                let speed = 2.0 + rng.gen::<f64>() * 3.0;
                let heading = angle + std::f64::consts::PI; // toward the centre
                SimTarget::new(
                    i as u64,
                    vec![r * angle.cos(), r * angle.sin()],
                    MotionSpec::ConstantVelocity {
                        velocity: vec![speed * heading.cos(), speed * heading.sin()],
                    },
                )
            })
            .collect();

        Scenario {
            name: "crossing".into(),
            seed,
            dim: 2,
            frames: 200,
            large_distance: 1.0e6,
            distance_threshold: 2.0,
            params: StreamParams {
                noise: 0.5,
                ..Default::default()
            },
            targets,
        }
    }

    // -----------------------------------------------------------------------
    // Scenario 3: Churn
    // -----------------------------------------------------------------------
    fn churn(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(2));

        let targets = (0..12)
            .map(|i| {
                let origin = vec![
                    (i % 4) as f64 * 150.0,
                    (i / 4) as f64 * 150.0,
                    rng.gen::<f64>() * 50.0,
                ];
                let motion = if i % 2 == 0 {
                    MotionSpec::Stationary
                } else {
                    MotionSpec::Oscillating {
                        amplitude: vec![20.0, 10.0, 5.0],
                        period: 30.0 + rng.gen::<f64>() * 30.0,
                    }
                };
                let appear = rng.gen_range(0u64..60);
                let lifetime = rng.gen_range(20u64..100);
                SimTarget::new(i as u64, origin, motion)
                    .alive_between(Some(appear), Some(appear + lifetime))
            })
            .collect();

        Scenario {
            name: "churn".into(),
            seed,
            dim: 3,
            frames: 160,
            large_distance: 1.0e6,
            distance_threshold: 3.0,
            params: StreamParams {
                noise: 0.5,
                p_miss: 0.05,
                shuffle: true,
            },
            targets,
        }
    }

    // -----------------------------------------------------------------------
    // Scenario 4: Dense
    // -----------------------------------------------------------------------
    fn dense(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(3));

        let targets = (0..200)
            .map(|i| {
                let origin: Vec<f64> = (0..4).map(|_| (rng.gen::<f64>() - 0.5) * 10_000.0).collect();
                let velocity: Vec<f64> = (0..4).map(|_| (rng.gen::<f64>() - 0.5) * 4.0).collect();
                SimTarget::new(i as u64, origin, MotionSpec::ConstantVelocity { velocity })
            })
            .collect();

        Scenario {
            name: "dense".into(),
            seed,
            dim: 4,
            frames: 60,
            large_distance: 1.0e8,
            distance_threshold: 3.0,
            params: StreamParams {
                noise: 1.0,
                p_miss: 0.02,
                shuffle: true,
            },
            targets,
        }
    }
}
