//! Drive a `VectorTracker` over labelled frames and score its identities.

use crate::stream::Frame;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use vtrack_core::{IdentityMetrics, TargetId, TargetSnapshot, VectorTracker, VectorTrackerConfig};

/// Outcome of one tracker run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub frames: u64,
    /// Frames resolved by the trivial-assignment fast path
    pub fast_path_frames: u64,
    pub births: u64,
    pub retirements: u64,
    /// Targets alive after the last frame
    pub final_targets: usize,
    /// Their state after the last frame
    pub survivors: Vec<TargetSnapshot>,
    pub elapsed_s: f64,
    pub metrics: IdentityMetrics,
}

impl RunReport {
    pub fn id_switch_rate(&self) -> f64 {
        self.metrics.id_switch_rate()
    }
}

/// Run a fresh tracker built from `config` over `frames`.
pub fn evaluate(frames: &[Frame], config: VectorTrackerConfig) -> anyhow::Result<RunReport> {
    let tracker = VectorTracker::new(config).context("building tracker")?;
    evaluate_tracker(frames, tracker)
}

/// Run an already configured tracker over `frames`.
pub fn evaluate_tracker(frames: &[Frame], mut tracker: VectorTracker) -> anyhow::Result<RunReport> {
    let mut report = RunReport::default();
    let start = Instant::now();

    for frame in frames {
        tracker
            .push_data(&frame.feature_vecs())
            .with_context(|| format!("frame {}", frame.index))?;

        let stats = tracker.last_frame()?;
        report.frames += 1;
        report.births += stats.births as u64;
        report.retirements += stats.retirements as u64;
        if stats.fast_path {
            report.fast_path_frames += 1;
        }

        let ids: Vec<TargetId> = tracker.ids()?;
        let pairs: Vec<(u64, TargetId)> = frame.labels.iter().copied().zip(ids).collect();
        report.metrics.accumulate(&pairs);
    }

    report.elapsed_s = start.elapsed().as_secs_f64();
    report.survivors = tracker.snapshot()?;
    report.final_targets = report.survivors.len();
    Ok(report)
}
