//! Identity metrics: ID switches, fragmentations, births.
//!
//! Fed one frame at a time with `(ground-truth label, assigned TargetId)`
//! pairs, e.g. from a simulator that knows which vector came from which
//! source.

use crate::types::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Accumulated identity statistics.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdentityMetrics {
    /// Number of frames evaluated
    pub n_frames: u64,
    /// Total (label, id) pairs evaluated
    pub n_observations: u64,
    /// A label seen in consecutive frames changed ID
    pub id_switches: u64,
    /// A label came back after a gap under a different ID
    pub fragmentations: u64,
    /// IDs present in a frame that were absent from the previous one
    pub births: u64,
    /// Last ID observed per label
    #[serde(skip)]
    last_id: HashMap<u64, TargetId>,
    #[serde(skip)]
    prev_labels: HashSet<u64>,
    #[serde(skip)]
    prev_ids: HashSet<TargetId>,
}

impl IdentityMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// ID switches per observation.
    pub fn id_switch_rate(&self) -> f64 {
        if self.n_observations == 0 {
            0.0
        } else {
            self.id_switches as f64 / self.n_observations as f64
        }
    }

    /// Accumulate one frame's worth of (label, id) pairs.
    pub fn accumulate(&mut self, pairs: &[(u64, TargetId)]) {
        self.n_frames += 1;
        self.n_observations += pairs.len() as u64;

        let mut labels = HashSet::with_capacity(pairs.len());
        let mut ids = HashSet::with_capacity(pairs.len());

        for &(label, id) in pairs {
            if let Some(&last) = self.last_id.get(&label) {
                if last != id {
                    if self.prev_labels.contains(&label) {
                        self.id_switches += 1;
                    } else {
                        self.fragmentations += 1;
                    }
                }
            }
            if !self.prev_ids.contains(&id) {
                self.births += 1;
            }
            self.last_id.insert(label, id);
            labels.insert(label);
            ids.insert(id);
        }

        self.prev_labels = labels;
        self.prev_ids = ids;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
