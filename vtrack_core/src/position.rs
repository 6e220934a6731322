//! 2-D convenience wrapper around [`VectorTracker`] for point positions.

use crate::{
    error::Result,
    tracker::{FrameStats, VectorTracker, VectorTrackerConfig},
    types::{FeatureVec, IdMode, TargetId},
};

/// Tracks `(x, y)` points. Same semantics as a `dim = 2` [`VectorTracker`].
#[derive(Clone, Debug, Default)]
pub struct PositionTracker {
    inner: VectorTracker,
    scratch: Vec<FeatureVec>,
}

impl PositionTracker {
    pub fn new(large_distance: f64, id_mode: IdMode) -> Result<Self> {
        let config = VectorTrackerConfig {
            id_mode,
            ..VectorTrackerConfig::new(2, large_distance)
        };
        Self::with_config(config)
    }

    /// Full configuration; `dim` is forced to 2.
    pub fn with_config(config: VectorTrackerConfig) -> Result<Self> {
        let inner = VectorTracker::new(VectorTrackerConfig { dim: 2, ..config })?;
        Ok(Self {
            inner,
            scratch: Vec::new(),
        })
    }

    pub fn push_positions(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.scratch.clear();
        self.scratch
            .extend(points.iter().map(|&(x, y)| FeatureVec::from_vec(vec![x, y])));
        self.inner.push_data(&self.scratch)
    }

    pub fn get_id(&self, index: usize) -> Result<TargetId> {
        self.inner.get_id(index)
    }

    pub fn get_id_with_score(&self, index: usize) -> Result<(TargetId, f64)> {
        self.inner.get_id_with_score(index)
    }

    pub fn ids(&self) -> Result<Vec<TargetId>> {
        self.inner.ids()
    }

    pub fn last_frame(&self) -> Result<&FrameStats> {
        self.inner.last_frame()
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_null()
    }

    pub fn inner(&self) -> &VectorTracker {
        &self.inner
    }
}
