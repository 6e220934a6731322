//! `VectorTracker` facade: the full association cycle for one frame.
//!
//! # Processing steps per `push_data`
//! 1. Validate every vector's dimension (the frame is rejected wholesale)
//! 2. Empty frame: retire every target. No targets yet: birth every vector
//! 3. Predict each target's current-frame position (extrapolation mask)
//! 4. Build the padded square cost matrix
//! 5. Try the trivial one-to-one fast path, else run the Hungarian solver
//! 6. Update matched targets, birth targets for padding-row matches, retire
//!    targets matched to padding columns
//! 7. Compact the target table
//!
//! A target that misses a single frame is retired immediately; there is no
//! grace period. A pair whose score is not finite (a custom function gating
//! it out with `INFINITY`, or a NaN component) is never a match: the target
//! is retired and the vector starts a new one.

use crate::{
    cost_matrix::CostMatrixBuilder,
    distance::{DistanceFunction, DistanceMetric, NormalizedEuclidean},
    error::{Result, TrackerError},
    extrapolation::ExtrapolationMask,
    hungarian::HungarianSolver,
    identity::IdentityAllocator,
    target::{Target, TargetSnapshot, TargetTable},
    trivial::TrivialAssignmentOptimizer,
    types::{FeatureVec, IdMode, Polarity, TargetId},
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Construction parameters for a [`VectorTracker`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorTrackerConfig {
    /// Feature dimensionality, fixed for the tracker's lifetime.
    pub dim: usize,
    /// Cost of every padding cell. Must exceed the largest plausible real
    /// distance by a wide margin (at least 100x).
    pub large_distance: f64,
    /// Per-dimension scale factors; empty means all ones.
    pub norm_factors: Vec<f64>,
    /// Return `sqrt` of the normalized Euclidean distance.
    pub root_compressed: bool,
    /// ID allocation policy.
    pub id_mode: IdMode,
    /// Gate of the trivial-assignment fast path.
    pub distance_threshold: f64,
    /// Enable the trivial-assignment fast path.
    pub try_opt: bool,
    /// Replaces the built-in metric when set.
    #[serde(skip)]
    pub distance_function: Option<DistanceFunction>,
}

impl Default for VectorTrackerConfig {
    fn default() -> Self {
        Self {
            dim: 2,
            large_distance: 1.0e6,
            norm_factors: Vec::new(),
            root_compressed: true,
            id_mode: IdMode::FirstFree,
            distance_threshold: 2.0,
            try_opt: true,
            distance_function: None,
        }
    }
}

impl VectorTrackerConfig {
    /// Configuration with the given dimension and padding cost, defaults
    /// elsewhere.
    pub fn new(dim: usize, large_distance: f64) -> Self {
        Self {
            dim,
            large_distance,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(TrackerError::InvalidConfiguration(
                "dim must be positive".to_string(),
            ));
        }
        if !(self.large_distance.is_finite() && self.large_distance > 0.0) {
            return Err(TrackerError::InvalidConfiguration(format!(
                "large_distance must be positive and finite, got {}",
                self.large_distance
            )));
        }
        if self.distance_threshold.is_nan() {
            return Err(TrackerError::InvalidConfiguration(
                "distance_threshold is NaN".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Frame statistics
// ---------------------------------------------------------------------------

/// What happened in the most recent `push_data`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    /// 1-based index of the frame
    pub frame: u64,
    /// Targets alive before the frame
    pub n_old: usize,
    /// Vectors in the frame
    pub n_new: usize,
    /// Targets born this frame
    pub births: usize,
    /// Targets retired this frame
    pub retirements: usize,
    /// The trivial-assignment fast path resolved the frame
    pub fast_path: bool,
    /// Wall-clock time spent in matching (cost matrix + solver)
    pub match_time_us: u64,
}

// ---------------------------------------------------------------------------
// Owned state
// ---------------------------------------------------------------------------

/// Everything an initialized tracker owns. Cloning duplicates all of it.
#[derive(Clone, Debug)]
struct TrackerState {
    dim: usize,
    large_distance: f64,
    metric: NormalizedEuclidean,
    custom: Option<DistanceFunction>,
    mask: ExtrapolationMask,
    trivial: TrivialAssignmentOptimizer,
    targets: TargetTable,
    ids: IdentityAllocator,
    builder: CostMatrixBuilder,
    solver: HungarianSolver,
    /// perm[row] = col for the current frame
    perm: Vec<usize>,
    /// (id, score) per vector index of the last frame
    results: Vec<(TargetId, f64)>,
    /// Vector indices waiting for a fresh ID
    births: Vec<usize>,
    last: FrameStats,
}

impl TrackerState {
    fn new(config: VectorTrackerConfig) -> Result<Self> {
        config.validate()?;
        let metric =
            NormalizedEuclidean::new(config.dim, &config.norm_factors, config.root_compressed)?;
        Ok(Self {
            dim: config.dim,
            large_distance: config.large_distance,
            metric,
            custom: config.distance_function,
            mask: ExtrapolationMask::all(config.dim),
            trivial: TrivialAssignmentOptimizer::new(config.try_opt, config.distance_threshold),
            targets: TargetTable::new(),
            ids: IdentityAllocator::new(config.id_mode),
            builder: CostMatrixBuilder::new(),
            solver: HungarianSolver::new(),
            perm: Vec::new(),
            results: Vec::new(),
            births: Vec::new(),
            last: FrameStats::default(),
        })
    }

    fn check_dims(&self, new_data: &[FeatureVec]) -> Result<()> {
        match new_data.iter().position(|v| v.len() != self.dim) {
            Some(index) => Err(TrackerError::DimensionMismatch {
                expected: self.dim,
                got: new_data[index].len(),
                index,
            }),
            None => Ok(()),
        }
    }

    fn push(&mut self, new_data: &[FeatureVec]) -> Result<()> {
        if let Err(e) = self.check_dims(new_data) {
            warn!(error = %e, "rejecting frame");
            return Err(e);
        }

        let n_old = self.targets.len();
        let n_new = new_data.len();
        let mut stats = FrameStats {
            frame: self.last.frame + 1,
            n_old,
            n_new,
            ..Default::default()
        };

        self.results.clear();
        self.births.clear();

        if n_new == 0 {
            for id in self.targets.drain_ids() {
                self.ids.retire(id);
            }
            stats.retirements = n_old;
        } else if n_old == 0 {
            self.births.extend(0..n_new);
            self.results.resize(n_new, (TargetId::default(), self.large_distance));
            stats.births = self.birth_pending(new_data);
        } else {
            self.associate(new_data, &mut stats);
        }

        debug!(
            frame = stats.frame,
            n_old = stats.n_old,
            n_new = stats.n_new,
            births = stats.births,
            retirements = stats.retirements,
            fast_path = stats.fast_path,
            "frame processed"
        );
        self.last = stats;
        Ok(())
    }

    fn associate(&mut self, new_data: &[FeatureVec], stats: &mut FrameStats) {
        let t0 = Instant::now();
        let n_old = self.targets.len();
        let n_new = new_data.len();

        let metric: &dyn DistanceMetric = match &self.custom {
            Some(f) => f,
            None => &self.metric,
        };
        let polarity: Polarity = metric.polarity();
        self.builder.build(
            &self.targets,
            new_data,
            metric,
            &self.mask,
            self.large_distance,
        );

        stats.fast_path = self
            .trivial
            .try_assign(&self.builder, polarity, &mut self.perm);
        if !stats.fast_path {
            trace!(n_old, n_new, "running hungarian solver");
            let perm = self.solver.solve(self.builder.costs());
            self.perm.clear();
            self.perm.extend_from_slice(perm);
        }
        stats.match_time_us = t0.elapsed().as_micros() as u64;

        self.results.resize(n_new, (TargetId::default(), self.large_distance));
        let mut retired = Vec::new();
        for (row, &col) in self.perm.iter().enumerate() {
            match (row < n_old, col < n_new) {
                (true, true) => {
                    let score = self.builder.score(row, col).unwrap_or(self.large_distance);
                    let Some(target) = self.targets.get_mut(row) else {
                        continue;
                    };
                    if score.is_finite() {
                        target.observe(&new_data[col], score);
                        self.results[col] = (target.id, score);
                    } else {
                        // Gated or NaN pair: not a match
                        target.retire();
                        retired.push(target.id);
                        self.births.push(col);
                    }
                }
                (true, false) => {
                    if let Some(target) = self.targets.get_mut(row) {
                        target.retire();
                        retired.push(target.id);
                    }
                }
                (false, true) => self.births.push(col),
                (false, false) => {}
            }
        }

        // Births first: an ID retired this frame is not reissued this frame.
        self.births.sort_unstable();
        stats.births = self.birth_pending(new_data);
        stats.retirements = self.targets.retain_active();
        for id in retired {
            self.ids.retire(id);
        }
    }

    fn birth_pending(&mut self, new_data: &[FeatureVec]) -> usize {
        for &col in &self.births {
            let id = self.ids.allocate();
            self.targets
                .push(Target::new(id, new_data[col].clone(), self.large_distance));
            self.results[col] = (id, self.large_distance);
        }
        self.births.len()
    }

    fn result(&self, index: usize) -> Result<(TargetId, f64)> {
        self.results
            .get(index)
            .copied()
            .ok_or(TrackerError::IndexOutOfRange {
                index,
                len: self.results.len(),
            })
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// Assigns temporally stable IDs to unordered sets of feature vectors.
///
/// `VectorTracker::default()` is a null instance: it can be cloned and
/// assigned, every other operation fails with
/// [`TrackerError::NullTrackerUse`]. `clone()` is a deep copy, so two threads
/// may each drive their own copy without synchronization. A single instance
/// is not reentrant.
#[derive(Clone, Debug, Default)]
pub struct VectorTracker {
    state: Option<Box<TrackerState>>,
}

impl VectorTracker {
    /// Create an initialized tracker.
    pub fn new(config: VectorTrackerConfig) -> Result<Self> {
        let state = TrackerState::new(config)?;
        debug!(dim = state.dim, id_mode = %state.ids.mode(), "vector tracker created");
        Ok(Self {
            state: Some(Box::new(state)),
        })
    }

    pub fn is_null(&self) -> bool {
        self.state.is_none()
    }

    fn state(&self) -> Result<&TrackerState> {
        self.state.as_deref().ok_or(TrackerError::NullTrackerUse)
    }

    fn state_mut(&mut self) -> Result<&mut TrackerState> {
        self.state.as_deref_mut().ok_or(TrackerError::NullTrackerUse)
    }

    /// Advance one frame. On error the tracker state is unchanged.
    pub fn push_data(&mut self, new_data: &[FeatureVec]) -> Result<()> {
        self.state_mut()?.push(new_data)
    }

    /// Persistent ID of `new_data[index]` from the last `push_data`.
    pub fn get_id(&self, index: usize) -> Result<TargetId> {
        Ok(self.state()?.result(index)?.0)
    }

    /// ID and match score of `new_data[index]` from the last `push_data`.
    ///
    /// The score is the raw metric value (distance or quality) between the
    /// vector and its target's prediction. Newborn targets report the
    /// padding cost.
    pub fn get_id_with_score(&self, index: usize) -> Result<(TargetId, f64)> {
        self.state()?.result(index)
    }

    /// All IDs of the last frame, in input order.
    pub fn ids(&self) -> Result<Vec<TargetId>> {
        Ok(self.state()?.results.iter().map(|&(id, _)| id).collect())
    }

    pub fn dim(&self) -> Result<usize> {
        Ok(self.state()?.dim)
    }

    pub fn set_extrapolation_mask(&mut self, mask: &[bool]) -> Result<()> {
        let state = self.state_mut()?;
        state.mask = ExtrapolationMask::from_flags(state.dim, mask)?;
        Ok(())
    }

    pub fn extrapolation_mask(&self) -> Result<&[bool]> {
        Ok(self.state()?.mask.flags())
    }

    /// Replace the metric. The function's polarity is taken as given.
    pub fn set_distance_function(&mut self, func: DistanceFunction) -> Result<()> {
        let state = self.state_mut()?;
        debug!(polarity = ?func.polarity(), "custom distance function installed");
        state.custom = Some(func);
        Ok(())
    }

    /// Go back to the built-in normalized Euclidean metric.
    pub fn clear_distance_function(&mut self) -> Result<()> {
        self.state_mut()?.custom = None;
        Ok(())
    }

    /// Number of live targets.
    pub fn num_targets(&self) -> Result<usize> {
        Ok(self.state()?.targets.len())
    }

    /// Copies of the live targets.
    pub fn snapshot(&self) -> Result<Vec<TargetSnapshot>> {
        Ok(self.state()?.targets.iter().map(TargetSnapshot::from).collect())
    }

    /// IDs currently waiting for reuse (always empty in `BrandNew` mode).
    pub fn free_ids(&self) -> Result<Vec<TargetId>> {
        Ok(self.state()?.ids.free_ids().collect())
    }

    pub fn last_frame(&self) -> Result<&FrameStats> {
        Ok(&self.state()?.last)
    }

    /// Drop every target and restart ID allocation. Configuration, mask and
    /// distance function are kept.
    pub fn reset(&mut self) -> Result<()> {
        let state = self.state_mut()?;
        state.targets = TargetTable::new();
        state.ids = IdentityAllocator::new(state.ids.mode());
        state.results.clear();
        state.last = FrameStats::default();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
