//! `vtrack_core` — Frame-to-frame identity assignment for unordered sets of
//! N-dimensional feature vectors.
//!
//! Each frame the caller pushes a set of vectors; the tracker matches them
//! against the targets of the previous frame with a minimum-cost assignment
//! and hands back a persistent [`TargetId`] per input index.
//!
//! # Module layout
//! - [`types`]         — IDs, feature vectors, policy enums
//! - [`error`]         — `TrackerError` and the crate `Result`
//! - [`distance`]      — Normalized Euclidean metric and custom distance/quality functions
//! - [`extrapolation`] — Per-dimension linear prediction mask
//! - [`target`]        — Target state and the target table
//! - [`cost_matrix`]   — Padded square cost matrix construction
//! - [`trivial`]       — Mutual-nearest-neighbour fast path
//! - [`hungarian`]     — Kuhn-Munkres solver with deterministic tie-breaking
//! - [`identity`]      — ID allocation policies (first-free / brand-new)
//! - [`tracker`]       — `VectorTracker` facade
//! - [`position`]      — 2-D point tracker
//! - [`metrics`]       — ID-switch and fragmentation counters

pub mod cost_matrix;
pub mod distance;
pub mod error;
pub mod extrapolation;
pub mod hungarian;
pub mod identity;
pub mod metrics;
pub mod position;
pub mod target;
pub mod tracker;
pub mod trivial;
pub mod types;

pub use distance::{DistanceFunction, DistanceMetric, NormalizedEuclidean};
pub use error::{Result, TrackerError};
pub use metrics::IdentityMetrics;
pub use position::PositionTracker;
pub use target::TargetSnapshot;
pub use tracker::{FrameStats, VectorTracker, VectorTrackerConfig};
pub use types::{FeatureVec, IdMode, Polarity, TargetId};
