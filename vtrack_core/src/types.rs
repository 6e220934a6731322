//! Fundamental types used across the entire workspace.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scalar type: f64 throughout; distances are compared against each other in
// the solver, so precision matters more than memory.
// ---------------------------------------------------------------------------

/// One N-dimensional feature vector (blob centroid, descriptor, ...).
pub type FeatureVec = DVector<f64>;

// ---------------------------------------------------------------------------
// Identifier type — newtype wrapper so IDs are never confused with indices
// ---------------------------------------------------------------------------

/// Persistent identity of a tracked target.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// How identities are handed out to newly appearing targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdMode {
    /// Reuse the smallest retired ID before minting a new one.
    #[default]
    FirstFree,
    /// Always mint a new ID; retired IDs are never reissued.
    BrandNew,
}

/// Orientation of a scoring function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Smaller is better.
    #[default]
    Distance,
    /// Larger is better.
    Quality,
}

impl fmt::Display for IdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdMode::FirstFree => f.write_str("first-free"),
            IdMode::BrandNew => f.write_str("brand-new"),
        }
    }
}
