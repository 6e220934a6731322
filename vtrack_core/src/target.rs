//! Target: persistent identity, last two positions, age.

use crate::types::{FeatureVec, TargetId};
use serde::{Deserialize, Serialize};

/// A single tracked target. Owned by the tracker's [`TargetTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    /// Persistent identifier
    pub id: TargetId,
    /// Position observed in the most recent frame
    pub position: FeatureVec,
    /// Position observed one frame earlier (None for a newborn target)
    pub previous_position: Option<FeatureVec>,
    /// Number of frames this target has been observed, birth frame included
    pub age: u32,
    /// Score of the match that produced `position`
    pub last_score: f64,
    /// Cleared when the target is matched to a padding column
    pub active: bool,
}

impl Target {
    /// Create a target born from an unclaimed vector.
    pub fn new(id: TargetId, position: FeatureVec, score: f64) -> Self {
        Self {
            id,
            position,
            previous_position: None,
            age: 1,
            last_score: score,
            active: true,
        }
    }

    /// Record the vector this target was matched to in the current frame.
    pub fn observe(&mut self, position: &FeatureVec, score: f64) {
        let prev = std::mem::replace(&mut self.position, position.clone());
        self.previous_position = Some(prev);
        self.age = self.age.saturating_add(1);
        self.last_score = score;
    }

    /// Mark as retired. The row is removed on the next compaction.
    pub fn retire(&mut self) {
        self.active = false;
    }
}

/// Read-only copy of a target, handed out by the facade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub id: TargetId,
    pub position: Vec<f64>,
    pub age: u32,
    pub last_score: f64,
}

impl From<&Target> for TargetSnapshot {
    fn from(t: &Target) -> Self {
        Self {
            id: t.id,
            position: t.position.iter().copied().collect(),
            age: t.age,
            last_score: t.last_score,
        }
    }
}

/// Targets in cost-matrix row order. Row order carries no meaning beyond
/// indexing the current frame's matrix.
#[derive(Clone, Debug, Default)]
pub struct TargetTable {
    rows: Vec<Target>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, target: Target) {
        debug_assert!(
            self.rows.iter().all(|t| !t.active || t.id != target.id),
            "duplicate active id {}",
            target.id
        );
        self.rows.push(target);
    }

    pub fn get_mut(&mut self, row: usize) -> Option<&mut Target> {
        self.rows.get_mut(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.rows.iter()
    }

    /// Drop retired rows. Returns count of removed targets.
    pub fn retain_active(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|t| t.active);
        before - self.rows.len()
    }

    /// Retire every target, returning their IDs in row order.
    pub fn drain_ids(&mut self) -> Vec<TargetId> {
        self.rows.drain(..).map(|t| t.id).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> FeatureVec {
        FeatureVec::from_vec(vec![x, y])
    }

    #[test]
    fn observe_shifts_history_and_ages() {
        let mut t = Target::new(TargetId(3), v(0.0, 0.0), 1e6);
        assert_eq!(t.age, 1);
        assert!(t.previous_position.is_none());

        t.observe(&v(1.0, 2.0), 0.5);
        assert_eq!(t.age, 2);
        assert_eq!(t.previous_position, Some(v(0.0, 0.0)));
        assert_eq!(t.position, v(1.0, 2.0));
        assert_eq!(t.last_score, 0.5);
    }

    #[test]
    fn retain_active_removes_retired_rows() {
        let mut table = TargetTable::new();
        table.push(Target::new(TargetId(0), v(0.0, 0.0), 0.0));
        table.push(Target::new(TargetId(1), v(1.0, 1.0), 0.0));
        table.push(Target::new(TargetId(2), v(2.0, 2.0), 0.0));
        table.get_mut(1).unwrap().retire();

        assert_eq!(table.retain_active(), 1);
        let ids: Vec<_> = table.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TargetId(0), TargetId(2)]);
    }

    #[test]
    fn snapshot_copies_position() {
        let t = Target::new(TargetId(9), v(4.0, 5.0), 2.0);
        let s = TargetSnapshot::from(&t);
        assert_eq!(s.position, vec![4.0, 5.0]);
        assert_eq!(s.id, TargetId(9));
    }
}
