//! Identity allocation: which integer a newborn target gets, and what
//! happens to the ID of a retired one.
//!
//! # Policies
//! - **FirstFree**: retired IDs go into a sorted pool; a newborn target takes
//!   the smallest pooled ID, or the next counter value if the pool is empty.
//! - **BrandNew**: a monotonically increasing counter; retired IDs are
//!   discarded and never reissued.

use crate::types::{IdMode, TargetId};
use std::collections::BTreeSet;

/// Hands out and takes back [`TargetId`]s.
#[derive(Clone, Debug, Default)]
pub struct IdentityAllocator {
    mode: IdMode,
    next_id: u64,
    free: BTreeSet<TargetId>,
}

impl IdentityAllocator {
    pub fn new(mode: IdMode) -> Self {
        Self {
            mode,
            next_id: 0,
            free: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> IdMode {
        self.mode
    }

    /// ID for a newborn target.
    pub fn allocate(&mut self) -> TargetId {
        if self.mode == IdMode::FirstFree {
            if let Some(id) = self.free.pop_first() {
                return id;
            }
        }
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Give back the ID of a retired target.
    pub fn retire(&mut self, id: TargetId) {
        match self.mode {
            IdMode::FirstFree => {
                debug_assert!(id.0 < self.next_id, "retiring unissued id {id}");
                self.free.insert(id);
            }
            IdMode::BrandNew => {}
        }
    }

    /// Pooled IDs in reuse order.
    pub fn free_ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.free.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_free_reuses_smallest() {
        let mut a = IdentityAllocator::new(IdMode::FirstFree);
        let ids: Vec<_> = (0..4).map(|_| a.allocate()).collect();
        assert_eq!(ids, vec![TargetId(0), TargetId(1), TargetId(2), TargetId(3)]);

        a.retire(TargetId(2));
        a.retire(TargetId(0));
        assert_eq!(a.allocate(), TargetId(0));
        assert_eq!(a.allocate(), TargetId(2));
        assert_eq!(a.allocate(), TargetId(4));
    }

    #[test]
    fn brand_new_never_reissues() {
        let mut a = IdentityAllocator::new(IdMode::BrandNew);
        let first = a.allocate();
        a.retire(first);
        let second = a.allocate();
        assert!(second > first);
        assert!(!a.free.contains(&first));
        assert_eq!(a.next_id, 2);
    }

    #[test]
    fn pool_is_ordered() {
        let mut a = IdentityAllocator::new(IdMode::FirstFree);
        for _ in 0..5 {
            a.allocate();
        }
        a.retire(TargetId(4));
        a.retire(TargetId(1));
        a.retire(TargetId(3));
        let pooled: Vec<_> = a.free_ids().collect();
        assert_eq!(pooled, vec![TargetId(1), TargetId(3), TargetId(4)]);
    }
}
