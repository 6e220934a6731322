//! Hungarian algorithm — O(n³) Kuhn-Munkres on a square cost matrix.
//!
//! Shortest-augmenting-path formulation with row potentials `u` and column
//! potentials `v`. Rows are inserted one at a time in ascending order; each
//! insertion grows an alternating tree until it reaches a free column.
//!
//! # Tie-breaking
//! The solver is deterministic. While scanning columns, a strictly smaller
//! reduced cost is required to move the candidate, so among equal reduced
//! costs the lowest column index wins. Combined with the fixed row order this
//! yields the same permutation for the same matrix on every run.
//!
//! Non-finite cells never stall the search: when no finite reduced cost is
//! left for the current row, the lowest unused column is taken. The result
//! is always a permutation.

use crate::cost_matrix::CostMatrix;

/// Solver with scratch buffers reused across frames.
#[derive(Clone, Debug, Default)]
pub struct HungarianSolver {
    u: Vec<f64>,
    v: Vec<f64>,
    /// p[j] = row assigned to column j (1-indexed, 0 = none)
    p: Vec<usize>,
    /// way[j] = previous column in augmenting path
    way: Vec<usize>,
    minv: Vec<f64>,
    used: Vec<bool>,
    assignment: Vec<usize>,
}

impl HungarianSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum-cost perfect matching. Returns `perm` with `perm[row] = col`.
    pub fn solve(&mut self, cost: &CostMatrix) -> &[usize] {
        let n = cost.size();
        self.prepare(n);
        let c = cost.as_slice();

        for i in 1..=n {
            self.p[0] = i;
            let mut j0 = 0usize;
            self.minv.iter_mut().for_each(|m| *m = f64::INFINITY);
            self.used.iter_mut().for_each(|u| *u = false);

            loop {
                self.used[j0] = true;
                let i0 = self.p[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0;
                for j in 1..=n {
                    if !self.used[j] {
                        let val = c[(i0 - 1) * n + (j - 1)] - self.u[i0] - self.v[j];
                        if val < self.minv[j] {
                            self.minv[j] = val;
                            self.way[j] = j0;
                        }
                        if self.minv[j] < delta {
                            delta = self.minv[j];
                            j1 = j;
                        }
                    }
                }
                if !delta.is_finite() {
                    // No finite reduced cost left: take the lowest unused column
                    j1 = (1..=n).find(|&j| !self.used[j]).unwrap_or(0);
                    self.way[j1] = j0;
                    delta = 0.0;
                }
                for j in 0..=n {
                    if self.used[j] {
                        self.u[self.p[j]] += delta;
                        self.v[j] -= delta;
                    } else {
                        self.minv[j] -= delta;
                    }
                }
                j0 = j1;
                if self.p[j0] == 0 {
                    break;
                }
            }

            // Augment
            loop {
                let j1 = self.way[j0];
                self.p[j0] = self.p[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        // Decode: p[j] = row for column j (1-indexed)
        for j in 1..=n {
            if self.p[j] != 0 {
                self.assignment[self.p[j] - 1] = j - 1;
            }
        }
        &self.assignment
    }

    fn prepare(&mut self, n: usize) {
        for buf in [&mut self.u, &mut self.v, &mut self.minv] {
            buf.clear();
            buf.resize(n + 1, 0.0);
        }
        for buf in [&mut self.p, &mut self.way] {
            buf.clear();
            buf.resize(n + 1, 0);
        }
        self.used.clear();
        self.used.resize(n + 1, false);
        self.assignment.clear();
        self.assignment.resize(n, 0);
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
