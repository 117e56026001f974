//! Recombining Cox-Ross-Rubinstein tree.
//!
//! Level `i` has `i + 1` nodes; node `(i, j)` is the state after `j` up moves
//! and `i − j` down moves, with underlying `S₀ · d^(i−j) · u^j`. Because
//! `u·d = 1` the up-down and down-up paths meet, so rolling back needs one
//! vector of `n + 1` values and `O(n²)` work.

use ov_core::{DiscountFactor, Probability, Real};

/// A recombining binomial tree with constant up and down factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecombiningTree {
    spot: Real,
    up: Real,
    down: Real,
    steps: usize,
}

impl RecombiningTree {
    /// Create a tree of `steps` steps starting at `spot`.
    pub fn new(spot: Real, up: Real, down: Real, steps: usize) -> Self {
        Self {
            spot,
            up,
            down,
            steps,
        }
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of nodes at level `i`.
    pub fn size(&self, i: usize) -> usize {
        i + 1
    }

    /// Index of the child of `(i, index)` at level `i + 1`; `branch = 0` is
    /// down, `1` is up.
    pub fn descendant(&self, _i: usize, index: usize, branch: usize) -> usize {
        index + branch
    }

    /// Underlying value at node `(i, index)`.
    pub fn underlying(&self, i: usize, index: usize) -> Real {
        self.spot * self.down.powi((i - index) as i32) * self.up.powi(index as i32)
    }

    /// Roll the payoff back to the root.
    ///
    /// Same recurrence as the non-recombining lattice: discounted
    /// expectation at every level, floored by immediate exercise when
    /// `early_exercise` is set.
    pub fn rollback(
        &self,
        payoff: &dyn Fn(Real) -> Real,
        probability: Probability,
        discount: DiscountFactor,
        early_exercise: bool,
    ) -> Real {
        let n = self.steps;
        let mut values: Vec<Real> = (0..self.size(n))
            .map(|j| payoff(self.underlying(n, j)))
            .collect();

        for i in (0..n).rev() {
            for j in 0..self.size(i) {
                let up = values[self.descendant(i, j, 1)];
                let down = values[self.descendant(i, j, 0)];
                let hold = discount * (probability * up + (1.0 - probability) * down);
                values[j] = if early_exercise {
                    hold.max(payoff(self.underlying(i, j)))
                } else {
                    hold
                };
            }
        }

        values[0]
    }
}
