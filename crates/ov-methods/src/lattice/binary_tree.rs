//! Non-recombining binary lattice.
//!
//! The tree is a perfect binary tree of height `n` stored in heap order:
//!
//! ```text
//! root          0
//! down child    2i + 1
//! up child      2i + 2
//! parent        (i − 1) / 2
//! ```
//!
//! An up move followed by a down move lands on a different node than a down
//! move followed by an up move, so a tree of `n` steps holds `2^(n+1) − 1`
//! nodes. Traversals walk the arena in index order (parents before
//! children) or in reverse (children before parents) instead of recursing.

use ov_core::{
    errors::{Error, Result},
    DiscountFactor, Probability, Real,
};

/// Largest step count the arena accepts (about two million nodes).
pub const MAX_TREE_STEPS: usize = 20;

/// Horizontal and vertical spacing between a node and its children.
const DRAW_SPACING: Real = 10.0;

/// Plotting coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawPosition {
    /// Horizontal coordinate (grows with depth).
    pub x: Real,
    /// Vertical coordinate (up moves go higher).
    pub y: Real,
}

/// One state of the underlying at one (step, path) position.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeNode {
    /// Steps elapsed since the root.
    pub depth: usize,
    /// Price of the underlying in this state.
    pub underlying_price: Real,
    /// Option value, `None` until backward induction has run.
    pub payoff: Option<Real>,
    /// Whether immediate exercise was chosen at this node.
    pub exercised: bool,
    /// Where a renderer should draw the node.
    pub draw_position: DrawPosition,
}

/// `(draw position, underlying price, payoff, exercised)` of one node.
pub type NodeView = (DrawPosition, Real, Option<Real>, bool);

/// A non-recombining binary tree of underlying prices.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryLattice {
    steps: usize,
    nodes: Vec<LatticeNode>,
}

impl BinaryLattice {
    /// Build a tree of `steps` levels below the root, pricing each child
    /// from its parent as it is attached.
    ///
    /// With zero steps the tree is a single leaf at `spot`.
    pub fn build(steps: usize, spot: Real, up: Real, down: Real) -> Result<Self> {
        if steps > MAX_TREE_STEPS {
            return Err(Error::InvalidStepCount {
                steps,
                reason: format!(
                    "a non-recombining tree holds at most {MAX_TREE_STEPS} steps; use the recombining tree"
                ),
            });
        }

        let count = (1usize << (steps + 1)) - 1;
        let mut nodes = Vec::with_capacity(count);
        nodes.push(LatticeNode {
            depth: 0,
            underlying_price: spot,
            payoff: None,
            exercised: false,
            draw_position: DrawPosition {
                x: 0.0,
                y: (steps + 1) as Real * DRAW_SPACING,
            },
        });
        for i in 1..count {
            let parent = &nodes[(i - 1) / 2];
            let (factor, dy) = if is_up_child(i) {
                (up, DRAW_SPACING)
            } else {
                (down, -DRAW_SPACING)
            };
            let node = LatticeNode {
                depth: parent.depth + 1,
                underlying_price: parent.underlying_price * factor,
                payoff: None,
                exercised: false,
                draw_position: DrawPosition {
                    x: parent.draw_position.x + DRAW_SPACING,
                    y: parent.draw_position.y + dy,
                },
            };
            nodes.push(node);
        }

        Ok(Self { steps, nodes })
    }

    /// Reprice every node: root at `spot`, each child its parent times the
    /// up or down factor.
    pub fn propagate(&mut self, spot: Real, up: Real, down: Real) {
        self.nodes[0].underlying_price = spot;
        for i in 1..self.nodes.len() {
            let factor = if is_up_child(i) { up } else { down };
            self.nodes[i].underlying_price = self.nodes[(i - 1) / 2].underlying_price * factor;
        }
    }

    /// Backward induction from the leaves to the root.
    ///
    /// Leaves take `payoff(S)` and are flagged exercised when it is positive.
    /// Interior nodes take the discounted expectation of their children,
    /// `discount · (p·V_up + (1−p)·V_down)`; with `early_exercise` they take
    /// the larger of that and `payoff(S)` and are flagged when immediate
    /// exercise is strictly better. Previous results are overwritten, so
    /// running it twice gives the same tree.
    ///
    /// Returns the root value.
    pub fn induct(
        &mut self,
        payoff: &dyn Fn(Real) -> Real,
        probability: Probability,
        discount: DiscountFactor,
        early_exercise: bool,
    ) -> Real {
        let count = self.nodes.len();
        let first_leaf = self.first_leaf();
        let mut values = vec![0.0; count];

        for i in (0..count).rev() {
            let immediate = payoff(self.nodes[i].underlying_price);
            let (value, exercised) = if i >= first_leaf {
                (immediate, immediate > 0.0)
            } else {
                let continuation = discount
                    * (probability * values[2 * i + 2] + (1.0 - probability) * values[2 * i + 1]);
                if early_exercise {
                    (immediate.max(continuation), immediate > continuation)
                } else {
                    (continuation, false)
                }
            };
            values[i] = value;
            let node = &mut self.nodes[i];
            node.payoff = Some(value);
            node.exercised = exercised;
        }

        values[0]
    }

    /// Number of steps between the root and the leaves.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Total number of nodes, `2^(n+1) − 1`.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves, `2^n`.
    pub fn leaf_count(&self) -> usize {
        1 << self.steps
    }

    /// The root node.
    pub fn root(&self) -> &LatticeNode {
        &self.nodes[0]
    }

    /// Node at arena index `i`.
    pub fn node(&self, i: usize) -> Option<&LatticeNode> {
        self.nodes.get(i)
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[LatticeNode] {
        &self.nodes
    }

    /// The leaves, from the all-down path to the all-up path in arena order.
    pub fn leaves(&self) -> &[LatticeNode] {
        &self.nodes[self.first_leaf()..]
    }

    /// Whether `i` is a leaf.
    pub fn is_leaf(&self, i: usize) -> bool {
        i >= self.first_leaf() && i < self.nodes.len()
    }

    /// Index of the up child of `i`, if any.
    pub fn up_child(&self, i: usize) -> Option<usize> {
        (i < self.first_leaf()).then_some(2 * i + 2)
    }

    /// Index of the down child of `i`, if any.
    pub fn down_child(&self, i: usize) -> Option<usize> {
        (i < self.first_leaf()).then_some(2 * i + 1)
    }

    /// Index of the parent of `i`; `None` for the root.
    pub fn parent(&self, i: usize) -> Option<usize> {
        (i > 0 && i < self.nodes.len()).then(|| (i - 1) / 2)
    }

    /// Value at the root, once induction has run.
    pub fn root_payoff(&self) -> Option<Real> {
        self.nodes[0].payoff
    }

    /// Every node in pre-order (node, down subtree, up subtree).
    pub fn node_positions(&self) -> Vec<NodeView> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0usize];
        while let Some(i) = stack.pop() {
            let n = &self.nodes[i];
            out.push((n.draw_position, n.underlying_price, n.payoff, n.exercised));
            if let (Some(down), Some(up)) = (self.down_child(i), self.up_child(i)) {
                stack.push(up);
                stack.push(down);
            }
        }
        out
    }

    /// Parent-to-child segments, one per non-root node, in arena order.
    pub fn edges(&self) -> Vec<(DrawPosition, DrawPosition)> {
        (1..self.nodes.len())
            .map(|i| {
                (
                    self.nodes[(i - 1) / 2].draw_position,
                    self.nodes[i].draw_position,
                )
            })
            .collect()
    }

    fn first_leaf(&self) -> usize {
        (1 << self.steps) - 1
    }
}

#[inline]
fn is_up_child(i: usize) -> bool {
    i % 2 == 0
}
