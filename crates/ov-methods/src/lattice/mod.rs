//! Lattice methods for option pricing.
//!
//! # Overview
//!
//! * [`CrrParameters`]: Cox-Ross-Rubinstein step factors, risk-neutral
//!   probability, and per-step discount
//! * [`BinaryLattice`]: non-recombining binary tree stored as an arena
//! * [`RecombiningTree`]: recombining CRR tree rolled back level by level
//!
//! Both trees value the same contract identically; the recombining one
//! scales to thousands of steps.

pub mod binary_tree;
pub mod recombining_tree;

pub use binary_tree::{BinaryLattice, DrawPosition, LatticeNode, NodeView, MAX_TREE_STEPS};
pub use recombining_tree::RecombiningTree;

use ov_core::{
    errors::{Error, Result},
    DiscountFactor, Probability, Rate, Real, Time, Volatility,
};

/// Cox-Ross-Rubinstein factors for a lattice of `steps` equal time steps.
///
/// ```text
/// Δt = T / n,   u = exp(σ√Δt),   d = 1 / u
/// p  = (exp(bΔt) − d) / (u − d),  discount = exp(−rΔt)
/// ```
///
/// where `b` is the cost of carry of the underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrParameters {
    /// Number of time steps.
    pub steps: usize,
    /// Length of one time step.
    pub dt: Time,
    /// Up factor per step.
    pub up: Real,
    /// Down factor per step.
    pub down: Real,
    /// Risk-neutral probability of an up move.
    pub probability: Probability,
    /// Discount factor over one time step.
    pub discount: DiscountFactor,
}

impl CrrParameters {
    /// Compute the parameters, rejecting a zero step count, a collapsed
    /// lattice (`u ≤ d`) and a probability outside `[0, 1]`.
    pub fn new(
        volatility: Volatility,
        maturity: Time,
        steps: usize,
        rate: Rate,
        cost_of_carry: Rate,
    ) -> Result<Self> {
        let (dt, up, down) = crr_factors(volatility, maturity, steps)?;
        let probability = ((cost_of_carry * dt).exp() - down) / (up - down);
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::InvalidProbability {
                probability,
                up,
                down,
                dt,
            });
        }
        Ok(Self {
            steps,
            dt,
            up,
            down,
            probability,
            discount: (-rate * dt).exp(),
        })
    }
}

/// Step length and up/down factors `(Δt, u, d)` for `steps` steps to
/// `maturity`.
pub fn crr_factors(volatility: Volatility, maturity: Time, steps: usize) -> Result<(Time, Real, Real)> {
    if steps == 0 {
        return Err(Error::InvalidStepCount {
            steps,
            reason: "at least one time step is required".into(),
        });
    }
    let dt = maturity / steps as Real;
    let up = (volatility * dt.sqrt()).exp();
    let down = 1.0 / up;
    if !(up > down) {
        return Err(Error::DegenerateMarketParameters {
            up,
            down,
            volatility,
            dt,
        });
    }
    Ok((dt, up, down))
}
