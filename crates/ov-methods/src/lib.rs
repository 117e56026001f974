//! # ov-methods
//!
//! Numerical methods: binomial lattices and Monte Carlo simulation.
//!
//! # Modules
//!
//! * [`lattice`]: CRR parameters, the non-recombining binary lattice, and
//!   the recombining tree
//! * [`monte_carlo`]: path generation and European / Longstaff-Schwartz
//!   estimators
//!
//! Everything here works on primitives (prices, factors, a payoff closure);
//! mapping contracts and market data onto them is left to the engines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: CRR factors, binary and recombining trees.
pub mod lattice;

/// Monte Carlo simulation: path generation and estimators.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    crr_factors, BinaryLattice, CrrParameters, DrawPosition, LatticeNode, NodeView,
    RecombiningTree, MAX_TREE_STEPS,
};
pub use monte_carlo::{
    european_estimate, longstaff_schwartz, Estimate, PathGenerator, SimulatedPaths,
    SquareRootVolatility,
};
