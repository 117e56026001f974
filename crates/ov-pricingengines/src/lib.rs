//! # ov-pricingengines
//!
//! Pricing engines for single-asset options.
//!
//! ## Engines
//!
//! - [`BinomialEngine`]: Cox-Ross-Rubinstein lattice, European and American
//! - [`AnalyticEuropeanEngine`]: Black-Scholes-Merton closed form with Greeks
//! - [`MonteCarloEngine`]: GBM paths (optionally stochastic volatility),
//!   Longstaff-Schwartz for American exercise
//! - [`FourierEngine`]: European value on the lattice via the DFT
//!
//! [`implied_volatility`] inverts the closed form.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod binomial_engine;
pub mod fourier_engine;
pub mod implied_volatility;
pub mod monte_carlo_engine;

pub use analytic_european_engine::{
    black_scholes_contract, black_scholes_merton, AnalyticEuropeanEngine, BlackScholesResult,
};
pub use binomial_engine::{
    build_lattice, induct_payoffs, lattice_parameters, propagate, BinomialEngine,
    BinomialSettings, LatticeMethod, ValuationResult,
};
pub use fourier_engine::FourierEngine;
pub use implied_volatility::{implied_volatility, ImpliedVolatilitySettings};
pub use monte_carlo_engine::{MonteCarloEngine, MonteCarloSettings, RandomSource};
