//! # optval
//!
//! Classical option valuation: binomial lattices, Black-Scholes-Merton,
//! Monte Carlo, and Fourier methods.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ov-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use optval::instruments::{MarketData, OptionContract, OptionType};
//! use optval::pricingengines::BinomialEngine;
//!
//! let put = OptionContract::american(OptionType::Put, 30.0, 45.0, 1.0, 0.3);
//! let market = MarketData::new(0.05);
//! let result = BinomialEngine::new(50).valuate(&put, &market, 50).unwrap();
//! assert!((result.price - 15.0).abs() < 1e-9);
//! ```
//!
//! Rendering layers can ask for the full tree and walk its nodes:
//!
//! ```rust
//! use optval::instruments::{MarketData, OptionContract, OptionType};
//! use optval::pricingengines::{BinomialEngine, BinomialSettings};
//!
//! let call = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
//! let engine = BinomialEngine::new(3)
//!     .with_settings(BinomialSettings::default().with_keep_lattice(true));
//! let result = engine.valuate(&call, &MarketData::new(0.0), 3).unwrap();
//! let lattice = result.lattice.unwrap();
//! for (position, price, payoff, exercised) in lattice.node_positions() {
//!     let _ = (position.x, position.y, price, payoff, exercised);
//! }
//! assert_eq!(lattice.edges().len(), 14);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ov_core as core;

/// Mathematical utilities: distributions, RNG, statistics, regression, DFT.
pub use ov_math as math;

/// Option contracts, payoffs, asset classes, and market data.
pub use ov_instruments as instruments;

/// Numerical methods (lattices, Monte Carlo).
pub use ov_methods as methods;

/// Pricing engines.
pub use ov_pricingengines as pricingengines;

/// Commonly used items.
pub mod prelude {
    pub use ov_core::{Error, Real, Result};
    pub use ov_instruments::{
        AssetClass, ExerciseType, MarketData, OptionContract, OptionType, PricingEngine,
        PricingResults, StochasticVolatility,
    };
    pub use ov_pricingengines::{
        implied_volatility, AnalyticEuropeanEngine, BinomialEngine, BinomialSettings,
        FourierEngine, ImpliedVolatilitySettings, MonteCarloEngine, MonteCarloSettings,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn engines_agree_on_a_european_call() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let m = MarketData::new(0.05);
        let bs = c.price(&AnalyticEuropeanEngine::new(), &m).unwrap().npv;
        let lattice = c.price(&BinomialEngine::new(1000), &m).unwrap().npv;
        let fourier = c.price(&FourierEngine::new(1000), &m).unwrap().npv;
        assert_abs_diff_eq!(lattice, bs, epsilon = 1e-2);
        assert_abs_diff_eq!(fourier, lattice, epsilon = 1e-8);
    }
}
