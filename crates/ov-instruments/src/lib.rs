//! # ov-instruments
//!
//! Option contracts, payoffs, asset classes, and market data.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod asset_class;
pub mod contract;
pub mod exercise;
pub mod instrument;
pub mod market_data;
pub mod payoff;

pub use asset_class::AssetClass;
pub use contract::OptionContract;
pub use exercise::ExerciseType;
pub use instrument::{PricingEngine, PricingResults};
pub use market_data::{MarketData, StochasticVolatility};
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
