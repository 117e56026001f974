//! Black-Scholes-Merton implied volatility by bisection.

use crate::analytic_european_engine::black_scholes_contract;
use ov_core::{
    ensure,
    errors::{Error, Result},
    Real, Volatility,
};
use ov_instruments::{MarketData, OptionContract};
use ov_math::solvers1d::bisection;

/// Search settings for [`implied_volatility`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpliedVolatilitySettings {
    /// Largest accepted `|model price − target|`.
    pub accuracy: Real,
    /// Lower end of the volatility bracket.
    pub min_vol: Volatility,
    /// Upper end of the volatility bracket.
    pub max_vol: Volatility,
    /// Maximum number of halvings.
    pub max_iterations: usize,
}

impl Default for ImpliedVolatilitySettings {
    fn default() -> Self {
        Self {
            accuracy: 1.0e-3,
            min_vol: 1.0e-3,
            max_vol: 5.0,
            max_iterations: 10_000,
        }
    }
}

impl ImpliedVolatilitySettings {
    /// Set the price accuracy.
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the volatility bracket.
    pub fn with_bracket(mut self, min_vol: Volatility, max_vol: Volatility) -> Self {
        self.min_vol = min_vol;
        self.max_vol = max_vol;
        self
    }
}

/// Volatility at which the Black-Scholes-Merton value of `contract` matches
/// `target_price`, with the remaining absolute price error.
///
/// The contract's own volatility is ignored. Targets the bracket cannot
/// reach are rejected.
pub fn implied_volatility(
    contract: &OptionContract,
    market: &MarketData,
    target_price: Real,
    settings: &ImpliedVolatilitySettings,
) -> Result<(Volatility, Real)> {
    ensure!(
        !contract.allows_early_exercise(),
        "implied volatility needs a European contract"
    );
    ensure!(
        0.0 < settings.min_vol && settings.min_vol < settings.max_vol,
        "invalid volatility bracket [{}, {}]",
        settings.min_vol,
        settings.max_vol
    );

    let price_at = |sigma: Volatility| {
        black_scholes_contract(&contract.with_volatility(sigma), market).price
    };
    let low = price_at(settings.min_vol);
    let high = price_at(settings.max_vol);
    if target_price < low - settings.accuracy || target_price > high + settings.accuracy {
        return Err(Error::InvalidArgument(format!(
            "target price {target_price} outside attainable range [{low}, {high}]"
        )));
    }

    let sigma = if (low - target_price).abs() < settings.accuracy {
        settings.min_vol
    } else if (high - target_price).abs() < settings.accuracy {
        settings.max_vol
    } else {
        bisection(
            |sigma| price_at(sigma) - target_price,
            settings.min_vol,
            settings.max_vol,
            settings.accuracy,
            settings.max_iterations,
        )?
    };
    let error = (price_at(sigma) - target_price).abs();

    tracing::debug!(sigma, error, target_price, "implied volatility");
    Ok((sigma, error))
}
