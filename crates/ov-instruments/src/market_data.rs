//! Market data consumed by the pricing engines.

use ov_core::{
    errors::{Error, Result},
    Rate, Real, Volatility,
};

/// Parameters of a square-root diffusion for the volatility itself.
///
/// ```text
/// dσ = κ(θ − σ)dt + ξ√σ dW_σ,    d⟨W_S, W_σ⟩ = ρ dt
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StochasticVolatility {
    /// Mean-reversion speed κ.
    pub kappa: Real,
    /// Long-run volatility level θ.
    pub theta: Volatility,
    /// Volatility of volatility ξ.
    pub vol_of_vol: Real,
    /// Correlation ρ between price and volatility shocks.
    pub rho: Real,
}

impl StochasticVolatility {
    /// Create a new parameter set.
    pub fn new(kappa: Real, theta: Volatility, vol_of_vol: Real, rho: Real) -> Self {
        Self {
            kappa,
            theta,
            vol_of_vol,
            rho,
        }
    }

    /// Lower Cholesky factor of the 2×2 correlation matrix `[[1, ρ], [ρ, 1]]`.
    ///
    /// Applied to independent normals `(z₁, z₂)` it yields correlated price
    /// and volatility shocks `(z₁, ρz₁ + √(1−ρ²)z₂)`.
    pub fn cholesky(&self) -> Result<[[Real; 2]; 2]> {
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(Error::InvalidArgument(format!(
                "correlation must lie in [-1, 1], got {}",
                self.rho
            )));
        }
        Ok([[1.0, 0.0], [self.rho, (1.0 - self.rho * self.rho).sqrt()]])
    }
}

/// Rates observed in the market for one valuation.
///
/// All rates are continuously compounded annual rates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketData {
    /// Domestic risk-free rate `r`.
    pub risk_free_rate: Rate,
    /// Foreign risk-free rate `rf` (currency options).
    #[cfg_attr(feature = "serde", serde(default))]
    pub foreign_rate: Rate,
    /// Continuous dividend yield `q` (dividend-paying equities, indices).
    #[cfg_attr(feature = "serde", serde(default))]
    pub dividend_yield: Rate,
    /// Optional volatility dynamics for Monte Carlo simulation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stochastic_volatility: Option<StochasticVolatility>,
}

impl MarketData {
    /// Market data with only a risk-free rate.
    pub fn new(risk_free_rate: Rate) -> Self {
        Self {
            risk_free_rate,
            ..Self::default()
        }
    }

    /// Set the dividend yield.
    pub fn with_dividend_yield(mut self, dividend_yield: Rate) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Set the foreign risk-free rate.
    pub fn with_foreign_rate(mut self, foreign_rate: Rate) -> Self {
        self.foreign_rate = foreign_rate;
        self
    }

    /// Attach stochastic volatility parameters.
    pub fn with_stochastic_volatility(mut self, params: StochasticVolatility) -> Self {
        self.stochastic_volatility = Some(params);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn builder_sets_rates() {
        let m = MarketData::new(0.05)
            .with_dividend_yield(0.02)
            .with_foreign_rate(0.01);
        assert_abs_diff_eq!(m.risk_free_rate, 0.05);
        assert_abs_diff_eq!(m.dividend_yield, 0.02);
        assert_abs_diff_eq!(m.foreign_rate, 0.01);
        assert!(m.stochastic_volatility.is_none());
    }

    #[test]
    fn cholesky_reproduces_correlation() {
        let sv = StochasticVolatility::new(2.0, 0.2, 0.1, -0.6);
        let l = sv.cholesky().unwrap();
        // (L Lᵀ)₁₀ = ρ and (L Lᵀ)₁₁ = 1
        assert_abs_diff_eq!(l[1][0] * l[0][0], -0.6, epsilon = 1e-15);
        assert_abs_diff_eq!(l[1][0].powi(2) + l[1][1].powi(2), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn cholesky_rejects_invalid_correlation() {
        let sv = StochasticVolatility::new(2.0, 0.2, 0.1, 1.5);
        assert!(matches!(sv.cholesky(), Err(Error::InvalidArgument(_))));
    }
}
