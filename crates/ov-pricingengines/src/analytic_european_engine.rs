//! Analytic European option engine (Black-Scholes-Merton).
//!
//! Prices European options in closed form and reports first and
//! second-order Greeks. The asset class enters through the cost of carry
//! `b`, i.e. an effective dividend yield `q = r − b`.

use ov_core::{ensure, errors::Result, Rate, Real, Time, Volatility};
use ov_instruments::{MarketData, OptionContract, OptionType, PricingEngine, PricingResults};
use ov_math::distributions::{normal_cdf, normal_pdf};

/// Black-Scholes-Merton price and sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlackScholesResult {
    /// Option value.
    pub price: Real,
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂σ per unit of volatility.
    pub vega: Real,
    /// ∂V/∂t per year.
    pub theta: Real,
    /// ∂V/∂r per unit of rate.
    pub rho: Real,
}

/// Black-Scholes-Merton value of a European option.
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$.
///
/// At zero maturity the value is the intrinsic value; at zero volatility it
/// is the discounted intrinsic value of the forward.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
) -> BlackScholesResult {
    let phi = option_type.sign();
    let t = time_to_expiry;

    if t <= 0.0 {
        let intrinsic = (phi * (spot - strike)).max(0.0);
        return BlackScholesResult {
            price: intrinsic,
            delta: if intrinsic > 0.0 { phi } else { 0.0 },
            ..BlackScholesResult::default()
        };
    }

    let r = risk_free_rate;
    let q = dividend_yield;
    let sigma = volatility;
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();

    if std_dev <= 1e-15 {
        let value = phi * (spot * df_q - strike * df_r);
        let in_the_money = value > 0.0;
        return BlackScholesResult {
            price: value.max(0.0),
            delta: if in_the_money { phi * df_q } else { 0.0 },
            gamma: 0.0,
            vega: 0.0,
            theta: if in_the_money {
                phi * (q * spot * df_q - r * strike * df_r)
            } else {
                0.0
            },
            rho: if in_the_money {
                phi * strike * t * df_r
            } else {
                0.0
            },
        };
    }

    let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
    let d2 = d1 - std_dev;
    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    BlackScholesResult {
        price: phi * (spot * df_q * nd1 - strike * df_r * nd2),
        delta: phi * df_q * nd1,
        gamma: df_q * npd1 / (spot * std_dev),
        vega: spot * df_q * npd1 * sqrt_t,
        theta: -(spot * df_q * npd1 * sigma) / (2.0 * sqrt_t) - phi * r * strike * df_r * nd2
            + phi * q * spot * df_q * nd1,
        rho: phi * strike * t * df_r * nd2,
    }
}

/// Black-Scholes-Merton value of `contract` under `market`.
pub fn black_scholes_contract(
    contract: &OptionContract,
    market: &MarketData,
) -> BlackScholesResult {
    let r = market.risk_free_rate;
    let q = r - contract.asset_class.cost_of_carry(market);
    black_scholes_merton(
        contract.option_type,
        contract.spot,
        contract.strike,
        r,
        q,
        contract.volatility,
        contract.maturity,
    )
}

/// Closed-form engine for European options.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEuropeanEngine;

impl AnalyticEuropeanEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl PricingEngine for AnalyticEuropeanEngine {
    fn calculate(&self, contract: &OptionContract, market: &MarketData) -> Result<PricingResults> {
        ensure!(
            !contract.allows_early_exercise(),
            "the analytic engine prices European exercise only"
        );
        let bs = black_scholes_contract(contract, market);
        Ok(PricingResults::from_npv(bs.price)
            .with_result("delta", bs.delta)
            .with_result("gamma", bs.gamma)
            .with_result("vega", bs.vega)
            .with_result("theta", bs.theta)
            .with_result("rho", bs.rho))
    }
}
