//! Estimators over simulated paths.

use nalgebra::DMatrix;
use ov_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Real,
};
use ov_math::{polyfit, polyval, Statistics};

/// A Monte Carlo estimate and its standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Sample mean.
    pub value: Real,
    /// Standard error of the mean.
    pub error_estimate: Real,
}

impl Estimate {
    fn from_samples(samples: impl IntoIterator<Item = Real>) -> Result<Self> {
        let mut stats = Statistics::new();
        stats.extend(samples);
        let value = stats
            .mean()
            .ok_or_else(|| Error::Runtime("no simulated paths".into()))?;
        Ok(Self {
            value,
            error_estimate: stats.error_estimate().unwrap_or(0.0),
        })
    }
}

/// `discount · mean(h(S_T))` over the last row of `prices`.
pub fn european_estimate(
    prices: &DMatrix<Real>,
    payoff: &dyn Fn(Real) -> Real,
    discount: DiscountFactor,
) -> Result<Estimate> {
    ensure!(prices.nrows() > 0, "empty path matrix");
    let last = prices.nrows() - 1;
    Estimate::from_samples(prices.row(last).iter().map(|&s| discount * payoff(s)))
}

/// Longstaff-Schwartz least-squares valuation of an early-exercise payoff.
///
/// Working back from maturity, the discounted next-step value
/// `V_{t+1}·df` is regressed on `S_t / scale` with a polynomial of degree
/// `degree`; each path exercises at `t` unless the fitted continuation
/// value exceeds the payoff there. The estimate is `df · mean(V_1)`.
///
/// `step_discount` is the one-step discount factor; `scale` (typically the
/// strike) keeps the polynomial basis well conditioned.
pub fn longstaff_schwartz(
    prices: &DMatrix<Real>,
    payoff: &dyn Fn(Real) -> Real,
    step_discount: DiscountFactor,
    degree: usize,
    scale: Real,
) -> Result<Estimate> {
    let steps = prices.nrows().saturating_sub(1);
    let paths = prices.ncols();
    ensure!(steps > 0, "at least one time step is required");
    ensure!(
        paths > degree,
        "{paths} paths cannot fit a degree {degree} polynomial"
    );
    ensure!(scale > 0.0, "regression scale must be positive, got {scale}");

    let mut values: Vec<Real> = prices.row(steps).iter().map(|&s| payoff(s)).collect();

    for t in (1..steps).rev() {
        let x: Vec<Real> = prices.row(t).iter().map(|&s| s / scale).collect();
        let y: Vec<Real> = values.iter().map(|&v| v * step_discount).collect();
        let coefficients = polyfit(&x, &y, degree)?;
        for j in 0..paths {
            let exercise = payoff(prices[(t, j)]);
            let continuation = polyval(&coefficients, x[j]);
            values[j] = if continuation > exercise { y[j] } else { exercise };
        }
    }

    Estimate::from_samples(values.into_iter().map(|v| step_discount * v))
}
