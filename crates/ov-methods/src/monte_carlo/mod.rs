//! Monte Carlo simulation.
//!
//! # Overview
//!
//! * [`PathGenerator`]: geometric Brownian motion paths on a uniform grid,
//!   optionally with a square-root diffusion for the volatility
//! * [`SimulatedPaths`]: the simulated price (and volatility) matrices
//! * [`european_estimate`] / [`longstaff_schwartz`]: estimators for
//!   European and early-exercise payoffs
//!
//! Matrices are laid out with one row per time point and one column per
//! path; row 0 is today and row `time_steps` is maturity.

pub mod longstaff_schwartz;

pub use longstaff_schwartz::{european_estimate, longstaff_schwartz, Estimate};

use nalgebra::DMatrix;
use ov_core::{ensure, errors::Result, Rate, Real, Time, Volatility};
use ov_math::random_numbers::{gaussian_grid, GaussianRng};

/// Square-root diffusion driving the volatility.
///
/// ```text
/// v_{t+1} = v_t + κ(θ − v_t⁺)Δt + √(v_t⁺)·ξ√Δt·z_v,    σ_t = v_t⁺
/// ```
///
/// (full-truncation Euler), with `z_v` correlated to the price shock through
/// the lower Cholesky factor `correlation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareRootVolatility {
    /// Mean-reversion speed κ.
    pub kappa: Real,
    /// Long-run level θ.
    pub theta: Volatility,
    /// Volatility of volatility ξ.
    pub vol_of_vol: Real,
    /// Lower Cholesky factor of the price/volatility correlation matrix.
    pub correlation: [[Real; 2]; 2],
}

/// Output of a path simulation.
#[derive(Debug, Clone)]
pub struct SimulatedPaths {
    /// Underlying prices, `(time_steps + 1) × paths`.
    pub prices: DMatrix<Real>,
    /// Volatility paths when the volatility is stochastic.
    pub volatilities: Option<DMatrix<Real>>,
    /// Time step.
    pub dt: Time,
}

impl SimulatedPaths {
    /// Number of time steps.
    pub fn time_steps(&self) -> usize {
        self.prices.nrows() - 1
    }

    /// Number of paths.
    pub fn paths(&self) -> usize {
        self.prices.ncols()
    }

    /// Prices at maturity.
    pub fn terminal_prices(&self) -> Vec<Real> {
        self.prices.row(self.time_steps()).iter().copied().collect()
    }
}

/// Generates risk-neutral paths of the underlying.
#[derive(Debug, Clone)]
pub struct PathGenerator {
    spot: Real,
    drift: Rate,
    volatility: Volatility,
    maturity: Time,
    time_steps: usize,
    antithetic: bool,
    moment_matching: bool,
    stochastic_volatility: Option<SquareRootVolatility>,
}

impl PathGenerator {
    /// Create a generator for `S_{t+1} = S_t·exp((b − σ²/2)Δt + σ√Δt·z)`
    /// with `Δt = maturity / time_steps`.
    pub fn new(
        spot: Real,
        drift: Rate,
        volatility: Volatility,
        maturity: Time,
        time_steps: usize,
    ) -> Result<Self> {
        ensure!(time_steps > 0, "at least one time step is required");
        ensure!(maturity > 0.0, "maturity must be positive, got {maturity}");
        ensure!(spot > 0.0, "spot must be positive, got {spot}");
        ensure!(
            volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        Ok(Self {
            spot,
            drift,
            volatility,
            maturity,
            time_steps,
            antithetic: false,
            moment_matching: false,
            stochastic_volatility: None,
        })
    }

    /// Enable antithetic variates and/or moment matching of the draws.
    pub fn with_variance_reduction(mut self, antithetic: bool, moment_matching: bool) -> Self {
        self.antithetic = antithetic;
        self.moment_matching = moment_matching;
        self
    }

    /// Let the volatility follow a square-root diffusion starting at the
    /// generator's volatility.
    pub fn with_stochastic_volatility(mut self, dynamics: SquareRootVolatility) -> Self {
        self.stochastic_volatility = Some(dynamics);
        self
    }

    /// Time step.
    pub fn dt(&self) -> Time {
        self.maturity / self.time_steps as Real
    }

    /// Simulate `paths` paths.
    pub fn generate(&self, rng: &mut dyn GaussianRng, paths: usize) -> Result<SimulatedPaths> {
        let n = self.time_steps;
        let dt = self.dt();
        let sqrt_dt = dt.sqrt();
        let z_price = gaussian_grid(rng, n, paths, self.antithetic, self.moment_matching)?;

        let mut prices = DMatrix::<Real>::zeros(n + 1, paths);
        prices.row_mut(0).fill(self.spot);

        let volatilities = match &self.stochastic_volatility {
            None => {
                let drift = (self.drift - 0.5 * self.volatility * self.volatility) * dt;
                let diffusion = self.volatility * sqrt_dt;
                for t in 1..=n {
                    for j in 0..paths {
                        prices[(t, j)] =
                            prices[(t - 1, j)] * (drift + diffusion * z_price[(t - 1, j)]).exp();
                    }
                }
                None
            }
            Some(sv) => {
                let z_indep = gaussian_grid(rng, n, paths, self.antithetic, self.moment_matching)?;
                let l = sv.correlation;
                let mut raw = DMatrix::<Real>::zeros(n + 1, paths);
                let mut vols = DMatrix::<Real>::zeros(n + 1, paths);
                raw.row_mut(0).fill(self.volatility);
                vols.row_mut(0).fill(self.volatility);
                for t in 1..=n {
                    for j in 0..paths {
                        let z1 = z_price[(t - 1, j)];
                        let z2 = z_indep[(t - 1, j)];
                        let zs = l[0][0] * z1 + l[0][1] * z2;
                        let zv = l[1][0] * z1 + l[1][1] * z2;

                        let sigma = vols[(t - 1, j)];
                        prices[(t, j)] = prices[(t - 1, j)]
                            * ((self.drift - 0.5 * sigma * sigma) * dt + sigma * sqrt_dt * zs)
                                .exp();

                        let v = raw[(t - 1, j)];
                        let v_plus = v.max(0.0);
                        raw[(t, j)] = v
                            + sv.kappa * (sv.theta - v_plus) * dt
                            + v_plus.sqrt() * sv.vol_of_vol * sqrt_dt * zv;
                        vols[(t, j)] = raw[(t, j)].max(0.0);
                    }
                }
                Some(vols)
            }
        };

        Ok(SimulatedPaths {
            prices,
            volatilities,
            dt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ov_math::random_numbers::{InverseCumulativeNormalRng, ZigguratNormalRng};

    #[test]
    fn grid_shape_and_start() {
        let gen = PathGenerator::new(100.0, 0.05, 0.2, 1.0, 12).unwrap();
        let mut rng = ZigguratNormalRng::new(7);
        let p = gen.generate(&mut rng, 100).unwrap();
        assert_eq!(p.prices.nrows(), 13);
        assert_eq!(p.paths(), 100);
        assert_eq!(p.time_steps(), 12);
        assert!(p.prices.row(0).iter().all(|&s| s == 100.0));
        assert!(p.prices.iter().all(|&s| s > 0.0));
        assert!(p.volatilities.is_none());
        assert_abs_diff_eq!(p.dt, 1.0 / 12.0);
    }

    #[test]
    fn zero_volatility_is_deterministic() {
        let gen = PathGenerator::new(100.0, 0.05, 0.0, 2.0, 8).unwrap();
        let mut rng = ZigguratNormalRng::new(1);
        let p = gen.generate(&mut rng, 4).unwrap();
        for s in p.terminal_prices() {
            assert_abs_diff_eq!(s, 100.0 * (0.1_f64).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    fn martingale_under_discounting() {
        let gen = PathGenerator::new(100.0, 0.03, 0.25, 1.0, 10)
            .unwrap()
            .with_variance_reduction(true, true);
        let mut rng = InverseCumulativeNormalRng::new(42);
        let p = gen.generate(&mut rng, 20_000).unwrap();
        let mean = p.terminal_prices().iter().sum::<Real>() / 20_000.0;
        assert_abs_diff_eq!(mean * (-0.03_f64).exp(), 100.0, epsilon = 0.5);
    }

    #[test]
    fn antithetic_needs_even_paths() {
        let gen = PathGenerator::new(100.0, 0.05, 0.2, 1.0, 4)
            .unwrap()
            .with_variance_reduction(true, false);
        let mut rng = ZigguratNormalRng::new(3);
        assert!(gen.generate(&mut rng, 5).is_err());
    }

    #[test]
    fn stochastic_volatility_stays_non_negative() {
        let sv = SquareRootVolatility {
            kappa: 3.0,
            theta: 0.25,
            vol_of_vol: 0.9,
            correlation: [[1.0, 0.0], [-0.5, (0.75_f64).sqrt()]],
        };
        let gen = PathGenerator::new(100.0, 0.05, 0.2, 1.0, 50)
            .unwrap()
            .with_stochastic_volatility(sv);
        let mut rng = ZigguratNormalRng::new(11);
        let p = gen.generate(&mut rng, 500).unwrap();
        let vols = p.volatilities.unwrap();
        assert_eq!(vols.nrows(), 51);
        assert!(vols.iter().all(|&v| v >= 0.0));
        assert!(vols.row(0).iter().all(|&v| v == 0.2));
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(PathGenerator::new(100.0, 0.05, 0.2, 1.0, 0).is_err());
        assert!(PathGenerator::new(100.0, 0.05, 0.2, 0.0, 10).is_err());
        assert!(PathGenerator::new(-1.0, 0.05, 0.2, 1.0, 10).is_err());
    }
}
