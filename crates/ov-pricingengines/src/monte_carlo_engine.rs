//! Monte Carlo engine.
//!
//! European contracts use the plain discounted-payoff estimator; American
//! contracts use Longstaff-Schwartz regression on the same paths. The
//! underlying drifts at the asset class's cost of carry and payoffs are
//! discounted at the risk-free rate.

use ov_core::{
    ensure,
    errors::{Error, Result},
    Real,
};
use ov_instruments::{MarketData, OptionContract, Payoff, PricingEngine, PricingResults};
use ov_math::random_numbers::{GaussianRng, InverseCumulativeNormalRng, ZigguratNormalRng};
use ov_methods::monte_carlo::{
    european_estimate, longstaff_schwartz, Estimate, PathGenerator, SimulatedPaths,
    SquareRootVolatility,
};

/// Source of the Gaussian draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RandomSource {
    /// Mersenne Twister uniforms through the inverse normal CDF.
    #[default]
    MersenneTwister,
    /// Ziggurat sampling on `rand`'s standard generator.
    Ziggurat,
}

/// Monte Carlo engine settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonteCarloSettings {
    /// Time steps per path.
    pub time_steps: usize,
    /// Number of simulated paths.
    pub paths: usize,
    /// RNG seed.
    pub seed: u64,
    /// Pair each draw with its negative (needs an even path count).
    pub antithetic: bool,
    /// Standardise the draws to mean 0 and standard deviation 1.
    pub moment_matching: bool,
    /// Degree of the Longstaff-Schwartz regression polynomial.
    pub basis_functions: usize,
    /// Simulate the volatility with the market's square-root diffusion.
    pub stochastic_volatility: bool,
    /// Gaussian generator.
    pub random_source: RandomSource,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            time_steps: 50,
            paths: 50_000,
            seed: 42,
            antithetic: true,
            moment_matching: true,
            basis_functions: 5,
            stochastic_volatility: false,
            random_source: RandomSource::MersenneTwister,
        }
    }
}

impl MonteCarloSettings {
    /// Set the time grid.
    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Set the number of paths.
    pub fn with_paths(mut self, paths: usize) -> Self {
        self.paths = paths;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Toggle antithetic variates and moment matching.
    pub fn with_variance_reduction(mut self, antithetic: bool, moment_matching: bool) -> Self {
        self.antithetic = antithetic;
        self.moment_matching = moment_matching;
        self
    }

    /// Set the regression degree.
    pub fn with_basis_functions(mut self, basis_functions: usize) -> Self {
        self.basis_functions = basis_functions;
        self
    }

    /// Toggle stochastic volatility.
    pub fn with_stochastic_volatility(mut self, enabled: bool) -> Self {
        self.stochastic_volatility = enabled;
        self
    }

    /// Choose the Gaussian generator.
    pub fn with_random_source(mut self, random_source: RandomSource) -> Self {
        self.random_source = random_source;
        self
    }
}

/// Monte Carlo pricing engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloEngine {
    settings: MonteCarloSettings,
}

impl MonteCarloEngine {
    /// Engine with the given settings.
    pub fn new(settings: MonteCarloSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &MonteCarloSettings {
        &self.settings
    }

    /// Simulate the underlying (and its volatility, when stochastic).
    pub fn simulate(&self, contract: &OptionContract, market: &MarketData) -> Result<SimulatedPaths> {
        let s = &self.settings;
        ensure!(s.paths > 0, "at least one path is required");

        let mut generator = PathGenerator::new(
            contract.spot,
            contract.asset_class.cost_of_carry(market),
            contract.volatility,
            contract.maturity,
            s.time_steps,
        )?
        .with_variance_reduction(s.antithetic, s.moment_matching);

        if s.stochastic_volatility {
            let params = market.stochastic_volatility.ok_or_else(|| {
                Error::Precondition(
                    "stochastic volatility requested but the market has no kappa/theta/vol-of-vol/rho"
                        .into(),
                )
            })?;
            generator = generator.with_stochastic_volatility(SquareRootVolatility {
                kappa: params.kappa,
                theta: params.theta,
                vol_of_vol: params.vol_of_vol,
                correlation: params.cholesky()?,
            });
        }

        let mut rng: Box<dyn GaussianRng> = match s.random_source {
            RandomSource::MersenneTwister => Box::new(InverseCumulativeNormalRng::new(s.seed)),
            RandomSource::Ziggurat => Box::new(ZigguratNormalRng::new(s.seed)),
        };
        generator.generate(rng.as_mut(), s.paths)
    }

    /// Value `contract` and return the estimate with its standard error.
    pub fn estimate(&self, contract: &OptionContract, market: &MarketData) -> Result<Estimate> {
        let paths = self.simulate(contract, market)?;
        let payoff = contract.payoff();
        let h = |s: Real| payoff.value(s);
        let r = market.risk_free_rate;

        let estimate = if contract.allows_early_exercise() {
            longstaff_schwartz(
                &paths.prices,
                &h,
                (-r * paths.dt).exp(),
                self.settings.basis_functions,
                contract.strike,
            )?
        } else {
            european_estimate(&paths.prices, &h, (-r * contract.maturity).exp())?
        };

        tracing::debug!(
            option_type = %contract.option_type,
            exercise = %contract.exercise,
            paths = paths.paths(),
            time_steps = paths.time_steps(),
            value = estimate.value,
            error_estimate = estimate.error_estimate,
            "monte carlo valuation"
        );
        Ok(estimate)
    }
}

impl PricingEngine for MonteCarloEngine {
    fn calculate(&self, contract: &OptionContract, market: &MarketData) -> Result<PricingResults> {
        let e = self.estimate(contract, market)?;
        Ok(PricingResults::from_npv(e.value)
            .with_error_estimate(e.error_estimate)
            .with_result("paths", self.settings.paths as Real)
            .with_result("time_steps", self.settings.time_steps as Real))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_instruments::OptionType;

    fn small() -> MonteCarloSettings {
        MonteCarloSettings::default()
            .with_paths(2_000)
            .with_time_steps(10)
    }

    #[test]
    fn deterministic_for_a_seed() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let m = MarketData::new(0.05);
        let a = MonteCarloEngine::new(small()).calculate(&c, &m).unwrap();
        let b = MonteCarloEngine::new(small()).calculate(&c, &m).unwrap();
        assert_eq!(a.npv, b.npv);
        let other = MonteCarloEngine::new(small().with_seed(7))
            .calculate(&c, &m)
            .unwrap();
        assert_ne!(a.npv, other.npv);
    }

    #[test]
    fn stochastic_volatility_needs_parameters() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let engine = MonteCarloEngine::new(small().with_stochastic_volatility(true));
        assert!(matches!(
            engine.calculate(&c, &MarketData::new(0.05)),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn odd_paths_with_antithetic_fail() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let engine = MonteCarloEngine::new(small().with_paths(1_001));
        assert!(engine.calculate(&c, &MarketData::new(0.05)).is_err());
    }

    #[test]
    fn reports_error_estimate() {
        let c = OptionContract::european(OptionType::Put, 100.0, 100.0, 1.0, 0.2);
        let res = MonteCarloEngine::new(small())
            .calculate(&c, &MarketData::new(0.05))
            .unwrap();
        assert!(res.error_estimate.unwrap() > 0.0);
        assert_eq!(res.result("paths"), Some(2_000.0));
    }
}
