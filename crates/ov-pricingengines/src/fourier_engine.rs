//! European valuation on the CRR lattice through the discrete Fourier
//! transform.
//!
//! With terminal payoffs `h_j` indexed by the number `j` of down moves and
//! the one-step kernel `q = [p, 1 − p, 0, …, 0]` of length `M + 1`,
//!
//! ```text
//! C₀ = DFT( e^{−rT} · IDFT(h) · DFT(q)^M )[0]
//! ```
//!
//! which equals the binomial expectation `e^{−rT} Σ_j C(M, j) p^{M−j} (1−p)^j h_j`.

use crate::binomial_engine::lattice_parameters;
use num_complex::Complex;
use ov_core::{
    ensure,
    errors::{Error, Result},
    Real,
};
use ov_instruments::{MarketData, OptionContract, Payoff, PricingEngine, PricingResults};
use ov_math::fourier::{dft, idft};

/// DFT-based engine for European contracts on an `M`-step lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourierEngine {
    steps: usize,
}

impl FourierEngine {
    /// Engine on a lattice of `steps` steps.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }

    /// Number of lattice steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Root value of `contract`.
    pub fn valuate(&self, contract: &OptionContract, market: &MarketData) -> Result<Real> {
        ensure!(
            !contract.allows_early_exercise(),
            "Fourier valuation handles European exercise only"
        );
        let params = lattice_parameters(contract, market, self.steps)?;
        let m = self.steps;
        let payoff = contract.payoff();

        let terminal: Vec<Complex<Real>> = (0..=m)
            .map(|j| {
                let s = contract.spot
                    * params.up.powi((m - j) as i32)
                    * params.down.powi(j as i32);
                Complex::new(payoff.value(s), 0.0)
            })
            .collect();
        let mut kernel = vec![Complex::new(0.0, 0.0); m + 1];
        kernel[0] = Complex::new(params.probability, 0.0);
        kernel[1] = Complex::new(1.0 - params.probability, 0.0);

        let discount = (-market.risk_free_rate * contract.maturity).exp();
        let exponent = i32::try_from(m).map_err(|_| Error::InvalidStepCount {
            steps: m,
            reason: "step count too large for the Fourier kernel".into(),
        })?;
        let spectrum: Vec<Complex<Real>> = idft(&terminal)
            .into_iter()
            .zip(dft(&kernel))
            .map(|(h, q)| h * q.powi(exponent) * discount)
            .collect();
        let value = dft(&spectrum)[0].re;

        tracing::debug!(steps = m, value, "fourier valuation");
        Ok(value)
    }
}

impl PricingEngine for FourierEngine {
    fn calculate(&self, contract: &OptionContract, market: &MarketData) -> Result<PricingResults> {
        let value = self.valuate(contract, market)?;
        Ok(PricingResults::from_npv(value).with_result("steps", self.steps as Real))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binomial_engine::{BinomialEngine, BinomialSettings, LatticeMethod};
    use approx::assert_abs_diff_eq;
    use ov_instruments::{AssetClass, OptionType};

    #[test]
    fn matches_binomial_engine() {
        let market = MarketData::new(0.05).with_dividend_yield(0.02);
        let engine = BinomialEngine::new(100)
            .with_settings(BinomialSettings::default().with_method(LatticeMethod::Recombining));
        for (ty, k) in [(OptionType::Call, 95.0), (OptionType::Put, 110.0)] {
            let c = OptionContract::european(ty, 100.0, k, 1.0, 0.25)
                .with_asset_class(AssetClass::Index);
            let fourier = FourierEngine::new(100).valuate(&c, &market).unwrap();
            let lattice = engine.valuate(&c, &market, 100).unwrap().price;
            assert_abs_diff_eq!(fourier, lattice, epsilon = 1e-9);
        }
    }

    #[test]
    fn one_step_by_hand() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let market = MarketData::new(0.0);
        let v = FourierEngine::new(1).valuate(&c, &market).unwrap();
        let u = 0.2_f64.exp();
        let p = (1.0 - 1.0 / u) / (u - 1.0 / u);
        assert_abs_diff_eq!(v, p * (100.0 * u - 100.0), epsilon = 1e-12);
    }

    #[test]
    fn american_rejected() {
        let c = OptionContract::american(OptionType::Put, 100.0, 100.0, 1.0, 0.2);
        assert!(matches!(
            FourierEngine::new(10).calculate(&c, &MarketData::new(0.05)),
            Err(Error::Precondition(_))
        ));
    }
}
