//! Pricing results and the engine trait.
//!
//! A pricing engine values an [`OptionContract`] under some [`MarketData`].
//! Concrete engines (binomial, analytic, Monte Carlo, Fourier) live in
//! `ov-pricingengines`.

use crate::contract::OptionContract;
use crate::market_data::MarketData;
use ov_core::{errors::Result, Real};
use std::collections::HashMap;

/// Results of pricing an option.
///
/// Contains the NPV and optionally additional named results
/// (e.g. "delta", "gamma", "steps").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Error estimate (e.g. from MC simulation).
    pub error_estimate: Option<Real>,
    /// Additional named results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            error_estimate: None,
            additional_results: HashMap::new(),
        }
    }

    /// Attach an error estimate.
    pub fn with_error_estimate(mut self, error: Real) -> Self {
        self.error_estimate = Some(error);
        self
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// Common interface of all pricing engines.
pub trait PricingEngine: std::fmt::Debug + Send + Sync {
    /// Price `contract` under `market`.
    fn calculate(&self, contract: &OptionContract, market: &MarketData) -> Result<PricingResults>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pricing_results_builder() {
        let r = PricingResults::from_npv(42.0)
            .with_result("delta", 0.55)
            .with_result("gamma", 0.02)
            .with_error_estimate(0.1);
        assert_abs_diff_eq!(r.npv, 42.0);
        assert_abs_diff_eq!(r.result("delta").unwrap(), 0.55);
        assert_abs_diff_eq!(r.result("gamma").unwrap(), 0.02);
        assert_eq!(r.error_estimate, Some(0.1));
        assert!(r.result("vega").is_none());
    }
}
