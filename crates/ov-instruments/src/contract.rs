//! Single-asset option contracts.

use crate::asset_class::AssetClass;
use crate::exercise::ExerciseType;
use crate::instrument::{PricingEngine, PricingResults};
use crate::market_data::MarketData;
use crate::payoff::{OptionType, Payoff, PlainVanillaPayoff};
use ov_core::{errors::Result, Real, Time, Volatility};

/// A vanilla option on one underlying.
///
/// The contract carries everything about the trade and the underlying's
/// volatility; rates live in [`MarketData`]. It is never mutated by a
/// valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    /// Call or put.
    pub option_type: OptionType,
    /// European or American exercise.
    pub exercise: ExerciseType,
    /// Current price of the underlying.
    pub spot: Real,
    /// Strike price.
    pub strike: Real,
    /// Time to maturity in years.
    pub maturity: Time,
    /// Annualised volatility of the underlying.
    pub volatility: Volatility,
    /// Kind of underlying.
    #[cfg_attr(feature = "serde", serde(default))]
    pub asset_class: AssetClass,
}

impl OptionContract {
    /// Create a contract on a non-dividend equity.
    pub fn new(
        option_type: OptionType,
        exercise: ExerciseType,
        spot: Real,
        strike: Real,
        maturity: Time,
        volatility: Volatility,
    ) -> Self {
        Self {
            option_type,
            exercise,
            spot,
            strike,
            maturity,
            volatility,
            asset_class: AssetClass::Equity,
        }
    }

    /// Convenience: a European option.
    pub fn european(
        option_type: OptionType,
        spot: Real,
        strike: Real,
        maturity: Time,
        volatility: Volatility,
    ) -> Self {
        Self::new(
            option_type,
            ExerciseType::European,
            spot,
            strike,
            maturity,
            volatility,
        )
    }

    /// Convenience: an American option.
    pub fn american(
        option_type: OptionType,
        spot: Real,
        strike: Real,
        maturity: Time,
        volatility: Volatility,
    ) -> Self {
        Self::new(
            option_type,
            ExerciseType::American,
            spot,
            strike,
            maturity,
            volatility,
        )
    }

    /// Replace the asset class.
    pub fn with_asset_class(mut self, asset_class: AssetClass) -> Self {
        self.asset_class = asset_class;
        self
    }

    /// Same contract with a different volatility.
    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = volatility;
        self
    }

    /// Same contract with the other exercise style.
    pub fn with_exercise(mut self, exercise: ExerciseType) -> Self {
        self.exercise = exercise;
        self
    }

    /// The contract's payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// Value of exercising immediately when the underlying trades at `price`.
    pub fn immediate_exercise_payoff(&self, price: Real) -> Real {
        self.payoff().value(price)
    }

    /// Whether the holder may exercise before maturity.
    pub fn allows_early_exercise(&self) -> bool {
        self.exercise.allows_early_exercise()
    }

    /// Price with the given engine.
    pub fn price(&self, engine: &dyn PricingEngine, market: &MarketData) -> Result<PricingResults> {
        engine.calculate(self, market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct IntrinsicEngine;

    impl PricingEngine for IntrinsicEngine {
        fn calculate(&self, c: &OptionContract, _m: &MarketData) -> Result<PricingResults> {
            Ok(PricingResults::from_npv(c.immediate_exercise_payoff(c.spot)))
        }
    }

    #[test]
    fn constructors_set_exercise() {
        let e = OptionContract::european(OptionType::Call, 100.0, 95.0, 1.0, 0.2);
        let a = OptionContract::american(OptionType::Put, 30.0, 45.0, 1.0, 0.3);
        assert!(!e.allows_early_exercise());
        assert!(a.allows_early_exercise());
        assert_eq!(e.asset_class, AssetClass::Equity);
    }

    #[test]
    fn price_delegates_to_engine() {
        let c = OptionContract::american(OptionType::Put, 30.0, 45.0, 1.0, 0.3)
            .with_asset_class(AssetClass::Index);
        let res = c.price(&IntrinsicEngine, &MarketData::new(0.05)).unwrap();
        assert_abs_diff_eq!(res.npv, 15.0);
    }

    proptest! {
        #[test]
        fn immediate_payoff_is_non_negative(
            spot in 0.01f64..500.0,
            strike in 0.01f64..500.0,
            call in any::<bool>(),
        ) {
            let ty = if call { OptionType::Call } else { OptionType::Put };
            let c = OptionContract::european(ty, spot, strike, 1.0, 0.2);
            let v = c.immediate_exercise_payoff(spot);
            prop_assert!(v >= 0.0);
            prop_assert!((v - (ty.sign() * (spot - strike)).max(0.0)).abs() < 1e-12);
        }
    }
}
