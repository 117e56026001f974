//! Binomial lattice engine (Cox-Ross-Rubinstein).
//!
//! A valuation runs in three phases:
//!
//! 1. [`build_lattice`] lays out a perfect binary tree of `n` steps and
//!    prices each child from its parent as it is attached;
//! 2. [`propagate`] (re)prices every node from the root, `S·u` for up moves
//!    and `S·d` for down moves;
//! 3. [`induct_payoffs`] rolls the payoff back from the leaves, comparing
//!    against immediate exercise for American contracts.
//!
//! Every level is discounted with the same `Δt = T/n`. Large step counts go
//! through the recombining tree instead, which gives the same price.

use ov_core::{errors::Result, Real};
use ov_instruments::{
    MarketData, OptionContract, Payoff, PricingEngine, PricingResults,
};
use ov_methods::lattice::{
    crr_factors, BinaryLattice, CrrParameters, RecombiningTree, MAX_TREE_STEPS,
};

/// Which lattice carries the valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LatticeMethod {
    /// Non-recombining tree up to [`MAX_TREE_STEPS`], recombining beyond.
    #[default]
    Auto,
    /// Always the non-recombining tree.
    NonRecombining,
    /// Always the recombining tree.
    Recombining,
}

/// Binomial engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BinomialSettings {
    /// Return the full non-recombining tree with the price. Ignored (and
    /// logged) when the valuation runs on the recombining tree.
    pub keep_lattice: bool,
    /// Lattice selection.
    pub method: LatticeMethod,
}

impl BinomialSettings {
    /// Keep (or drop) the lattice in the result.
    pub fn with_keep_lattice(mut self, keep_lattice: bool) -> Self {
        self.keep_lattice = keep_lattice;
        self
    }

    /// Choose the lattice.
    pub fn with_method(mut self, method: LatticeMethod) -> Self {
        self.method = method;
        self
    }
}

/// Outcome of a binomial valuation.
#[derive(Debug, Clone)]
pub struct ValuationResult {
    /// Option value at the root.
    pub price: Real,
    /// Number of time steps.
    pub steps: usize,
    /// Lattice parameters used.
    pub parameters: CrrParameters,
    /// The induced tree, when requested and built.
    pub lattice: Option<BinaryLattice>,
}

/// Binomial lattice pricing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialEngine {
    steps: usize,
    settings: BinomialSettings,
}

impl BinomialEngine {
    /// Engine with `steps` time steps and default settings.
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            settings: BinomialSettings::default(),
        }
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: BinomialSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Step count used by [`PricingEngine::calculate`].
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Settings in use.
    pub fn settings(&self) -> &BinomialSettings {
        &self.settings
    }

    /// Value `contract` on a lattice of `step_count` steps.
    ///
    /// Inputs are validated before any node is allocated: a zero step count
    /// fails with `InvalidStepCount`, zero volatility or maturity with
    /// `DegenerateMarketParameters`, and a step too coarse for the cost of
    /// carry with `InvalidProbability`.
    pub fn valuate(
        &self,
        contract: &OptionContract,
        market: &MarketData,
        step_count: usize,
    ) -> Result<ValuationResult> {
        let parameters = lattice_parameters(contract, market, step_count)?;
        let use_tree = match self.settings.method {
            LatticeMethod::Auto => step_count <= MAX_TREE_STEPS,
            LatticeMethod::NonRecombining => true,
            LatticeMethod::Recombining => false,
        };

        let payoff = contract.payoff();
        let (price, lattice) = if use_tree {
            let mut lattice = build_lattice(step_count, contract)?;
            let price = lattice.induct(
                &|s: Real| payoff.value(s),
                parameters.probability,
                parameters.discount,
                contract.allows_early_exercise(),
            );
            (price, self.settings.keep_lattice.then_some(lattice))
        } else {
            if self.settings.keep_lattice {
                tracing::warn!(
                    steps = step_count,
                    "recombining valuation has no non-recombining lattice to keep"
                );
            }
            let tree = RecombiningTree::new(
                contract.spot,
                parameters.up,
                parameters.down,
                step_count,
            );
            let price = tree.rollback(
                &|s: Real| payoff.value(s),
                parameters.probability,
                parameters.discount,
                contract.allows_early_exercise(),
            );
            (price, None)
        };

        tracing::debug!(
            option_type = %contract.option_type,
            exercise = %contract.exercise,
            asset_class = %contract.asset_class,
            steps = step_count,
            recombining = !use_tree,
            price,
            "binomial valuation"
        );

        Ok(ValuationResult {
            price,
            steps: step_count,
            parameters,
            lattice,
        })
    }
}

impl PricingEngine for BinomialEngine {
    fn calculate(&self, contract: &OptionContract, market: &MarketData) -> Result<PricingResults> {
        let result = self.valuate(contract, market, self.steps)?;
        let p = result.parameters;
        Ok(PricingResults::from_npv(result.price)
            .with_result("steps", result.steps as Real)
            .with_result("up", p.up)
            .with_result("down", p.down)
            .with_result("probability", p.probability))
    }
}

/// CRR parameters for `contract` under `market`, with the asset class
/// selecting the drift of the risk-neutral probability.
pub fn lattice_parameters(
    contract: &OptionContract,
    market: &MarketData,
    step_count: usize,
) -> Result<CrrParameters> {
    CrrParameters::new(
        contract.volatility,
        contract.maturity,
        step_count,
        market.risk_free_rate,
        contract.asset_class.cost_of_carry(market),
    )
}

/// Lay out a tree of `steps_remaining` steps with prices attached.
///
/// Zero steps gives a single leaf at the spot price; more than
/// [`MAX_TREE_STEPS`] fails with `InvalidStepCount`.
pub fn build_lattice(steps_remaining: usize, contract: &OptionContract) -> Result<BinaryLattice> {
    let (up, down) = step_factors(steps_remaining, contract)?;
    BinaryLattice::build(steps_remaining, contract.spot, up, down)
}

/// Reprice every node of `lattice` from the contract's spot.
pub fn propagate(lattice: &mut BinaryLattice, contract: &OptionContract) -> Result<()> {
    let (up, down) = step_factors(lattice.steps(), contract)?;
    lattice.propagate(contract.spot, up, down);
    Ok(())
}

/// Backward induction over `lattice`, caching the value and exercise flag
/// on every node; returns the root value.
///
/// `step_count` fixes `Δt = T / step_count` for the discounting and the
/// risk-neutral probability. A single-leaf lattice takes its intrinsic
/// value and ignores `step_count`.
pub fn induct_payoffs(
    lattice: &mut BinaryLattice,
    contract: &OptionContract,
    market: &MarketData,
    step_count: usize,
) -> Result<Real> {
    let payoff = contract.payoff();
    if lattice.steps() == 0 {
        // nothing to discount or weight
        return Ok(lattice.induct(&|s: Real| payoff.value(s), 1.0, 1.0, false));
    }
    let parameters = lattice_parameters(contract, market, step_count)?;
    Ok(lattice.induct(
        &|s: Real| payoff.value(s),
        parameters.probability,
        parameters.discount,
        contract.allows_early_exercise(),
    ))
}

fn step_factors(steps: usize, contract: &OptionContract) -> Result<(Real, Real)> {
    if steps == 0 {
        // a lone leaf never moves
        return Ok((1.0, 1.0));
    }
    let (_, up, down) = crr_factors(contract.volatility, contract.maturity, steps)?;
    Ok((up, down))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ov_core::Error;
    use ov_instruments::{AssetClass, OptionType};

    fn market() -> MarketData {
        MarketData::new(0.05)
    }

    #[test]
    fn lattice_is_kept_on_request() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let engine = BinomialEngine::new(4)
            .with_settings(BinomialSettings::default().with_keep_lattice(true));
        let r = engine.valuate(&c, &market(), 4).unwrap();
        let lattice = r.lattice.unwrap();
        assert_eq!(lattice.node_count(), 31);
        assert_eq!(lattice.root_payoff(), Some(r.price));
    }

    #[test]
    fn lattice_dropped_by_default() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let r = BinomialEngine::new(4).valuate(&c, &market(), 4).unwrap();
        assert!(r.lattice.is_none());
        assert_eq!(r.steps, 4);
    }

    #[test]
    fn large_step_counts_use_recombining_tree() {
        let c = OptionContract::american(OptionType::Put, 100.0, 100.0, 1.0, 0.2);
        let engine = BinomialEngine::new(500)
            .with_settings(BinomialSettings::default().with_keep_lattice(true));
        let r = engine.valuate(&c, &market(), 500).unwrap();
        assert!(r.lattice.is_none());
        assert!(r.price > 6.0 && r.price < 6.2, "price = {}", r.price);
    }

    #[test]
    fn forced_tree_rejects_large_counts() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        let engine = BinomialEngine::new(25).with_settings(
            BinomialSettings::default().with_method(LatticeMethod::NonRecombining),
        );
        assert!(matches!(
            engine.calculate(&c, &market()),
            Err(Error::InvalidStepCount { steps: 25, .. })
        ));
        assert!(matches!(
            build_lattice(MAX_TREE_STEPS + 1, &c),
            Err(Error::InvalidStepCount { steps, .. }) if steps == MAX_TREE_STEPS + 1
        ));
    }

    #[test]
    fn zero_steps_rejected() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
        assert!(matches!(
            BinomialEngine::new(0).calculate(&c, &market()),
            Err(Error::InvalidStepCount { steps: 0, .. })
        ));
    }

    #[test]
    fn futures_use_zero_carry() {
        let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2)
            .with_asset_class(AssetClass::Future);
        let p = lattice_parameters(&c, &market(), 10).unwrap();
        assert_abs_diff_eq!(
            p.probability,
            (1.0 - p.down) / (p.up - p.down),
            epsilon = 1e-15
        );
    }

    #[test]
    fn results_carry_lattice_parameters() {
        let c = OptionContract::european(OptionType::Put, 100.0, 95.0, 0.5, 0.25);
        let res = c.price(&BinomialEngine::new(8), &market()).unwrap();
        assert_eq!(res.result("steps"), Some(8.0));
        let up = res.result("up").unwrap();
        let down = res.result("down").unwrap();
        assert_abs_diff_eq!(up * down, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_leaf_lattice() {
        let c = OptionContract::european(OptionType::Call, 100.0, 90.0, 1.0, 0.2);
        let mut t = build_lattice(0, &c).unwrap();
        propagate(&mut t, &c).unwrap();
        assert_eq!(t.node_count(), 1);
        assert_abs_diff_eq!(t.root().underlying_price, 100.0);

        let v = induct_payoffs(&mut t, &c, &market(), 0).unwrap();
        assert_abs_diff_eq!(v, 10.0);
        assert!(t.root().exercised);
    }

    #[test]
    fn coarse_step_with_large_carry_rejected() {
        // p > 1 would weight the down child negatively
        let c = OptionContract::european(OptionType::Put, 100.0, 100.0, 1.0, 0.01);
        let mut t = build_lattice(1, &c).unwrap();
        let r = induct_payoffs(&mut t, &c, &MarketData::new(0.5), 1);
        assert!(matches!(r, Err(Error::InvalidProbability { .. })));
        assert_eq!(t.root_payoff(), None);
        assert!(matches!(
            BinomialEngine::new(1).calculate(&c, &MarketData::new(0.5)),
            Err(Error::InvalidProbability { .. })
        ));
    }
}
