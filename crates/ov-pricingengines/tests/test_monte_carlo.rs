//! Integration tests for the Monte Carlo engine against the closed form and
//! the binomial lattice.

use approx::assert_abs_diff_eq;
use ov_instruments::{
    AssetClass, MarketData, OptionContract, OptionType, PricingEngine, StochasticVolatility,
};
use ov_pricingengines::{
    AnalyticEuropeanEngine, BinomialEngine, MonteCarloEngine, MonteCarloSettings, RandomSource,
};

fn settings() -> MonteCarloSettings {
    MonteCarloSettings::default()
        .with_paths(20_000)
        .with_time_steps(25)
}

#[test]
fn european_call_matches_black_scholes() {
    let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
    let m = MarketData::new(0.05);
    let mc = MonteCarloEngine::new(settings()).calculate(&c, &m).unwrap();
    let bs = AnalyticEuropeanEngine::new().calculate(&c, &m).unwrap();
    let se = mc.error_estimate.unwrap();
    assert!((mc.npv - bs.npv).abs() < 4.0 * se + 0.05, "mc {} vs bs {}", mc.npv, bs.npv);
}

#[test]
fn both_random_sources_agree_with_closed_form() {
    let c = OptionContract::european(OptionType::Put, 100.0, 110.0, 0.5, 0.3)
        .with_asset_class(AssetClass::Index);
    let m = MarketData::new(0.03).with_dividend_yield(0.01);
    let bs = AnalyticEuropeanEngine::new().calculate(&c, &m).unwrap().npv;
    for source in [RandomSource::MersenneTwister, RandomSource::Ziggurat] {
        let mc = MonteCarloEngine::new(settings().with_random_source(source))
            .calculate(&c, &m)
            .unwrap();
        assert_abs_diff_eq!(mc.npv, bs, epsilon = 4.0 * mc.error_estimate.unwrap() + 0.05);
    }
}

#[test]
fn longstaff_schwartz_american_put() {
    let c = OptionContract::american(OptionType::Put, 36.0, 40.0, 1.0, 0.2);
    let m = MarketData::new(0.06);
    // 4.478 from a 2000-step lattice
    let lattice = BinomialEngine::new(2000).calculate(&c, &m).unwrap().npv;
    let lsm = MonteCarloEngine::new(settings().with_time_steps(50))
        .calculate(&c, &m)
        .unwrap()
        .npv;
    assert_abs_diff_eq!(lsm, lattice, epsilon = 0.15);

    let european = OptionContract::european(OptionType::Put, 36.0, 40.0, 1.0, 0.2);
    let eu = AnalyticEuropeanEngine::new().calculate(&european, &m).unwrap().npv;
    assert!(lsm > eu, "early exercise premium missing: {lsm} <= {eu}");
}

#[test]
fn stochastic_volatility_at_its_long_run_level_stays_close() {
    // no vol-of-vol and θ = σ₀: the volatility never moves
    let sv = StochasticVolatility::new(2.0, 0.2, 0.0, -0.5);
    let m = MarketData::new(0.05).with_stochastic_volatility(sv);
    let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
    let engine = MonteCarloEngine::new(settings().with_stochastic_volatility(true));

    let paths = engine.simulate(&c, &m).unwrap();
    let vols = paths.volatilities.unwrap();
    assert!(vols.iter().all(|&v| (v - 0.2).abs() < 1e-12));

    let mc = engine.calculate(&c, &m).unwrap().npv;
    let bs = AnalyticEuropeanEngine::new().calculate(&c, &m).unwrap().npv;
    assert_abs_diff_eq!(mc, bs, epsilon = 0.25);
}

#[test]
fn stochastic_volatility_moves_the_price() {
    let sv = StochasticVolatility::new(1.5, 0.35, 0.4, -0.6);
    let m = MarketData::new(0.05).with_stochastic_volatility(sv);
    let c = OptionContract::european(OptionType::Call, 100.0, 100.0, 1.0, 0.2);
    let flat = MonteCarloEngine::new(settings()).calculate(&c, &m).unwrap().npv;
    let stoch = MonteCarloEngine::new(settings().with_stochastic_volatility(true))
        .calculate(&c, &m)
        .unwrap()
        .npv;
    // volatility reverts towards 35 %, so the option is worth more
    assert!(stoch > flat + 1.0, "stochastic {stoch} vs flat {flat}");
}
