//! Underlying asset classes.
//!
//! The asset class selects the risk-neutral drift (cost of carry `b`) of the
//! underlying, and through it the up-probability of a binomial step:
//!
//! | code | class | cost of carry `b` |
//! |---|---|---|
//! | 0 | equity | `r` |
//! | 1 | bond | `r` |
//! | 2 | dividend-paying equity | `r − q` |
//! | 3 | index | `r − q` |
//! | 4 | future | `0` |
//! | 5 | commodity | `0` |
//! | 6 | currency | `r − rf` |

use crate::market_data::MarketData;
use ov_core::{
    errors::{Error, Result},
    Rate,
};
use std::fmt;

/// The kind of asset underlying an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssetClass {
    /// Equity paying no dividend.
    #[default]
    Equity,
    /// Bond.
    Bond,
    /// Equity paying a continuous dividend yield.
    DividendEquity,
    /// Equity index with a continuous dividend yield.
    Index,
    /// Futures contract.
    Future,
    /// Commodity (valued like a future).
    Commodity,
    /// Foreign currency.
    Currency,
}

impl AssetClass {
    /// Map a numeric asset code (0–6) to its class.
    ///
    /// Any other code is rejected with [`Error::UnsupportedAssetClass`].
    pub fn from_code(code: i64) -> Result<Self> {
        Ok(match code {
            0 => AssetClass::Equity,
            1 => AssetClass::Bond,
            2 => AssetClass::DividendEquity,
            3 => AssetClass::Index,
            4 => AssetClass::Future,
            5 => AssetClass::Commodity,
            6 => AssetClass::Currency,
            other => return Err(Error::UnsupportedAssetClass(other)),
        })
    }

    /// The numeric asset code.
    pub fn code(self) -> i64 {
        match self {
            AssetClass::Equity => 0,
            AssetClass::Bond => 1,
            AssetClass::DividendEquity => 2,
            AssetClass::Index => 3,
            AssetClass::Future => 4,
            AssetClass::Commodity => 5,
            AssetClass::Currency => 6,
        }
    }

    /// Risk-neutral drift of the underlying under `market`.
    pub fn cost_of_carry(self, market: &MarketData) -> Rate {
        match self {
            AssetClass::Equity | AssetClass::Bond => market.risk_free_rate,
            AssetClass::DividendEquity | AssetClass::Index => {
                market.risk_free_rate - market.dividend_yield
            }
            AssetClass::Future | AssetClass::Commodity => 0.0,
            AssetClass::Currency => market.risk_free_rate - market.foreign_rate,
        }
    }
}

impl TryFrom<i64> for AssetClass {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Self::from_code(code)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetClass::Equity => "Equity",
            AssetClass::Bond => "Bond",
            AssetClass::DividendEquity => "Equity paying dividends",
            AssetClass::Index => "Index",
            AssetClass::Future => "Future",
            AssetClass::Commodity => "Commodity",
            AssetClass::Currency => "Currency",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn codes_roundtrip() {
        for code in 0..=6 {
            assert_eq!(AssetClass::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn unknown_codes_rejected() {
        for code in [-1, 7, 42] {
            assert_eq!(
                AssetClass::try_from(code),
                Err(Error::UnsupportedAssetClass(code))
            );
        }
    }

    #[test]
    fn carry_per_bucket() {
        let m = MarketData::new(0.05)
            .with_dividend_yield(0.02)
            .with_foreign_rate(0.03);
        assert_abs_diff_eq!(AssetClass::Bond.cost_of_carry(&m), 0.05);
        assert_abs_diff_eq!(AssetClass::Index.cost_of_carry(&m), 0.03);
        assert_abs_diff_eq!(AssetClass::Commodity.cost_of_carry(&m), 0.0);
        assert_abs_diff_eq!(AssetClass::Currency.cost_of_carry(&m), 0.02);
    }
}
