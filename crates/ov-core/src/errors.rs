//! Error types for optval.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! type is the single `thiserror`-derived [`Error`] enum below. The
//! `ensure!` macro returns early on a violated precondition.

use thiserror::Error;

/// The top-level error type used throughout optval.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The lattice step count is outside the supported range.
    #[error("invalid step count {steps}: {reason}")]
    InvalidStepCount {
        /// The rejected step count.
        steps: usize,
        /// Why it was rejected.
        reason: String,
    },

    /// An asset-class code outside the recognised risk-neutral buckets.
    #[error("unsupported asset class code {0} (expected 0..=6)")]
    UnsupportedAssetClass(i64),

    /// Market parameters that collapse the lattice (up factor equal to the
    /// down factor, typically zero volatility or zero maturity).
    #[error("degenerate market parameters: up factor {up} must exceed down factor {down} (volatility {volatility}, dt {dt})")]
    DegenerateMarketParameters {
        /// Up factor per step.
        up: f64,
        /// Down factor per step.
        down: f64,
        /// Volatility used.
        volatility: f64,
        /// Time step used.
        dt: f64,
    },

    /// A risk-neutral probability outside `[0, 1]`: the step is too coarse
    /// for the cost of carry, and negative node weights would follow.
    #[error("risk-neutral probability {probability} outside [0, 1] (up {up}, down {down}, dt {dt})")]
    InvalidProbability {
        /// The computed up-move probability.
        probability: f64,
        /// Up factor per step.
        up: f64,
        /// Down factor per step.
        down: f64,
        /// Time step used.
        dt: f64,
    },

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand `Result` type used throughout optval.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ov_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ov_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
