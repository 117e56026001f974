//! # ov-math
//!
//! Mathematical utilities: the normal distribution (via statrs), random
//! number generation, statistics accumulators, 1-D root finding,
//! polynomial least-squares regression (over nalgebra), and the discrete
//! Fourier transform (over rustfft).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Discrete Fourier transform.
pub mod fourier;

/// Linear least-squares regression.
pub mod linear_least_squares;

/// Random number generators.
pub mod random_numbers;

/// 1D root-finding solvers.
pub mod solvers1d;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use fourier::{dft, idft};
pub use linear_least_squares::{polyfit, polyval, LinearLeastSquaresRegression};
pub use random_numbers::{
    gaussian_grid, GaussianRng, InverseCumulativeNormalRng, MersenneTwisterUniformRng,
    ZigguratNormalRng,
};
pub use statistics::Statistics;
