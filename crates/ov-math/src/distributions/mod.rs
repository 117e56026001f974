//! Probability distributions.
//!
//! Only the standard normal distribution is needed by the pricing engines;
//! the error function comes from the `statrs` crate.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
