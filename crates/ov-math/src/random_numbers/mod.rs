//! Random number generators.
//!
//! Two Gaussian sources are provided behind the [`GaussianRng`] trait:
//!
//! * [`InverseCumulativeNormalRng`]: Mersenne Twister (`rand_mt`) uniforms
//!   mapped through the inverse normal CDF;
//! * [`ZigguratNormalRng`]: `rand`'s `StdRng` sampled with `rand_distr`'s
//!   ziggurat `StandardNormal`.
//!
//! [`gaussian_grid`] draws a time × path matrix of standard normals with
//! optional antithetic pairing and moment matching, the layout consumed by
//! the Monte Carlo path generators.

use nalgebra::DMatrix;
use ov_core::{
    errors::{Error, Result},
    Real,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_mt::Mt19937GenRand64;

/// A source of independent standard-normal deviates.
pub trait GaussianRng {
    /// Draw the next standard-normal deviate.
    fn next_gaussian(&mut self) -> Real;
}

/// A uniform pseudo-random number generator based on the Mersenne Twister
/// MT19937-64 algorithm.
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterUniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Generate the next uniform deviate in `[0, 1)`.
    pub fn next_real(&mut self) -> Real {
        let u: u64 = self.rng.next_u64();
        u as f64 / (u64::MAX as f64 + 1.0)
    }
}

/// Standard normals obtained by inverting the normal CDF on Mersenne
/// Twister uniforms.
pub struct InverseCumulativeNormalRng {
    inner: MersenneTwisterUniformRng,
}

impl InverseCumulativeNormalRng {
    /// Create a new generator backed by a Mersenne Twister with the given
    /// seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: MersenneTwisterUniformRng::new(seed),
        }
    }
}

impl GaussianRng for InverseCumulativeNormalRng {
    fn next_gaussian(&mut self) -> Real {
        // Avoid exact 0 which would produce −∞
        let u = loop {
            let u = self.inner.next_real();
            if u > 0.0 && u < 1.0 {
                break u;
            }
        };
        crate::distributions::normal_cdf_inverse(u)
    }
}

/// Standard normals from `StdRng` using the ziggurat method.
pub struct ZigguratNormalRng {
    rng: StdRng,
}

impl ZigguratNormalRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl GaussianRng for ZigguratNormalRng {
    fn next_gaussian(&mut self) -> Real {
        self.rng.sample(StandardNormal)
    }
}

/// Draw a `rows × cols` matrix of standard normals.
///
/// Rows are time steps and columns are paths.
///
/// * `antithetic`: only the first `cols / 2` columns are drawn; the
///   remaining columns are their negatives. `cols` must be even.
/// * `moment_matching`: the whole matrix is shifted and scaled to sample
///   mean 0 and (population) standard deviation 1.
pub fn gaussian_grid(
    rng: &mut dyn GaussianRng,
    rows: usize,
    cols: usize,
    antithetic: bool,
    moment_matching: bool,
) -> Result<DMatrix<Real>> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidArgument(format!(
            "gaussian grid needs at least one row and column, got {rows}×{cols}"
        )));
    }
    if antithetic && cols % 2 != 0 {
        return Err(Error::InvalidArgument(format!(
            "antithetic sampling needs an even number of paths, got {cols}"
        )));
    }

    let mut grid = DMatrix::<Real>::zeros(rows, cols);
    if antithetic {
        let half = cols / 2;
        for i in 0..rows {
            for j in 0..half {
                let z = rng.next_gaussian();
                grid[(i, j)] = z;
                grid[(i, j + half)] = -z;
            }
        }
    } else {
        for i in 0..rows {
            for j in 0..cols {
                grid[(i, j)] = rng.next_gaussian();
            }
        }
    }

    if moment_matching {
        let n = (rows * cols) as Real;
        let mean = grid.sum() / n;
        grid.add_scalar_mut(-mean);
        let std_dev = (grid.norm_squared() / n).sqrt();
        if std_dev > 0.0 {
            grid /= std_dev;
        }
    }

    Ok(grid)
}
