//! General linear least-squares regression.
//!
//! Solves `y = A β + ε` by singular value decomposition, where `A` is the
//! design matrix of basis functions evaluated at the observations. Singular values
//! below `max(n, m) · ε · s_max` are discarded, so rank-deficient designs
//! still produce the minimum-norm solution.
//!
//! This is the regression step of the Longstaff-Schwartz Monte Carlo
//! method, which approximates continuation values by a polynomial in the
//! underlying price ([`polyfit`] / [`polyval`]).

use nalgebra::{DMatrix, DVector};
use ov_core::{
    errors::{Error, Result},
    Real,
};
use tracing::warn;

/// Result of a general linear least-squares regression.
#[derive(Debug, Clone)]
pub struct LinearLeastSquaresRegression {
    coefficients: DVector<Real>,
}

impl LinearLeastSquaresRegression {
    /// Fit the model given a pre-built *n × m* design matrix.
    pub fn from_design_matrix(a: &DMatrix<Real>, y: &[Real]) -> Result<Self> {
        let (n, m) = a.shape();
        if y.len() != n {
            return Err(Error::InvalidArgument(format!(
                "y length {} must equal number of rows of A ({n})",
                y.len()
            )));
        }
        if m == 0 {
            return Err(Error::InvalidArgument("at least one basis function is required".into()));
        }

        let svd = a.clone().svd(true, true);
        let u = svd
            .u
            .as_ref()
            .ok_or_else(|| Error::Runtime("SVD did not produce U".into()))?;
        let v_t = svd
            .v_t
            .as_ref()
            .ok_or_else(|| Error::Runtime("SVD did not produce Vᵀ".into()))?;
        let sv = &svd.singular_values;

        let sv_max = sv.iter().copied().fold(0.0_f64, f64::max);
        let threshold = n.max(m) as Real * f64::EPSILON * sv_max;

        // β = V · diag(1/sᵢ) · Uᵀ · y, keeping only sᵢ > threshold
        let y_vec = DVector::from_column_slice(y);
        let ut_y = u.transpose() * &y_vec;
        let mut coefficients = DVector::<Real>::zeros(m);
        let mut rank = 0;
        for k in 0..sv.len() {
            let s = sv[k];
            if s > threshold {
                rank += 1;
                let ratio = ut_y[k] / s;
                for j in 0..m {
                    coefficients[j] += ratio * v_t[(k, j)];
                }
            }
        }
        if rank < m {
            warn!(rank, basis = m, "rank-deficient least-squares design");
        }

        Ok(Self { coefficients })
    }

    /// Fitted coefficients β.
    pub fn coefficients(&self) -> &[Real] {
        self.coefficients.as_slice()
    }
}

/// Least-squares polynomial of the given degree through `(x, y)`.
///
/// Returns the coefficients in increasing order of power,
/// `c₀ + c₁x + … + c_d x^d`.
pub fn polyfit(x: &[Real], y: &[Real], degree: usize) -> Result<Vec<Real>> {
    let n = x.len();
    let m = degree + 1;
    if n != y.len() {
        return Err(Error::InvalidArgument(format!(
            "x and y must have the same length ({n} vs {})",
            y.len()
        )));
    }
    if n < m {
        return Err(Error::InvalidArgument(format!(
            "degree {degree} polynomial needs at least {m} points, got {n}"
        )));
    }
    let a = DMatrix::from_fn(n, m, |i, j| x[i].powi(j as i32));
    let fit = LinearLeastSquaresRegression::from_design_matrix(&a, y)?;
    Ok(fit.coefficients().to_vec())
}

/// Evaluate a polynomial with coefficients in increasing order of power
/// (Horner's scheme).
pub fn polyval(coefficients: &[Real], x: Real) -> Real {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
