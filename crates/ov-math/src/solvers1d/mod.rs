//! 1D root-finding solvers.

use ov_core::{
    errors::{Error, Result},
    Real,
};

const DEFAULT_ACCURACY: Real = 1.0e-11;

/// Bisection on a bracket `[x_min, x_max]` whose endpoints give opposite
/// signs of `f`.
///
/// Stops when `|f(mid)|` falls below `accuracy` (a non-positive accuracy
/// selects 1e-11) or the bracket shrinks to machine precision, and fails
/// after `max_iterations` halvings.
pub fn bisection<F>(
    f: F,
    x_min: Real,
    x_max: Real,
    accuracy: Real,
    max_iterations: usize,
) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    if x_min >= x_max {
        return Err(Error::InvalidArgument(format!(
            "bisection: empty bracket [{x_min}, {x_max}]"
        )));
    }
    let mut a = x_min;
    let mut b = x_max;
    let fa = f(a);
    let fb = f(b);

    if fa * fb > 0.0 {
        return Err(Error::Precondition(format!(
            "bisection: f({a}) = {fa} and f({b}) = {fb} must have opposite signs"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut fa = fa;
    for _ in 0..max_iterations {
        let mid = 0.5 * (a + b);
        let fm = f(mid);
        if fm.abs() < acc || (b - a) * 0.5 <= Real::EPSILON * mid.abs().max(1.0) {
            return Ok(mid);
        }
        if fm * fa > 0.0 {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    Err(Error::Runtime(format!(
        "bisection: no convergence after {max_iterations} iterations"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_square_root() {
        let root = bisection(|x| x * x - 2.0, 0.0, 2.0, 1e-12, 200).unwrap();
        assert_abs_diff_eq!(root, 2.0_f64.sqrt(), epsilon = 1e-11);
    }

    #[test]
    fn decreasing_function() {
        let root = bisection(|x| 1.0 - x, -3.0, 5.0, 1e-12, 200).unwrap();
        assert_abs_diff_eq!(root, 1.0, epsilon = 1e-11);
    }

    #[test]
    fn rejects_unbracketed_root() {
        let r = bisection(|x| x * x + 1.0, -1.0, 1.0, 1e-10, 100);
        assert!(matches!(r, Err(Error::Precondition(_))));
    }

    #[test]
    fn reports_exhausted_iterations() {
        let r = bisection(|x| x - 0.123_456_789, 0.0, 1.0, 1e-15, 3);
        assert!(matches!(r, Err(Error::Runtime(_))));
    }
}
