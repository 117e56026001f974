//! Incremental statistics accumulator, used to turn Monte Carlo samples into
//! an estimate and its standard error.

use ov_core::Real;

/// Incremental statistics accumulator.
///
/// Accumulates samples and computes their mean, variance and the standard
/// error of the mean.
#[derive(Debug, Clone)]
pub struct Statistics {
    count: usize,
    sum: Real,
    sum_sq: Real,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Add a sample.
    pub fn add(&mut self, x: Real) {
        self.count += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    /// Number of samples.
    pub fn samples(&self) -> usize {
        self.count
    }

    /// Sample mean.  Returns `None` if no samples have been added.
    pub fn mean(&self) -> Option<Real> {
        (self.count > 0).then(|| self.sum / self.count as Real)
    }

    /// Sample variance (Bessel-corrected).  Returns `None` for fewer than
    /// 2 samples.
    pub fn variance(&self) -> Option<Real> {
        if self.count < 2 {
            return None;
        }
        let m = self.sum / self.count as Real;
        // Rounding can push a zero variance slightly negative
        let s2 = (self.sum_sq / self.count as Real - m * m).max(0.0);
        Some(s2 * self.count as Real / (self.count as Real - 1.0))
    }

    /// Standard deviation.  Returns `None` for fewer than 2 samples.
    pub fn std_dev(&self) -> Option<Real> {
        self.variance().map(|v| v.sqrt())
    }

    /// Standard error of the mean, `√(variance / n)`.
    pub fn error_estimate(&self) -> Option<Real> {
        self.variance().map(|v| (v / self.count as Real).sqrt())
    }
}

impl Extend<Real> for Statistics {
    fn extend<I: IntoIterator<Item = Real>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}
