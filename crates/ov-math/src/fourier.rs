//! Discrete Fourier transform over `num_complex::Complex<f64>`.
//!
//! Conventions follow the usual numerical-library definitions:
//!
//! ```text
//! dft:  X_k = Σ_n x_n · exp(−2πi·kn/N)
//! idft: x_n = (1/N) Σ_k X_k · exp(+2πi·kn/N)
//! ```
//!
//! Any length is accepted; `rustfft` picks the algorithm.

use num_complex::Complex;
use ov_core::Real;
use rustfft::FftPlanner;

/// Forward discrete Fourier transform (unnormalised).
pub fn dft(input: &[Complex<Real>]) -> Vec<Complex<Real>> {
    let mut buffer = input.to_vec();
    if buffer.is_empty() {
        return buffer;
    }
    let mut planner = FftPlanner::<Real>::new();
    planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer
}

/// Inverse discrete Fourier transform, normalised by `1/N`.
pub fn idft(input: &[Complex<Real>]) -> Vec<Complex<Real>> {
    let mut buffer = input.to_vec();
    if buffer.is_empty() {
        return buffer;
    }
    let n = buffer.len() as Real;
    let mut planner = FftPlanner::<Real>::new();
    planner.plan_fft_inverse(buffer.len()).process(&mut buffer);
    for z in buffer.iter_mut() {
        *z /= n;
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn real(v: &[Real]) -> Vec<Complex<Real>> {
        v.iter().map(|&x| Complex::new(x, 0.0)).collect()
    }

    #[test]
    fn dft_of_impulse_is_flat() {
        let x = real(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        for z in dft(&x) {
            assert_abs_diff_eq!(z.re, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(z.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn dft_known_values() {
        // [1, 2, 3] → [6, −1.5 + 0.866i, −1.5 − 0.866i]
        let x = dft(&real(&[1.0, 2.0, 3.0]));
        assert_abs_diff_eq!(x[0].re, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1].re, -1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1].im, 3.0_f64.sqrt() / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2].im, -(3.0_f64.sqrt()) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_undoes_forward() {
        let x = real(&[0.3, -1.0, 2.5, 4.0, 0.0, 7.25, -3.0]);
        let back = idft(&dft(&x));
        for (a, b) in x.iter().zip(back.iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(b.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn empty_input() {
        assert!(dft(&[]).is_empty());
        assert!(idft(&[]).is_empty());
    }
}
