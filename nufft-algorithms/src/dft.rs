//! Dense DFT matrices.

use crate::float::Float;
use crate::twiddle::compute_twiddle;
use ndarray::Array2;
use num_complex::Complex;

/// Builds the `(size / 2 + 1) x size` half-spectrum DFT matrix of a real signal.
///
/// Entry `(k, j)` is `exp(-2 pi i k j / size)`.  The remaining rows of the full matrix are the
/// complex conjugates of these by Hermitian symmetry.
pub fn half_spectrum_matrix<T: Float>(size: usize) -> Array2<Complex<T>> {
    Array2::from_shape_fn((size / 2 + 1, size), |(k, j)| {
        compute_twiddle((k * j) % size, size, true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    #[test]
    fn shapes() {
        assert_eq!(half_spectrum_matrix::<f64>(4).dim(), (3, 4));
        assert_eq!(half_spectrum_matrix::<f64>(5).dim(), (3, 5));
        assert_eq!(half_spectrum_matrix::<f32>(1).dim(), (1, 1));
    }

    #[test]
    fn entries_are_roots_of_unity() {
        for &size in &[1, 2, 5, 8, 13] {
            let matrix = half_spectrum_matrix::<f64>(size);
            for ((k, j), v) in matrix.indexed_iter() {
                let expected =
                    Complex::from_polar(1.0, -2.0 * PI * (k * j) as f64 / size as f64);
                assert!(
                    float_cmp::approx_eq!(f64, v.re, expected.re, epsilon = 1e-12)
                        && float_cmp::approx_eq!(f64, v.im, expected.im, epsilon = 1e-12),
                    "D[{}, {}] = {} != {}",
                    k,
                    j,
                    v,
                    expected
                );
            }
        }
    }

    #[test]
    fn quarter_turns() {
        let matrix = half_spectrum_matrix::<f64>(4);
        assert!((matrix[(1, 1)] - Complex::new(0.0, -1.0)).norm() < 1e-15);
        assert!((matrix[(2, 1)] - Complex::new(-1.0, 0.0)).norm() < 1e-15);
        assert!((matrix[(1, 3)] - Complex::new(0.0, 1.0)).norm() < 1e-15);
    }
}
