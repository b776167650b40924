use ndarray::{Array1, Array2};
use nufft_algorithms::dft::half_spectrum_matrix;
use nufft_algorithms::Float;
use num_complex::Complex;

/// Computes the half-spectrum DFT of a real signal by dense matrix multiplication.
///
/// Returns the `N / 2 + 1` coefficients along with the `(N / 2 + 1) x N` matrix that produced
/// them.
pub fn dft<T: Float>(x: &[T]) -> (Array1<Complex<T>>, Array2<Complex<T>>) {
    let matrix = half_spectrum_matrix::<T>(x.len());
    let signal = x
        .iter()
        .map(|v| Complex::new(*v, T::zero()))
        .collect::<Array1<_>>();
    (matrix.dot(&signal), matrix)
}
