use crate::float::Float;
use num_complex::Complex;

/// Computes `exp(∓2πi · index / size)`, with the negative sign for forward transforms.
#[inline]
pub fn compute_twiddle<T: Float>(index: usize, size: usize, forward: bool) -> Complex<T> {
    let theta = (index * 2) as f64 * core::f64::consts::PI / size as f64;
    let twiddle = Complex::new(
        T::from_f64_lossy(theta.cos()),
        T::from_f64_lossy(-theta.sin()),
    );
    if forward {
        twiddle
    } else {
        twiddle.conj()
    }
}

/// Computes `exp(-i · omega · shift)` for an arbitrary real frequency.
#[inline]
pub fn compute_phase<T: Float>(omega: f64, shift: f64) -> Complex<T> {
    let theta = omega * shift;
    Complex::new(
        T::from_f64_lossy(theta.cos()),
        T::from_f64_lossy(-theta.sin()),
    )
}
