//! Planned one-dimensional non-uniform FFTs.
//!
//! The forward transform evaluates
//!
//! ```text
//! y[m] = sum_n x[n] * exp(-i * omega[m] * n)
//! ```
//!
//! for frequencies `omega` in `[-pi, pi)` by gridding: the signal is deapodized and zero-padded
//! onto an oversampled grid of `K` points, transformed with an FFT, and interpolated onto each
//! frequency with a Kaiser–Bessel kernel touching `J` grid points.  Internally the signal is
//! centered about `N / 2`, which keeps the deapodization well away from the kernel's aliases,
//! and the shift is undone with a per-frequency phase.
//!
//! The adjoint is the exact conjugate transpose of the forward transform, scaled by `1 / K` to
//! match the normalization of an inverse FFT.

use crate::fft::{create_fft, Fft, FftEngine, Transform};
use crate::float::Float;
use crate::kernel::KaiserBessel;
use crate::twiddle::compute_phase;
use crate::Error;
use core::f64::consts::PI;
use num_complex::Complex;

/// A non-uniform FFT, planned for a fixed set of frequencies.
pub struct Plan<T: Float> {
    signal_shape: [usize; 1],
    grid_shape: [usize; 1],
    kernel_width: usize,
    kernel: KaiserBessel,
    frequencies: Box<[T]>,
    deapodization: Box<[T]>,
    indices: Box<[usize]>,
    weights: Box<[T]>,
    phases: Box<[Complex<T>]>,
    fft: Box<dyn Fft<Real = T>>,
}

impl<T: Float> core::fmt::Debug for Plan<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error> {
        f.debug_struct("Plan")
            .field("signal_shape", &self.signal_shape)
            .field("grid_shape", &self.grid_shape)
            .field("kernel_width", &self.kernel_width)
            .field("frequencies", &self.frequencies.len())
            .field("fft", &self.fft)
            .finish()
    }
}

fn one_dimensional(arg: &'static str, shape: &[usize]) -> Result<usize, Error> {
    match shape {
        [n] => Ok(*n),
        [] => Err(Error::InvalidArgument {
            arg,
            reason: "shape must not be empty".into(),
        }),
        _ => Err(Error::UnsupportedRank { rank: shape.len() }),
    }
}

impl<T: Float> Plan<T> {
    /// Plans a transform from `signal_shape` samples onto `frequencies`, using an oversampled
    /// grid of `grid_shape` and a kernel spanning `kernel_width` grid samples.
    ///
    /// Only one-dimensional shapes are supported.
    pub fn new(
        frequencies: &[T],
        signal_shape: &[usize],
        grid_shape: &[usize],
        kernel_width: &[usize],
    ) -> Result<Self, Error> {
        Self::with_engine(
            frequencies,
            signal_shape,
            grid_shape,
            kernel_width,
            FftEngine::default(),
        )
    }

    /// Like [`Plan::new`], with an explicit FFT engine for the oversampled grid.
    pub fn with_engine(
        frequencies: &[T],
        signal_shape: &[usize],
        grid_shape: &[usize],
        kernel_width: &[usize],
        engine: FftEngine,
    ) -> Result<Self, Error> {
        let n = one_dimensional("signal_shape", signal_shape)?;
        let k = one_dimensional("grid_shape", grid_shape)?;
        let j = one_dimensional("kernel_width", kernel_width)?;
        if n == 0 {
            return Err(Error::InvalidArgument {
                arg: "signal_shape",
                reason: "signal length must be positive".into(),
            });
        }
        if k < n {
            return Err(Error::InvalidArgument {
                arg: "grid_shape",
                reason: format!("grid length {k} is smaller than signal length {n}"),
            });
        }
        if j == 0 || j > k {
            return Err(Error::InvalidArgument {
                arg: "kernel_width",
                reason: format!("kernel width {j} must be in 1..={k}"),
            });
        }
        for (index, omega) in frequencies.iter().enumerate() {
            let value = omega.to_f64().unwrap_or(f64::NAN);
            if !(value.is_finite() && (-PI..PI).contains(&value)) {
                return Err(Error::FrequencyOutOfRange { index, value });
            }
        }

        let kernel = KaiserBessel::new(j, k as f64 / n as f64);
        let center = n / 2;

        let deapodization = (0..n)
            .map(|i| {
                let offset = i as f64 - center as f64;
                T::from_f64_lossy(kernel.fourier(offset / k as f64).recip())
            })
            .collect::<Box<[_]>>();

        let half = j as f64 / 2.0;
        let mut indices = Vec::with_capacity(frequencies.len() * j);
        let mut weights = Vec::with_capacity(frequencies.len() * j);
        let mut phases = Vec::with_capacity(frequencies.len());
        for omega in frequencies.iter() {
            let omega = omega.to_f64().unwrap_or_default();
            let position = omega * k as f64 / (2.0 * PI);
            let first = (position - half).ceil();
            for offset in 0..j {
                let point = first + offset as f64;
                indices.push((point as i64).rem_euclid(k as i64) as usize);
                weights.push(T::from_f64_lossy(kernel.evaluate(position - point)));
            }
            phases.push(compute_phase(omega, center as f64));
        }

        Ok(Self {
            signal_shape: [n],
            grid_shape: [k],
            kernel_width: j,
            kernel,
            frequencies: frequencies.into(),
            deapodization,
            indices: indices.into_boxed_slice(),
            weights: weights.into_boxed_slice(),
            phases: phases.into_boxed_slice(),
            fft: create_fft(k, engine),
        })
    }

    /// The signal shape, `Nd`.
    pub fn signal_shape(&self) -> &[usize] {
        &self.signal_shape
    }

    /// The oversampled grid shape, `Kd`.
    pub fn grid_shape(&self) -> &[usize] {
        &self.grid_shape
    }

    /// The kernel width, `Jd`.
    pub fn kernel_width(&self) -> usize {
        self.kernel_width
    }

    /// The interpolation kernel.
    pub fn kernel(&self) -> &KaiserBessel {
        &self.kernel
    }

    /// The planned frequencies.
    pub fn frequencies(&self) -> &[T] {
        &self.frequencies
    }

    /// Bytes owned on the heap by the plan's tables and FFT.
    pub fn heap_bytes(&self) -> usize {
        use core::mem::{size_of, size_of_val};
        (self.frequencies.len() + self.deapodization.len() + self.weights.len()) * size_of::<T>()
            + self.indices.len() * size_of::<usize>()
            + self.phases.len() * size_of::<Complex<T>>()
            + size_of_val(&*self.fft)
            + self.fft.heap_bytes()
    }

    fn grid_index(&self, sample: usize) -> usize {
        let k = self.grid_shape[0];
        (sample + k - self.signal_shape[0] / 2) % k
    }

    /// Evaluates the transform at the planned frequencies.
    pub fn forward(&self, x: &[Complex<T>]) -> Result<Vec<Complex<T>>, Error> {
        if x.len() != self.signal_shape[0] {
            return Err(Error::LengthMismatch {
                expected: self.signal_shape[0],
                actual: x.len(),
            });
        }

        let mut grid = vec![Complex::default(); self.grid_shape[0]];
        for (sample, (value, scale)) in x.iter().zip(self.deapodization.iter()).enumerate() {
            grid[self.grid_index(sample)] = value.scale(*scale);
        }
        self.fft.transform_in_place(&mut grid, Transform::Fft);

        let j = self.kernel_width;
        Ok(self
            .phases
            .iter()
            .enumerate()
            .map(|(m, phase)| {
                let taps = m * j..(m + 1) * j;
                let sum = self.indices[taps.clone()]
                    .iter()
                    .zip(self.weights[taps].iter())
                    .fold(Complex::default(), |acc: Complex<T>, (index, weight)| {
                        acc + grid[*index].scale(*weight)
                    });
                sum * phase
            })
            .collect())
    }

    /// Applies the conjugate transpose of [`Plan::forward`], scaled by `1 / K`.
    pub fn adjoint(&self, y: &[Complex<T>]) -> Result<Vec<Complex<T>>, Error> {
        if y.len() != self.phases.len() {
            return Err(Error::LengthMismatch {
                expected: self.phases.len(),
                actual: y.len(),
            });
        }

        let j = self.kernel_width;
        let mut grid = vec![Complex::default(); self.grid_shape[0]];
        for (m, (value, phase)) in y.iter().zip(self.phases.iter()).enumerate() {
            let value = value * phase.conj();
            let taps = m * j..(m + 1) * j;
            for (index, weight) in self.indices[taps.clone()]
                .iter()
                .zip(self.weights[taps].iter())
            {
                grid[*index] += value.scale(*weight);
            }
        }
        self.fft.transform_in_place(&mut grid, Transform::Ifft);

        Ok(self
            .deapodization
            .iter()
            .enumerate()
            .map(|(sample, scale)| grid[self.grid_index(sample)].scale(*scale))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evenly_spaced(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| -PI + 2.0 * PI * i as f64 / count as f64)
            .collect()
    }

    #[test]
    fn rejects_bad_shapes() {
        let f = evenly_spaced(4);
        assert_eq!(
            Plan::new(&f, &[4, 4], &[8, 8], &[6]).unwrap_err(),
            Error::UnsupportedRank { rank: 2 }
        );
        assert!(matches!(
            Plan::new(&f, &[8], &[4], &[2]),
            Err(Error::InvalidArgument {
                arg: "grid_shape",
                ..
            })
        ));
        assert!(matches!(
            Plan::new(&f, &[0], &[4], &[2]),
            Err(Error::InvalidArgument {
                arg: "signal_shape",
                ..
            })
        ));
        assert!(matches!(
            Plan::new(&f, &[4], &[8], &[9]),
            Err(Error::InvalidArgument {
                arg: "kernel_width",
                ..
            })
        ));
    }

    #[test]
    fn rejects_frequencies_outside_range() {
        let f = [0.0, PI];
        assert_eq!(
            Plan::new(&f, &[4], &[8], &[6]).unwrap_err(),
            Error::FrequencyOutOfRange {
                index: 1,
                value: PI
            }
        );
        let f = [f64::NAN];
        assert!(matches!(
            Plan::new(&f, &[4], &[8], &[6]),
            Err(Error::FrequencyOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn length_mismatch() {
        let plan = Plan::new(&evenly_spaced(5), &[4], &[8], &[6]).unwrap();
        assert_eq!(
            plan.forward(&[Complex::default(); 3]).unwrap_err(),
            Error::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            plan.adjoint(&[Complex::default(); 4]).unwrap_err(),
            Error::LengthMismatch {
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let plan = Plan::new(&evenly_spaced(16), &[16], &[32], &[6]).unwrap();
        let mut x = vec![Complex::default(); 16];
        x[0] = Complex::new(1.0, 0.0);
        for y in plan.forward(&x).unwrap() {
            assert!((y - Complex::new(1.0, 0.0)).norm() < 1e-3, "{}", y);
        }
    }

    #[test]
    fn adjoint_of_forward_is_exact_transpose() {
        let f = [-3.0, -1.1, 0.2, 0.7, 2.9, 3.1];
        let plan = Plan::new(&f, &[5], &[10], &[6]).unwrap();
        let x = (0..5)
            .map(|i| Complex::new(i as f64 - 1.5, 0.3 * i as f64))
            .collect::<Vec<_>>();
        let y = (0..6)
            .map(|i| Complex::new((i as f64).cos(), (i as f64).sin()))
            .collect::<Vec<_>>();
        let ax = plan.forward(&x).unwrap();
        let ahy = plan.adjoint(&y).unwrap();
        let lhs = ax
            .iter()
            .zip(y.iter())
            .map(|(a, b)| a.conj() * b)
            .sum::<Complex<f64>>();
        let rhs = x
            .iter()
            .zip(ahy.iter())
            .map(|(a, b)| a.conj() * b)
            .sum::<Complex<f64>>()
            * 10.0;
        assert!((lhs - rhs).norm() < 1e-9 * lhs.norm().max(1.0));
    }
}
