use crate::error::{check_len, Error, Result};
use crate::footprint::Footprint;
use crate::trace::{self, Direction};
use crate::LinearOperator;
use nufft_algorithms::{create_fft, Fft, FftEngine, Float, Transform};
use num_complex::Complex;
use std::time::Instant;

/// A unitary one-dimensional FFT, exposed as a linear operator.
///
/// With `real` set, the input is taken to be real and only the `n / 2 + 1` non-negative
/// frequencies are returned.  The bins that stand in for a conjugate pair are weighted by
/// `sqrt(2)`, so that the adjoint (an inverse real FFT) matches the forward under the real inner
/// product.
pub struct FftOperator<T: Float> {
    dims: [usize; 1],
    dimsd: [usize; 1],
    real: bool,
    engine: FftEngine,
    name: String,
    fft: Box<dyn Fft<Real = T>>,
}

impl<T: Float> core::fmt::Debug for FftOperator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("FftOperator")
            .field("name", &self.name)
            .field("dims", &self.dims)
            .field("dimsd", &self.dimsd)
            .field("real", &self.real)
            .field("fft", &self.fft)
            .finish()
    }
}

impl<T: Float> FftOperator<T> {
    /// Plans an FFT of `n` samples on the given engine.
    pub fn new(n: usize, engine: FftEngine, real: bool) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidArgument {
                arg: "n",
                reason: "FFT size must be positive".into(),
            });
        }
        let started = Instant::now();
        let op = Self {
            dims: [n],
            dimsd: [if real { n / 2 + 1 } else { n }],
            real,
            engine,
            name: "F".into(),
            fft: create_fft(n, engine),
        };
        trace::record(&op.name, Direction::Plan, op.shape(), started);
        Ok(op)
    }

    /// Renames the operator.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The engine backing the transform.
    pub fn engine(&self) -> FftEngine {
        self.engine
    }

    /// True if the operator acts on real signals.
    pub fn is_real(&self) -> bool {
        self.real
    }

    /// The number of signal samples.
    pub fn size(&self) -> usize {
        self.dims[0]
    }

    /// Bins `1..=(n - 1) / 2`, which are weighted by `sqrt(2)` in real mode.
    fn paired_bins(&self) -> core::ops::RangeInclusive<usize> {
        1..=(self.dims[0] - 1) / 2
    }
}

impl<T: Float> LinearOperator for FftOperator<T> {
    type Real = T;

    fn dims(&self) -> &[usize] {
        &self.dims
    }

    fn dimsd(&self) -> &[usize] {
        &self.dimsd
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn real_domain(&self) -> bool {
        self.real
    }

    fn apply_into(&self, x: &[Complex<T>], y: &mut [Complex<T>]) -> Result<()> {
        check_len(self.dims[0], x.len())?;
        check_len(self.dimsd[0], y.len())?;
        let started = Instant::now();
        if self.real {
            let mut buffer = x
                .iter()
                .map(|v| Complex::new(v.re, T::zero()))
                .collect::<Vec<_>>();
            self.fft
                .transform_in_place(&mut buffer, Transform::SqrtScaledFft);
            y.copy_from_slice(&buffer[..self.dimsd[0]]);
            let weight = T::SQRT_2();
            for bin in self.paired_bins() {
                y[bin] = y[bin].scale(weight);
            }
        } else {
            self.fft.transform(x, y, Transform::SqrtScaledFft);
        }
        trace::record(&self.name, Direction::Forward, self.shape(), started);
        Ok(())
    }

    fn apply_adjoint_into(&self, y: &[Complex<T>], x: &mut [Complex<T>]) -> Result<()> {
        check_len(self.dimsd[0], y.len())?;
        check_len(self.dims[0], x.len())?;
        let started = Instant::now();
        if self.real {
            let n = self.dims[0];
            let mut half = y.to_vec();
            let weight = T::SQRT_2().recip();
            for bin in self.paired_bins() {
                half[bin] = half[bin].scale(weight);
            }
            half[0].im = T::zero();
            if n % 2 == 0 {
                half[n / 2].im = T::zero();
            }
            let mut full = vec![Complex::default(); n];
            full[..half.len()].copy_from_slice(&half);
            for k in half.len()..n {
                full[k] = half[n - k].conj();
            }
            self.fft
                .transform_in_place(&mut full, Transform::SqrtScaledIfft);
            for (out, value) in x.iter_mut().zip(full.iter()) {
                *out = Complex::new(value.re, T::zero());
            }
        } else {
            self.fft.transform(y, x, Transform::SqrtScaledIfft);
        }
        trace::record(&self.name, Direction::Adjoint, self.shape(), started);
        Ok(())
    }
}

impl<T: Float> Footprint for FftOperator<T> {
    fn footprint(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.name.capacity()
            + core::mem::size_of_val(&*self.fft)
            + self.fft.heap_bytes()
    }
}
