use crate::float::Float;
use crate::twiddle::compute_twiddle;
use num_complex::Complex;
use rustfft::Fft as _;
use std::sync::Arc;

/// Direction and normalization of a transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transform {
    /// Forward, unnormalized.
    Fft,
    /// Inverse, normalized by `1 / N`.
    Ifft,
    /// Forward, normalized by `1 / sqrt(N)`.
    SqrtScaledFft,
    /// Inverse, normalized by `1 / sqrt(N)`.
    SqrtScaledIfft,
}

impl Transform {
    #[inline]
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Fft | Self::SqrtScaledFft)
    }

    /// The factor applied after an unnormalized transform of `size` points, if any.
    #[inline]
    pub fn scale<T: Float>(&self, size: usize) -> Option<T> {
        let size = T::from_usize(size)?;
        match self {
            Self::Fft => None,
            Self::Ifft => Some(size.recip()),
            Self::SqrtScaledFft | Self::SqrtScaledIfft => Some(size.sqrt().recip()),
        }
    }
}

/// Selects the implementation backing an FFT.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FftEngine {
    /// Plans from the `rustfft` planner.
    #[default]
    RustFft,
    /// Direct `O(n^2)` evaluation from a twiddle table.
    Naive,
}

impl FftEngine {
    /// The engine's display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RustFft => "rustfft",
            Self::Naive => "naive",
        }
    }
}

impl core::str::FromStr for FftEngine {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rustfft" => Ok(Self::RustFft),
            "naive" => Ok(Self::Naive),
            other => Err(crate::Error::InvalidArgument {
                arg: "engine",
                reason: format!("unknown FFT engine `{other}`"),
            }),
        }
    }
}

/// The interface for performing FFTs.
pub trait Fft: core::fmt::Debug + Send + Sync {
    /// The real type used by the FFT.
    type Real: Float;

    /// The size of the FFT.
    fn size(&self) -> usize;

    /// Estimated bytes owned on the heap by the FFT (twiddles and scratch).
    fn heap_bytes(&self) -> usize;

    /// Apply an FFT or IFFT in-place.
    fn transform_in_place(&self, input: &mut [Complex<Self::Real>], transform: Transform);

    /// Transforms `input` into `output`, leaving `input` untouched.
    fn transform(
        &self,
        input: &[Complex<Self::Real>],
        output: &mut [Complex<Self::Real>],
        transform: Transform,
    ) {
        assert_eq!(input.len(), self.size());
        assert_eq!(output.len(), self.size());
        output.copy_from_slice(input);
        self.transform_in_place(output, transform);
    }
}

fn apply_scale<T: Float>(input: &mut [Complex<T>], transform: Transform) {
    if let Some(scale) = transform.scale::<T>(input.len()) {
        for x in input.iter_mut() {
            *x = x.scale(scale);
        }
    }
}

/// An FFT planned by `rustfft`.
pub struct RustFft<T: Float> {
    size: usize,
    forward: Arc<dyn rustfft::Fft<T>>,
    inverse: Arc<dyn rustfft::Fft<T>>,
}

impl<T: Float> RustFft<T> {
    /// Plans forward and inverse FFTs of the given size.
    pub fn new(size: usize) -> Self {
        let mut planner = rustfft::FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }
}

impl<T: Float> core::fmt::Debug for RustFft<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error> {
        f.debug_struct("RustFft").field("size", &self.size).finish()
    }
}

impl<T: Float> Fft for RustFft<T> {
    type Real = T;

    fn size(&self) -> usize {
        self.size
    }

    fn heap_bytes(&self) -> usize {
        // Twiddles are private to rustfft; assume one per point and direction.
        let element = core::mem::size_of::<Complex<T>>();
        let scratch =
            self.forward.get_inplace_scratch_len() + self.inverse.get_inplace_scratch_len();
        (2 * self.size + scratch) * element
    }

    fn transform_in_place(&self, input: &mut [Complex<T>], transform: Transform) {
        assert_eq!(input.len(), self.size);
        if transform.is_forward() {
            self.forward.process(input);
        } else {
            self.inverse.process(input);
        }
        apply_scale(input, transform);
    }
}

/// A direct DFT evaluated from a precomputed twiddle table.
pub struct NaiveDft<T> {
    twiddles: Box<[Complex<T>]>,
}

impl<T: Float> NaiveDft<T> {
    /// Precomputes the twiddles for the given size.
    pub fn new(size: usize) -> Self {
        Self {
            twiddles: (0..size)
                .map(|i| compute_twiddle(i, size, true))
                .collect(),
        }
    }
}

impl<T> core::fmt::Debug for NaiveDft<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error> {
        f.debug_struct("NaiveDft")
            .field("size", &self.twiddles.len())
            .finish()
    }
}

impl<T: Float> Fft for NaiveDft<T> {
    type Real = T;

    fn size(&self) -> usize {
        self.twiddles.len()
    }

    fn heap_bytes(&self) -> usize {
        self.twiddles.len() * core::mem::size_of::<Complex<T>>()
    }

    fn transform_in_place(&self, input: &mut [Complex<T>], transform: Transform) {
        let size = self.size();
        assert_eq!(input.len(), size);
        let forward = transform.is_forward();
        let output = (0..size)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .fold(Complex::default(), |acc, (n, x)| {
                        let w = self.twiddles[(k * n) % size];
                        acc + x * if forward { w } else { w.conj() }
                    })
            })
            .collect::<Vec<_>>();
        input.copy_from_slice(&output);
        apply_scale(input, transform);
    }
}

/// Create a complex-valued FFT over `T` with the specified size and engine.
pub fn create_fft<T: Float>(size: usize, engine: FftEngine) -> Box<dyn Fft<Real = T>> {
    match engine {
        FftEngine::RustFft => Box::new(RustFft::new(size)),
        FftEngine::Naive => Box::new(NaiveDft::new(size)),
    }
}
