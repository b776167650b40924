use crate::error::{check_len, Error, Result};
use crate::footprint::Footprint;
use crate::trace::{self, Direction};
use crate::LinearOperator;
use nufft_algorithms::{FftEngine, Float, Plan};
use num_complex::Complex;
use std::time::Instant;

/// Planning parameters for [`NonUniformFft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NufftOptions {
    /// Ratio of the oversampled grid length to the signal length.
    pub oversampling: usize,
    /// Grid samples touched by the interpolation kernel.
    pub kernel_width: usize,
    pub engine: FftEngine,
    pub name: String,
}

impl Default for NufftOptions {
    fn default() -> Self {
        Self {
            oversampling: 2,
            kernel_width: 6,
            engine: FftEngine::RustFft,
            name: "F".into(),
        }
    }
}

impl NufftOptions {
    #[must_use]
    pub fn with_oversampling(mut self, oversampling: usize) -> Self {
        self.oversampling = oversampling;
        self
    }

    #[must_use]
    pub fn with_kernel_width(mut self, kernel_width: usize) -> Self {
        self.kernel_width = kernel_width;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: FftEngine) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Non-uniform FFT operator.
///
/// Maps `nt` uniformly spaced time samples onto an arbitrary set of frequencies `f`, normalized
/// to `[-pi, pi)`.  The transform is planned once, on construction, and reused for every
/// application.
///
/// Forward application divides the planned transform by `sqrt(K)`, where `K` is the oversampled
/// grid length; adjoint application multiplies the planned adjoint (which carries a `1 / K`) by
/// `sqrt(K)`.  The two are therefore exact adjoints of each other.
#[derive(Debug)]
pub struct NonUniformFft<T: Float> {
    dims: [usize; 1],
    dimsd: [usize; 1],
    name: String,
    plan: Plan<T>,
    scale: T,
}

impl<T: Float> NonUniformFft<T> {
    /// Plans an operator from `nt` samples onto frequencies `f`, with a 2x oversampled grid and
    /// a kernel 6 samples wide.
    pub fn new(nt: usize, f: &[T]) -> Result<Self> {
        Self::with_options(nt, f, NufftOptions::default())
    }

    /// Plans an operator with explicit options.
    pub fn with_options(nt: usize, f: &[T], options: NufftOptions) -> Result<Self> {
        if options.oversampling == 0 {
            return Err(Error::InvalidArgument {
                arg: "oversampling",
                reason: "oversampling factor must be positive".into(),
            });
        }
        let started = Instant::now();
        let plan = Plan::with_engine(
            f,
            &[nt],
            &[options.oversampling * nt],
            &[options.kernel_width],
            options.engine,
        )?;
        let grid = plan.grid_shape().iter().product::<usize>();
        let scale = T::from_usize(grid)
            .map(T::sqrt)
            .ok_or(Error::InvalidArgument {
                arg: "nt",
                reason: format!("grid length {grid} is not representable"),
            })?;
        let op = Self {
            dims: [nt],
            dimsd: [f.len()],
            name: options.name,
            plan,
            scale,
        };
        trace::record(&op.name, Direction::Plan, op.shape(), started);
        Ok(op)
    }

    /// Number of time samples.
    pub fn nt(&self) -> usize {
        self.dims[0]
    }

    /// The planned frequencies.
    pub fn frequencies(&self) -> &[T] {
        self.plan.frequencies()
    }

    /// The oversampled grid shape.
    pub fn grid_shape(&self) -> &[usize] {
        self.plan.grid_shape()
    }

    /// The underlying plan.
    pub fn plan(&self) -> &Plan<T> {
        &self.plan
    }
}

impl<T: Float> LinearOperator for NonUniformFft<T> {
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

    fn apply_into(&self, x: &[Complex<T>], y: &mut [Complex<T>]) -> Result<()> {
        check_len(self.dimsd[0], y.len())?;
        let started = Instant::now();
        let transformed = self.plan.forward(x)?;
        for (out, value) in y.iter_mut().zip(transformed) {
            *out = value.unscale(self.scale);
        }
        trace::record(&self.name, Direction::Forward, self.shape(), started);
        Ok(())
    }

    fn apply_adjoint_into(&self, y: &[Complex<T>], x: &mut [Complex<T>]) -> Result<()> {
        check_len(self.dims[0], x.len())?;
        let started = Instant::now();
        let transformed = self.plan.adjoint(y)?;
        for (out, value) in x.iter_mut().zip(transformed) {
            *out = value.scale(self.scale);
        }
        trace::record(&self.name, Direction::Adjoint, self.shape(), started);
        Ok(())
    }
}

impl<T: Float> Footprint for NonUniformFft<T> {
    fn footprint(&self) -> usize {
        core::mem::size_of::<Self>() + self.name.capacity() + self.plan.heap_bytes()
    }
}
