use num_traits::{FloatConst, NumAssign};

/// Element datatype of a complex-valued operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dtype {
    /// Pair of `f32`.
    Complex64,
    /// Pair of `f64`.
    Complex128,
}

impl Dtype {
    /// The numpy-style name of the datatype.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }
}

impl core::fmt::Display for Dtype {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Floating-point types used for performing Fourier transforms.
pub trait Float:
    rustfft::FftNum + num_traits::Float + FloatConst + NumAssign + Default + core::fmt::Display
{
    /// The datatype of complex values built from this type.
    const DTYPE: Dtype;

    /// Converts from `f64`, rounding if necessary.
    fn from_f64_lossy(value: f64) -> Self;
}

impl Float for f32 {
    const DTYPE: Dtype = Dtype::Complex64;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
}

impl Float for f64 {
    const DTYPE: Dtype = Dtype::Complex128;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}
