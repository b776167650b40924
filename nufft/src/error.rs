use crate::plot::PlotError;
use num_complex::Complex;
use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by operators and the memory benchmark.
#[derive(Debug, Error)]
pub enum Error {
    /// Failures from the transform engines pass through unchanged.
    #[error(transparent)]
    Engine(#[from] nufft_algorithms::Error),
    /// An argument was outside its valid domain.
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },
    /// Operators with incompatible shapes were combined.
    #[error("shape mismatch: cannot compose {left:?} with {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Forward and adjoint application disagree.
    #[error("adjoint test failed: <Ax, y> = {forward}, <x, A^H y> = {adjoint}")]
    AdjointMismatch {
        forward: Complex<f64>,
        adjoint: Complex<f64>,
    },
    /// Rendering a figure failed.
    #[error("plotting failed: {0}")]
    Plot(#[from] PlotError),
    /// Measurements could not be encoded.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(nufft_algorithms::Error::LengthMismatch { expected, actual }.into())
    }
}
