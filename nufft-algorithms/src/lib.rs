//! Building blocks for Fourier linear operators.  This crate provides the numerical engines
//! (FFTs, dense DFT matrices, and planned non-uniform FFTs) with a low-level API, so you are
//! probably looking for the [`nufft`](../nufft/index.html) crate instead.

mod error;
mod fft;
mod float;
mod twiddle;

pub mod dft;
pub mod kernel;
pub mod plan;

pub use error::Error;
pub use fft::*;
pub use float::*;
pub use plan::Plan;
pub use twiddle::{compute_phase, compute_twiddle};

#[doc(hidden)]
pub use num_complex;
