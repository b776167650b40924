//! This crate provides Fourier transforms as matrix-free linear operators.
//!
//! # Operators
//! * [`FftOperator`] is a unitary FFT of real or complex signals.
//! * [`NonUniformFft`] maps uniformly spaced samples onto arbitrary frequencies, with its
//!   adjoint scaled to match.
//! * [`Identity`] is mostly useful for composition and testing.
//!
//! Operators compose through [`LinearOperatorExt`], and [`dot_test`] checks that an operator's
//! forward and adjoint agree.
//!
//! # Memory
//! The [`benchmark`] module compares the footprint of a dense DFT matrix to those of the FFT size
//! (or, optionally, its plan) and an FFT operator, and plots the comparison with
//! [`plot::PythonPlotter`].
//!
//! # Tracing
//! After [`trace::set_tracing`]`(true)`, planning and application are recorded as
//! [`trace::OperatorTrace`]s, which can be drained with [`trace::take_operator_traces`].

mod dft;
mod error;
mod fft;
mod identity;
mod non_uniform;

pub mod benchmark;
pub mod footprint;
pub mod operator;
pub mod plot;
pub mod trace;

pub use dft::dft;
pub use error::{Error, Result};
pub use fft::FftOperator;
pub use footprint::{DeepSize, Footprint, MemoryMeter};
pub use identity::Identity;
pub use non_uniform::{NonUniformFft, NufftOptions};
pub use operator::{describe, dot_test, LinearOperator, LinearOperatorExt};

pub use nufft_algorithms::{Dtype, FftEngine, Float, Plan, Transform};
