//! Identity operators.

use crate::error::{check_len, Result};
use crate::footprint::Footprint;
use crate::LinearOperator;
use nufft_algorithms::Float;
use num_complex::Complex;

/// Implements the `n x n` identity.
#[derive(Clone)]
pub struct Identity<T> {
    dims: [usize; 1],
    name: String,
    phantom_data: core::marker::PhantomData<T>,
}

impl<T> Identity<T> {
    /// Creates an identity of size `n`, named "I".
    pub fn new(n: usize) -> Self {
        Self {
            dims: [n],
            name: "I".into(),
            phantom_data: core::marker::PhantomData,
        }
    }

    /// Renames the operator.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<T> core::fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error> {
        write!(f, "Identity({})", self.dims[0])
    }
}

impl<T: Float> LinearOperator for Identity<T> {
    type Real = T;

    fn dims(&self) -> &[usize] {
        &self.dims
    }

    fn dimsd(&self) -> &[usize] {
        &self.dims
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply_into(&self, x: &[Complex<T>], y: &mut [Complex<T>]) -> Result<()> {
        check_len(self.dims[0], x.len())?;
        check_len(self.dims[0], y.len())?;
        y.copy_from_slice(x);
        Ok(())
    }

    fn apply_adjoint_into(&self, y: &[Complex<T>], x: &mut [Complex<T>]) -> Result<()> {
        self.apply_into(y, x)
    }
}

impl<T> Footprint for Identity<T> {
    fn footprint(&self) -> usize {
        core::mem::size_of::<Self>() + self.name.capacity()
    }
}
