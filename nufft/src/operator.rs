//! The linear-operator interface and its composition.

use crate::error::{check_len, Error, Result};
use nufft_algorithms::{Dtype, Float};
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use rand_distr::StandardNormal;

/// A linear map between complex vectors, applied matrix-free.
///
/// Implementors provide forward and adjoint application into caller-provided buffers; the
/// allocating [`apply`](LinearOperator::apply) and
/// [`apply_adjoint`](LinearOperator::apply_adjoint) are provided.
pub trait LinearOperator: core::fmt::Debug {
    /// The real type of the operator's elements.
    type Real: Float;

    /// Shape of the input.
    fn dims(&self) -> &[usize];

    /// Shape of the output.
    fn dimsd(&self) -> &[usize];

    /// Display name.
    fn name(&self) -> &str;

    /// Element datatype.
    fn dtype(&self) -> Dtype {
        Self::Real::DTYPE
    }

    /// `(rows, cols)`, the flattened output and input lengths.
    fn shape(&self) -> (usize, usize) {
        (self.dimsd().iter().product(), self.dims().iter().product())
    }

    /// True if the forward input is interpreted as real (imaginary parts are ignored).
    fn real_domain(&self) -> bool {
        false
    }

    /// True if the forward output is always real.
    fn real_range(&self) -> bool {
        false
    }

    /// Computes `y = A x`.
    fn apply_into(&self, x: &[Complex<Self::Real>], y: &mut [Complex<Self::Real>]) -> Result<()>;

    /// Computes `x = A^H y`.
    fn apply_adjoint_into(
        &self,
        y: &[Complex<Self::Real>],
        x: &mut [Complex<Self::Real>],
    ) -> Result<()>;

    /// Computes and returns `A x`.
    fn apply(&self, x: &[Complex<Self::Real>]) -> Result<Vec<Complex<Self::Real>>> {
        let mut y = vec![Complex::default(); self.shape().0];
        self.apply_into(x, &mut y)?;
        Ok(y)
    }

    /// Computes and returns `A^H y`.
    fn apply_adjoint(&self, y: &[Complex<Self::Real>]) -> Result<Vec<Complex<Self::Real>>> {
        let mut x = vec![Complex::default(); self.shape().1];
        self.apply_adjoint_into(y, &mut x)?;
        Ok(x)
    }
}

impl<Op: LinearOperator + ?Sized> LinearOperator for &Op {
    type Real = Op::Real;

    fn dims(&self) -> &[usize] {
        (**self).dims()
    }

    fn dimsd(&self) -> &[usize] {
        (**self).dimsd()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn real_domain(&self) -> bool {
        (**self).real_domain()
    }

    fn real_range(&self) -> bool {
        (**self).real_range()
    }

    fn apply_into(&self, x: &[Complex<Self::Real>], y: &mut [Complex<Self::Real>]) -> Result<()> {
        (**self).apply_into(x, y)
    }

    fn apply_adjoint_into(
        &self,
        y: &[Complex<Self::Real>],
        x: &mut [Complex<Self::Real>],
    ) -> Result<()> {
        (**self).apply_adjoint_into(y, x)
    }
}

/// The adjoint `A^H` of an operator.
#[derive(Debug)]
pub struct Adjoint<Op> {
    inner: Op,
    name: String,
}

impl<Op: LinearOperator> Adjoint<Op> {
    pub fn new(inner: Op) -> Self {
        let name = format!("{}^H", inner.name());
        Self { inner, name }
    }
}

impl<Op: LinearOperator> LinearOperator for Adjoint<Op> {
    type Real = Op::Real;

    fn dims(&self) -> &[usize] {
        self.inner.dimsd()
    }

    fn dimsd(&self) -> &[usize] {
        self.inner.dims()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn real_domain(&self) -> bool {
        self.inner.real_range()
    }

    fn real_range(&self) -> bool {
        self.inner.real_domain()
    }

    fn apply_into(&self, x: &[Complex<Self::Real>], y: &mut [Complex<Self::Real>]) -> Result<()> {
        self.inner.apply_adjoint_into(x, y)
    }

    fn apply_adjoint_into(
        &self,
        y: &[Complex<Self::Real>],
        x: &mut [Complex<Self::Real>],
    ) -> Result<()> {
        self.inner.apply_into(y, x)
    }
}

/// The product `A B`, applying `B` first.
#[derive(Debug)]
pub struct Product<A, B> {
    left: A,
    right: B,
    name: String,
}

impl<A, B> Product<A, B>
where
    A: LinearOperator,
    B: LinearOperator<Real = A::Real>,
{
    /// Fails if the output of `right` does not fit the input of `left`.
    pub fn new(left: A, right: B) -> Result<Self> {
        if left.shape().1 != right.shape().0 {
            return Err(Error::ShapeMismatch {
                left: left.shape(),
                right: right.shape(),
            });
        }
        let name = format!("{}*{}", left.name(), right.name());
        Ok(Self { left, right, name })
    }
}

impl<A, B> LinearOperator for Product<A, B>
where
    A: LinearOperator,
    B: LinearOperator<Real = A::Real>,
{
    type Real = A::Real;

    fn dims(&self) -> &[usize] {
        self.right.dims()
    }

    fn dimsd(&self) -> &[usize] {
        self.left.dimsd()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn real_domain(&self) -> bool {
        self.right.real_domain()
    }

    fn real_range(&self) -> bool {
        self.left.real_range()
    }

    fn apply_into(&self, x: &[Complex<Self::Real>], y: &mut [Complex<Self::Real>]) -> Result<()> {
        let inner = self.right.apply(x)?;
        self.left.apply_into(&inner, y)
    }

    fn apply_adjoint_into(
        &self,
        y: &[Complex<Self::Real>],
        x: &mut [Complex<Self::Real>],
    ) -> Result<()> {
        let inner = self.left.apply_adjoint(y)?;
        self.right.apply_adjoint_into(&inner, x)
    }
}

/// The operator `alpha A`.
#[derive(Debug)]
pub struct Scaled<Op: LinearOperator> {
    inner: Op,
    alpha: Complex<Op::Real>,
    name: String,
}

impl<Op: LinearOperator> Scaled<Op> {
    pub fn new(inner: Op, alpha: Complex<Op::Real>) -> Self {
        let name = format!("{}*{}", alpha, inner.name());
        Self { inner, alpha, name }
    }
}

impl<Op: LinearOperator> LinearOperator for Scaled<Op> {
    type Real = Op::Real;

    fn dims(&self) -> &[usize] {
        self.inner.dims()
    }

    fn dimsd(&self) -> &[usize] {
        self.inner.dimsd()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn real_domain(&self) -> bool {
        self.inner.real_domain()
    }

    fn real_range(&self) -> bool {
        self.inner.real_range() && self.alpha.im.is_zero()
    }

    fn apply_into(&self, x: &[Complex<Self::Real>], y: &mut [Complex<Self::Real>]) -> Result<()> {
        self.inner.apply_into(x, y)?;
        for v in y.iter_mut() {
            *v *= self.alpha;
        }
        Ok(())
    }

    fn apply_adjoint_into(
        &self,
        y: &[Complex<Self::Real>],
        x: &mut [Complex<Self::Real>],
    ) -> Result<()> {
        self.inner.apply_adjoint_into(y, x)?;
        let alpha = self.alpha.conj();
        for v in x.iter_mut() {
            *v *= alpha;
        }
        Ok(())
    }
}

/// Composition methods available on every operator.
pub trait LinearOperatorExt: LinearOperator + Sized {
    /// Wraps the operator so that forward and adjoint application swap.
    fn adjoint(self) -> Adjoint<Self> {
        Adjoint::new(self)
    }

    /// Builds `self * other`, applying `other` first.
    fn compose<B>(self, other: B) -> Result<Product<Self, B>>
    where
        B: LinearOperator<Real = Self::Real>,
    {
        Product::new(self, other)
    }

    /// Multiplies the operator by a scalar.
    fn scaled(self, alpha: Complex<Self::Real>) -> Scaled<Self> {
        Scaled::new(self, alpha)
    }
}

impl<Op: LinearOperator> LinearOperatorExt for Op {}

/// The inner product `sum(conj(a) * b)`.
pub fn vdot<T: Float>(a: &[Complex<T>], b: &[Complex<T>]) -> Complex<T> {
    a.iter()
        .zip(b.iter())
        .fold(Complex::default(), |acc, (a, b)| acc + a.conj() * b)
}

fn random_vector<T: Float, R: Rng + ?Sized>(rng: &mut R, len: usize, real: bool) -> Vec<Complex<T>> {
    (0..len)
        .map(|_| {
            let re = T::from_f64_lossy(rng.sample(StandardNormal));
            let im = if real {
                T::zero()
            } else {
                T::from_f64_lossy(rng.sample(StandardNormal))
            };
            Complex::new(re, im)
        })
        .collect()
}

fn to_f64<T: Float>(value: Complex<T>) -> Complex<f64> {
    Complex::new(
        value.re.to_f64().unwrap_or(f64::NAN),
        value.im.to_f64().unwrap_or(f64::NAN),
    )
}

/// Checks `<A x, y> == <x, A^H y>` for random `x` and `y`, within relative `tolerance`.
///
/// Operators with a real domain or range are compared on real parts only.  Returns both
/// inner products.
pub fn dot_test<Op, R>(op: &Op, rng: &mut R, tolerance: f64) -> Result<(Complex<f64>, Complex<f64>)>
where
    Op: LinearOperator + ?Sized,
    R: Rng + ?Sized,
{
    let (rows, cols) = op.shape();
    let x = random_vector(rng, cols, op.real_domain());
    let y = random_vector(rng, rows, op.real_range());

    let ax = op.apply(&x)?;
    let ahy = op.apply_adjoint(&y)?;
    check_len(rows, ax.len())?;
    check_len(cols, ahy.len())?;

    let mut forward = to_f64(vdot(&ax, &y));
    let mut adjoint = to_f64(vdot(&x, &ahy));
    if op.real_domain() || op.real_range() {
        forward.im = 0.0;
        adjoint.im = 0.0;
    }

    let error = (forward - adjoint).norm() / ((forward.norm() + adjoint.norm()) / 2.0 + 1e-15);
    if error < tolerance {
        Ok((forward, adjoint))
    } else {
        Err(Error::AdjointMismatch { forward, adjoint })
    }
}

/// A one-line summary of an operator.
pub fn describe<Op: LinearOperator + ?Sized>(op: &Op) -> String {
    let (rows, cols) = op.shape();
    format!(
        "{}: {:?} -> {:?}, {}x{}, {}",
        op.name(),
        op.dims(),
        op.dimsd(),
        rows,
        cols,
        op.dtype()
    )
}
