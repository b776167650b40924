//! Deep memory footprints.
//!
//! A footprint is the inline size of a value plus every heap allocation it owns.  Capacity that
//! is reserved but unused is not counted for `Vec`.

use core::mem::{size_of, size_of_val};
use nufft_algorithms::{Fft, Float, Plan};
use num_complex::Complex;

/// Types with a known deep size.
pub trait Footprint {
    /// Bytes occupied by `self`, including owned heap allocations.
    fn footprint(&self) -> usize;
}

macro_rules! implement_inline {
    { $($type:ty),* } => {
        $(
            impl Footprint for $type {
                fn footprint(&self) -> usize {
                    size_of::<Self>()
                }
            }
        )*
    }
}

implement_inline! { u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64 }

impl<T: Footprint> Footprint for Complex<T> {
    fn footprint(&self) -> usize {
        self.re.footprint() + self.im.footprint()
    }
}

fn elements<T: Footprint>(items: &[T]) -> usize {
    items.iter().map(Footprint::footprint).sum()
}

impl<T: Footprint> Footprint for Vec<T> {
    fn footprint(&self) -> usize {
        size_of::<Self>() + elements(self)
    }
}

impl<T: Footprint> Footprint for Box<[T]> {
    fn footprint(&self) -> usize {
        size_of::<Self>() + elements(self)
    }
}

impl Footprint for String {
    fn footprint(&self) -> usize {
        size_of::<Self>() + self.capacity()
    }
}

impl<A, D> Footprint for ndarray::Array<A, D>
where
    D: ndarray::Dimension,
{
    fn footprint(&self) -> usize {
        size_of::<Self>() + self.len() * size_of::<A>()
    }
}

impl<T: Float> Footprint for Box<dyn Fft<Real = T>> {
    fn footprint(&self) -> usize {
        size_of::<Self>() + size_of_val(&**self) + self.heap_bytes()
    }
}

impl<T: Float> Footprint for Plan<T> {
    fn footprint(&self) -> usize {
        size_of::<Self>() + self.heap_bytes()
    }
}

/// Measures the memory held by an object.
pub trait MemoryMeter {
    fn measure(&self, item: &dyn Footprint) -> usize;
}

/// Measures the deep size reported by [`Footprint`].
#[derive(Copy, Clone, Debug, Default)]
pub struct DeepSize;

impl MemoryMeter for DeepSize {
    fn measure(&self, item: &dyn Footprint) -> usize {
        item.footprint()
    }
}
