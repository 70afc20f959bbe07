use std::fmt;
use std::ops::Sub;

use rollkit_core::SampleUniform;

/// A numeric weight and the accumulator its sums are kept in.
///
/// | weight | sum   |
/// |--------|-------|
/// | `i8`   | `i32` |
/// | `u8`   | `u32` |
/// | `i16`  | `i32` |
/// | `u16`  | `u32` |
/// | `i32`  | `i64` |
/// | `u32`  | `u64` |
/// | `i64`  | `i64` |
/// | `u64`  | `u64` |
/// | `usize`| `u64` |
/// | `f32`  | `f32` |
/// | `f64`  | `f64` |
///
/// Integer sums are checked, so an overflowing total is reported instead of wrapping.
pub trait Weight: Copy + PartialOrd + Default + fmt::Debug {
    type Sum: SampleUniform + Default + Sub<Output = Self::Sum>;

    fn widen(self) -> Self::Sum;

    /// `sum + self`, or `None` when the accumulator cannot hold it.
    fn accumulate(self, sum: Self::Sum) -> Option<Self::Sum>;

    /// Non-negative and, for floats, not NaN.
    fn is_valid(self) -> bool {
        self >= Self::default()
    }

    /// Whether `sum` can bound a uniform draw. Only floats can fail this.
    fn sum_is_finite(_sum: Self::Sum) -> bool {
        true
    }
}

macro_rules! int_weight {
    ($($ty:ty => $sum:ty),* $(,)?) => {$(
        impl Weight for $ty {
            type Sum = $sum;

            #[inline]
            fn widen(self) -> $sum {
                self as $sum
            }

            #[inline]
            fn accumulate(self, sum: $sum) -> Option<$sum> {
                sum.checked_add(self as $sum)
            }
        }
    )*};
}

macro_rules! float_weight {
    ($($ty:ty),* $(,)?) => {$(
        impl Weight for $ty {
            type Sum = $ty;

            #[inline]
            fn widen(self) -> $ty {
                self
            }

            #[inline]
            fn accumulate(self, sum: $ty) -> Option<$ty> {
                let total = sum + self;
                total.is_finite().then_some(total)
            }

            #[inline]
            fn sum_is_finite(sum: $ty) -> bool {
                sum.is_finite()
            }
        }
    )*};
}

int_weight!(
    i8 => i32,
    u8 => u32,
    i16 => i32,
    u16 => u32,
    i32 => i64,
    u32 => u64,
    i64 => i64,
    u64 => u64,
    usize => u64,
);
float_weight!(f32, f64);

/// Index-addressable weights.
pub trait WeightSource {
    type Weight: Weight;

    fn len(&self) -> usize;

    fn weight(&self, index: usize) -> Self::Weight;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<W: Weight> WeightSource for [W] {
    type Weight = W;

    fn len(&self) -> usize {
        <[W]>::len(self)
    }

    #[inline]
    fn weight(&self, index: usize) -> W {
        self[index]
    }
}

impl<W: Weight, const N: usize> WeightSource for [W; N] {
    type Weight = W;

    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn weight(&self, index: usize) -> W {
        self[index]
    }
}

impl<W: Weight> WeightSource for Vec<W> {
    type Weight = W;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn weight(&self, index: usize) -> W {
        self[index]
    }
}

/// Weights computed on demand by an index → weight function.
#[derive(Clone, Copy)]
pub struct WeightFn<F> {
    count: usize,
    f: F,
}

impl<F> WeightFn<F> {
    pub fn new(count: usize, f: F) -> Self {
        Self { count, f }
    }
}

impl<F> fmt::Debug for WeightFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightFn").field("count", &self.count).finish_non_exhaustive()
    }
}

impl<W, F> WeightSource for WeightFn<F>
where
    W: Weight,
    F: Fn(usize) -> W,
{
    type Weight = W;

    fn len(&self) -> usize {
        self.count
    }

    #[inline]
    fn weight(&self, index: usize) -> W {
        (self.f)(index)
    }
}
