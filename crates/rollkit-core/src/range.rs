//! Uniform range projection.
//!
//! Integers are drawn by bit-mask rejection: take the smallest all-ones mask covering the span,
//! mask a raw output and retry while it lands past the span. No modulo bias, and the expected
//! number of draws stays below two. 8/16/32-bit types consume 32-bit outputs; 64-bit types and
//! `usize` consume 64-bit outputs, so results do not depend on the host pointer width.
//!
//! Empty ranges are caller bugs and panic.

use std::fmt;

use crate::rng::BitSource;

pub trait UniformSampler: Copy + fmt::Debug {
    type Item;

    /// Prepares draws from `[lower, upper]`.
    fn new_closed(lower: Self::Item, upper: Self::Item) -> Self;

    /// Prepares draws from `[lower, upper)`.
    fn new_half_open(lower: Self::Item, upper: Self::Item) -> Self;

    fn sample<R: BitSource + ?Sized>(&self, rng: &mut R) -> Self::Item;
}

/// Numeric types with a uniform sampler.
pub trait SampleUniform: Copy + PartialOrd + fmt::Debug {
    type Sampler: UniformSampler<Item = Self>;
}

/// Prepared integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformInt<T> {
    lower: T,
    span: u64,
    mask: u64,
}

fn mask_for(span: u64) -> u64 {
    if span == 0 {
        0
    } else {
        u64::MAX >> span.leading_zeros()
    }
}

macro_rules! uniform_int_impl {
    ($ty:ty, $unsigned:ty, $draw:ident) => {
        impl SampleUniform for $ty {
            type Sampler = UniformInt<$ty>;
        }

        impl UniformSampler for UniformInt<$ty> {
            type Item = $ty;

            fn new_closed(lower: $ty, upper: $ty) -> Self {
                assert!(lower <= upper, "empty range: [{}, {}]", lower, upper);
                let span = upper.wrapping_sub(lower) as $unsigned as u64;
                Self {
                    lower,
                    span,
                    mask: mask_for(span),
                }
            }

            fn new_half_open(lower: $ty, upper: $ty) -> Self {
                assert!(lower < upper, "empty range: [{}, {})", lower, upper);
                Self::new_closed(lower, upper - 1)
            }

            #[inline]
            fn sample<R: BitSource + ?Sized>(&self, rng: &mut R) -> $ty {
                if self.span == 0 {
                    return self.lower;
                }
                loop {
                    let x = u64::from(rng.$draw()) & self.mask;
                    if x <= self.span {
                        return self.lower.wrapping_add(x as $unsigned as $ty);
                    }
                }
            }
        }
    };
}

uniform_int_impl!(i8, u8, next_u32);
uniform_int_impl!(u8, u8, next_u32);
uniform_int_impl!(i16, u16, next_u32);
uniform_int_impl!(u16, u16, next_u32);
uniform_int_impl!(i32, u32, next_u32);
uniform_int_impl!(u32, u32, next_u32);
uniform_int_impl!(i64, u64, next_u64);
uniform_int_impl!(u64, u64, next_u64);
uniform_int_impl!(usize, usize, next_u64);

/// Prepared floating-point range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformFloat<T> {
    lower: T,
    upper: T,
    scale: T,
    closed: bool,
}

macro_rules! uniform_float_impl {
    ($ty:ty, $draw:ident, $shift:expr, $bits:expr) => {
        impl SampleUniform for $ty {
            type Sampler = UniformFloat<$ty>;
        }

        impl UniformSampler for UniformFloat<$ty> {
            type Item = $ty;

            fn new_closed(lower: $ty, upper: $ty) -> Self {
                assert!(lower <= upper, "empty range: [{}, {}]", lower, upper);
                let scale = upper - lower;
                assert!(scale.is_finite(), "range is not finite: [{}, {}]", lower, upper);
                Self {
                    lower,
                    upper,
                    scale,
                    closed: true,
                }
            }

            fn new_half_open(lower: $ty, upper: $ty) -> Self {
                assert!(lower < upper, "empty range: [{}, {})", lower, upper);
                let scale = upper - lower;
                assert!(scale.is_finite(), "range is not finite: [{}, {})", lower, upper);
                Self {
                    lower,
                    upper,
                    scale,
                    closed: false,
                }
            }

            #[inline]
            fn sample<R: BitSource + ?Sized>(&self, rng: &mut R) -> $ty {
                const STEPS: $ty = (1_u64 << $bits) as $ty;
                if self.closed {
                    let unit = (rng.$draw() >> $shift) as $ty / (STEPS - 1.0);
                    let value = self.lower + unit * self.scale;
                    return if value > self.upper { self.upper } else { value };
                }
                loop {
                    let unit = (rng.$draw() >> $shift) as $ty / STEPS;
                    let value = self.lower + unit * self.scale;
                    // Rounding can land exactly on the open bound.
                    if value < self.upper {
                        return value;
                    }
                }
            }
        }
    };
}

uniform_float_impl!(f32, next_u32, 8, 24);
uniform_float_impl!(f64, next_u64, 11, 53);

/// A range prepared once and drawn from repeatedly.
#[derive(Debug, Clone, Copy)]
pub struct RangeGenerator<T: SampleUniform> {
    sampler: T::Sampler,
}

impl<T: SampleUniform> RangeGenerator<T> {
    pub fn closed(lower: T, upper: T) -> Self {
        Self {
            sampler: T::Sampler::new_closed(lower, upper),
        }
    }

    pub fn half_open(lower: T, upper: T) -> Self {
        Self {
            sampler: T::Sampler::new_half_open(lower, upper),
        }
    }

    /// `[0, bound)`.
    pub fn below(bound: T) -> Self
    where
        T: Default,
    {
        Self::half_open(T::default(), bound)
    }

    #[inline]
    pub fn next<R: BitSource + ?Sized>(&self, rng: &mut R) -> T {
        self.sampler.sample(rng)
    }
}

/// Draws from `[lower, upper]`.
pub fn range_cc<T: SampleUniform, R: BitSource + ?Sized>(rng: &mut R, lower: T, upper: T) -> T {
    T::Sampler::new_closed(lower, upper).sample(rng)
}

/// Draws from `[lower, upper)`.
pub fn range_co<T: SampleUniform, R: BitSource + ?Sized>(rng: &mut R, lower: T, upper: T) -> T {
    T::Sampler::new_half_open(lower, upper).sample(rng)
}

/// Draws from `[0, bound)`.
pub fn uniform<T: SampleUniform + Default, R: BitSource + ?Sized>(rng: &mut R, bound: T) -> T {
    range_co(rng, T::default(), bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of words.
    struct Script(Vec<u64>, usize);

    impl BitSource for Script {
        fn next_u64(&mut self) -> u64 {
            let w = self.0[self.1];
            self.1 += 1;
            w
        }
    }

    #[test]
    fn mask_covers_span() {
        assert_eq!(mask_for(0), 0);
        assert_eq!(mask_for(1), 1);
        assert_eq!(mask_for(5), 7);
        assert_eq!(mask_for(8), 15);
        assert_eq!(mask_for(u64::MAX), u64::MAX);
    }

    #[test]
    fn rejection_skips_out_of_span_draws() {
        // Span 5 (d6): masked values 7 and 6 are rejected, 3 is kept.
        let mut script = Script(vec![7, 6, 3], 0);
        assert_eq!(range_cc(&mut script, 1_u32, 6), 4);
        assert_eq!(script.1, 3);
    }

    #[test]
    fn degenerate_range_consumes_nothing() {
        let mut script = Script(vec![], 0);
        assert_eq!(range_cc(&mut script, 9_i64, 9), 9);
        assert_eq!(uniform(&mut script, 1_u8), 0);
    }

    #[test]
    fn signed_ranges_wrap_correctly() {
        let mut script = Script(vec![0, 255, 0x80], 0);
        assert_eq!(range_cc(&mut script, i8::MIN, i8::MAX), i8::MIN);
        assert_eq!(range_cc(&mut script, i8::MIN, i8::MAX), i8::MAX);
        assert_eq!(range_cc(&mut script, -3_i8, 3), -3);
    }

    #[test]
    fn full_width_range_uses_raw_output() {
        let mut script = Script(vec![0xDEAD_BEEF_0000_0001], 0);
        assert_eq!(range_cc(&mut script, 0_u64, u64::MAX), 0xDEAD_BEEF_0000_0001);
    }

    #[test]
    fn half_open_float_rejects_upper_bound() {
        // The largest unit value is 1 - 2^-24; added to 1.0 it rounds to 2.0.
        let top = u64::from(u32::MAX);
        let mut script = Script(vec![top, 0], 0);
        let value = range_co(&mut script, 1.0_f32, 2.0);
        assert_eq!(value, 1.0);
        assert_eq!(script.1, 2);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn empty_half_open_range_panics() {
        let mut script = Script(vec![], 0);
        let _ = range_co(&mut script, 5_u32, 5);
    }
}
