//! Fixed-size dice.
//!
//! These skip validation: `roll_die(rng, 0)` panics in the range layer.

use rollkit_core::{range_cc, BitSource};

#[inline]
pub fn roll_die<R: BitSource + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    range_cc(rng, 1, sides)
}

macro_rules! fixed_die {
    ($($name:ident => $sides:literal),* $(,)?) => {
        $(
            #[doc = concat!("Rolls one ", stringify!($sides), "-sided die.")]
            #[inline]
            pub fn $name<R: BitSource + ?Sized>(rng: &mut R) -> u32 {
                roll_die(rng, $sides)
            }
        )*
    };
}

fixed_die! {
    roll_d4 => 4,
    roll_d6 => 6,
    roll_d8 => 8,
    roll_d10 => 10,
    roll_d12 => 12,
    roll_d20 => 20,
    roll_d100 => 100,
}
