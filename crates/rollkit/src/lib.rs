//! Umbrella crate that re-exports the `rollkit-*` building blocks.
//!
//! Everything hangs off one generator type, [`core::XorShift1024Star`]; the other crates only
//! need a [`core::BitSource`] to draw from.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use rollkit_core as core;

#[cfg(feature = "select")]
#[cfg_attr(docsrs, doc(cfg(feature = "select")))]
pub use rollkit_select as select;

#[cfg(feature = "dice")]
#[cfg_attr(docsrs, doc(cfg(feature = "dice")))]
pub use rollkit_dice as dice;

/// The handful of names most callers need.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use rollkit_core::{range_cc, range_co, BitSource, RangeGenerator, XorShift1024Star};

    #[cfg(feature = "select")]
    pub use rollkit_select::{weighted_index, WeightedElementGenerator, WeightedIndexGenerator};

    #[cfg(feature = "dice")]
    pub use rollkit_dice::{roll_d20, roll_d6, DiceSpec, KeepDiceRoller};
}
