//! Dice rolling with keep/drop-extremes selection.
//!
//! Keep-highest and keep-lowest are computed online: the first `keep` dice fill the kept set,
//! then every further die either replaces the current worst kept value or is discarded on the
//! spot. Nothing is sorted or buffered, and a die equal to the current extreme never displaces
//! it. Drop-N is keep-(quantity - N) from the other end.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod common;
pub mod notation;
pub mod roll;
pub mod roller;
pub mod sink;

pub use common::{roll_d10, roll_d100, roll_d12, roll_d20, roll_d4, roll_d6, roll_d8, roll_die};
pub use notation::{DiceSpec, RollOutcome};
pub use roll::{
    roll_dice, roll_dice_append, roll_dice_drop_highest, roll_dice_drop_lowest, roll_dice_into,
    roll_dice_keep_highest, roll_dice_keep_lowest, roll_keep, roll_keep_append, roll_keep_into,
    roll_keep_partition, roll_selection, sum_roll_dice, sum_roll_dice_drop_highest,
    sum_roll_dice_drop_lowest, sum_roll_dice_keep_highest, sum_roll_dice_keep_lowest,
    sum_roll_keep, DicePartition, Keep, Selection,
};
pub use roller::{DiceRoller, KeepDiceRoller};
pub use sink::{DiscardSink, FixedSink};
