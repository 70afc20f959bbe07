//! One-shot dice functions.
//!
//! Every keep/drop variant funnels into [`keep_extremes`]. The public surface differs only in
//! where the kept dice go (a fresh `Vec`, a pre-sized slice, or appended to a `Vec`) and where the
//! discarded dice go (any [`DiscardSink`]).

use std::fmt;

use rollkit_core::{BitSource, Error, RangeGenerator, Result};

use crate::sink::DiscardSink;

/// Which end of the batch a keep roll retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Keep {
    Highest,
    Lowest,
}

impl Keep {
    /// The end a drop roll of the same dice keeps.
    pub fn opposite(self) -> Self {
        match self {
            Self::Highest => Self::Lowest,
            Self::Lowest => Self::Highest,
        }
    }
}

/// How a batch of dice is reduced to the kept set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Selection {
    #[default]
    All,
    KeepHighest(usize),
    KeepLowest(usize),
    DropHighest(usize),
    DropLowest(usize),
}

impl Selection {
    /// Reduces the selection to `(keep, keep_quantity)` for a batch of `quantity` dice.
    ///
    /// Keep counts must lie in `[1, quantity]` and drop counts in `[0, quantity)`.
    pub fn resolve(self, quantity: usize) -> Result<(Keep, usize)> {
        match self {
            Self::All => {
                check_quantity(quantity)?;
                Ok((Keep::Highest, quantity))
            }
            Self::KeepHighest(n) => check_keep(quantity, n).map(|()| (Keep::Highest, n)),
            Self::KeepLowest(n) => check_keep(quantity, n).map(|()| (Keep::Lowest, n)),
            Self::DropHighest(n) => check_drop(quantity, n).map(|()| (Keep::Lowest, quantity - n)),
            Self::DropLowest(n) => check_drop(quantity, n).map(|()| (Keep::Highest, quantity - n)),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => Ok(()),
            Self::KeepHighest(n) => write!(f, "kh{n}"),
            Self::KeepLowest(n) => write!(f, "kl{n}"),
            Self::DropHighest(n) => write!(f, "dh{n}"),
            Self::DropLowest(n) => write!(f, "dl{n}"),
        }
    }
}

/// Kept and discarded dice of a single roll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DicePartition {
    pub kept: Vec<u32>,
    pub discarded: Vec<u32>,
}

impl DicePartition {
    pub fn sum(&self) -> u64 {
        sum_of(&self.kept)
    }
}

pub(crate) fn sum_of(dice: &[u32]) -> u64 {
    dice.iter().copied().map(u64::from).sum()
}

pub(crate) fn check_quantity(quantity: usize) -> Result<()> {
    if quantity == 0 {
        return Err(Error::argument("dice quantity must be at least 1"));
    }
    Ok(())
}

pub(crate) fn check_keep(quantity: usize, keep_quantity: usize) -> Result<()> {
    check_quantity(quantity)?;
    if keep_quantity == 0 || keep_quantity > quantity {
        return Err(Error::argument(format!(
            "keep quantity {keep_quantity} outside [1, {quantity}]"
        )));
    }
    Ok(())
}

pub(crate) fn check_drop(quantity: usize, drop_quantity: usize) -> Result<()> {
    check_quantity(quantity)?;
    if drop_quantity >= quantity {
        return Err(Error::argument(format!(
            "drop quantity {drop_quantity} outside [0, {quantity})"
        )));
    }
    Ok(())
}

/// A prepared sampler for one die.
pub(crate) fn die(sides: u32) -> Result<RangeGenerator<u32>> {
    if sides == 0 {
        return Err(Error::argument("a die needs at least one side"));
    }
    Ok(RangeGenerator::closed(1, sides))
}

/// Fills `kept` with the `kept.len()` extreme values of `kept.len() + extra` dice.
///
/// Assumes `kept` is non-empty. The extreme is re-scanned after every replacement and the first
/// occurrence wins, so a die equal to the current extreme is discarded.
pub(crate) fn keep_extremes<R, D>(
    rng: &mut R,
    die: &RangeGenerator<u32>,
    keep: Keep,
    kept: &mut [u32],
    extra: usize,
    discarded: &mut D,
) where
    R: BitSource + ?Sized,
    D: DiscardSink + ?Sized,
{
    for slot in kept.iter_mut() {
        *slot = die.next(rng);
    }

    for _ in 0..extra {
        let (at, extreme) = match keep {
            Keep::Highest => first_min(kept),
            Keep::Lowest => first_max(kept),
        };
        let value = die.next(rng);
        let improves = match keep {
            Keep::Highest => value > extreme,
            Keep::Lowest => value < extreme,
        };
        if improves {
            kept[at] = value;
            discarded.discard(extreme);
        } else {
            discarded.discard(value);
        }
    }
}

fn first_min(dice: &[u32]) -> (usize, u32) {
    let mut at = 0;
    for (i, &value) in dice.iter().enumerate().skip(1) {
        if value < dice[at] {
            at = i;
        }
    }
    (at, dice[at])
}

fn first_max(dice: &[u32]) -> (usize, u32) {
    let mut at = 0;
    for (i, &value) in dice.iter().enumerate().skip(1) {
        if value > dice[at] {
            at = i;
        }
    }
    (at, dice[at])
}

// Plain rolls.

pub fn roll_dice<R: BitSource + ?Sized>(rng: &mut R, quantity: usize, sides: u32) -> Result<Vec<u32>> {
    let mut dice = Vec::with_capacity(quantity);
    roll_dice_append(rng, quantity, sides, &mut dice)?;
    Ok(dice)
}

/// Rolls one die per slot of `dice`.
pub fn roll_dice_into<R: BitSource + ?Sized>(rng: &mut R, sides: u32, dice: &mut [u32]) -> Result<()> {
    check_quantity(dice.len())?;
    let die = die(sides)?;
    for slot in dice.iter_mut() {
        *slot = die.next(rng);
    }
    Ok(())
}

pub fn roll_dice_append<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    dice: &mut Vec<u32>,
) -> Result<()> {
    check_quantity(quantity)?;
    let die = die(sides)?;
    dice.extend((0..quantity).map(|_| die.next(rng)));
    Ok(())
}

pub fn sum_roll_dice<R: BitSource + ?Sized>(rng: &mut R, quantity: usize, sides: u32) -> Result<u64> {
    check_quantity(quantity)?;
    let die = die(sides)?;
    Ok((0..quantity).map(|_| u64::from(die.next(rng))).sum())
}

// Keep/drop rolls, generic over the retained end.

/// Rolls `quantity` dice into `kept`, whose length is the keep quantity.
///
/// `discarded` is told up front how many dice it will receive, which lets a [`FixedSink`]
/// reject a mis-sized buffer before anything is drawn.
///
/// [`FixedSink`]: crate::FixedSink
pub fn roll_keep_into<R, D>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep: Keep,
    kept: &mut [u32],
    discarded: &mut D,
) -> Result<()>
where
    R: BitSource + ?Sized,
    D: DiscardSink + ?Sized,
{
    check_keep(quantity, kept.len())?;
    let die = die(sides)?;
    let extra = quantity - kept.len();
    discarded.prepare(extra)?;
    keep_extremes(rng, &die, keep, kept, extra, discarded);
    Ok(())
}

/// Appends the `keep_quantity` kept dice to `kept`.
pub fn roll_keep_append<R, D>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep: Keep,
    keep_quantity: usize,
    kept: &mut Vec<u32>,
    discarded: &mut D,
) -> Result<()>
where
    R: BitSource + ?Sized,
    D: DiscardSink + ?Sized,
{
    check_keep(quantity, keep_quantity)?;
    let die = die(sides)?;
    let extra = quantity - keep_quantity;
    discarded.prepare(extra)?;
    let start = kept.len();
    kept.resize(start + keep_quantity, 0);
    keep_extremes(rng, &die, keep, &mut kept[start..], extra, discarded);
    Ok(())
}

pub fn roll_keep<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep: Keep,
    keep_quantity: usize,
) -> Result<Vec<u32>> {
    let mut kept = Vec::with_capacity(keep_quantity);
    roll_keep_append(rng, quantity, sides, keep, keep_quantity, &mut kept, &mut ())?;
    Ok(kept)
}

pub fn roll_keep_partition<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep: Keep,
    keep_quantity: usize,
) -> Result<DicePartition> {
    let mut partition = DicePartition::default();
    roll_keep_append(
        rng,
        quantity,
        sides,
        keep,
        keep_quantity,
        &mut partition.kept,
        &mut partition.discarded,
    )?;
    Ok(partition)
}

pub fn sum_roll_keep<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep: Keep,
    keep_quantity: usize,
) -> Result<u64> {
    roll_keep(rng, quantity, sides, keep, keep_quantity).map(|kept| sum_of(&kept))
}

/// Rolls according to a [`Selection`]; `All` leaves the discarded set empty.
pub fn roll_selection<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    selection: Selection,
) -> Result<DicePartition> {
    let (keep, keep_quantity) = selection.resolve(quantity)?;
    if selection == Selection::All {
        return Ok(DicePartition {
            kept: roll_dice(rng, quantity, sides)?,
            discarded: Vec::new(),
        });
    }
    roll_keep_partition(rng, quantity, sides, keep, keep_quantity)
}

// Named variants.

pub fn roll_dice_keep_highest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep_quantity: usize,
) -> Result<Vec<u32>> {
    roll_keep(rng, quantity, sides, Keep::Highest, keep_quantity)
}

pub fn roll_dice_keep_lowest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep_quantity: usize,
) -> Result<Vec<u32>> {
    roll_keep(rng, quantity, sides, Keep::Lowest, keep_quantity)
}

/// Drops the `drop_quantity` highest dice, i.e. keeps the lowest `quantity - drop_quantity`.
pub fn roll_dice_drop_highest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    drop_quantity: usize,
) -> Result<Vec<u32>> {
    check_drop(quantity, drop_quantity)?;
    roll_keep(rng, quantity, sides, Keep::Lowest, quantity - drop_quantity)
}

pub fn roll_dice_drop_lowest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    drop_quantity: usize,
) -> Result<Vec<u32>> {
    check_drop(quantity, drop_quantity)?;
    roll_keep(rng, quantity, sides, Keep::Highest, quantity - drop_quantity)
}

pub fn sum_roll_dice_keep_highest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep_quantity: usize,
) -> Result<u64> {
    sum_roll_keep(rng, quantity, sides, Keep::Highest, keep_quantity)
}

pub fn sum_roll_dice_keep_lowest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    keep_quantity: usize,
) -> Result<u64> {
    sum_roll_keep(rng, quantity, sides, Keep::Lowest, keep_quantity)
}

pub fn sum_roll_dice_drop_highest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    drop_quantity: usize,
) -> Result<u64> {
    roll_dice_drop_highest(rng, quantity, sides, drop_quantity).map(|kept| sum_of(&kept))
}

pub fn sum_roll_dice_drop_lowest<R: BitSource + ?Sized>(
    rng: &mut R,
    quantity: usize,
    sides: u32,
    drop_quantity: usize,
) -> Result<u64> {
    roll_dice_drop_lowest(rng, quantity, sides, drop_quantity).map(|kept| sum_of(&kept))
}
