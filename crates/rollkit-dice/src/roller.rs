//! Reusable dice rollers.

use rollkit_core::{BitSource, RangeGenerator, Result};

use crate::roll::{check_drop, check_keep, check_quantity, die, keep_extremes, sum_of, Keep};
use crate::sink::FixedSink;

/// Rolls a fixed number of identical dice, reusing one buffer.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    sides: u32,
    die: RangeGenerator<u32>,
    dice: Vec<u32>,
    rolled: bool,
}

impl DiceRoller {
    pub fn new(quantity: usize, sides: u32) -> Result<Self> {
        check_quantity(quantity)?;
        Ok(Self {
            sides,
            die: die(sides)?,
            dice: vec![0; quantity],
            rolled: false,
        })
    }

    pub fn quantity(&self) -> usize {
        self.dice.len()
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Rolls every die and returns their sum.
    pub fn roll<R: BitSource + ?Sized>(&mut self, rng: &mut R) -> u64 {
        for slot in self.dice.iter_mut() {
            *slot = self.die.next(rng);
        }
        self.rolled = true;
        sum_of(&self.dice)
    }

    /// Dice from the latest roll.
    pub fn dice(&self) -> Option<&[u32]> {
        self.rolled.then_some(self.dice.as_slice())
    }
}

/// Rolls a fixed batch and keeps one end of it, reusing the kept and discarded buffers.
#[derive(Debug, Clone)]
pub struct KeepDiceRoller {
    quantity: usize,
    sides: u32,
    keep: Keep,
    die: RangeGenerator<u32>,
    kept: Vec<u32>,
    discarded: Vec<u32>,
    rolled: bool,
}

impl KeepDiceRoller {
    pub fn new(quantity: usize, sides: u32, keep: Keep, keep_quantity: usize) -> Result<Self> {
        check_keep(quantity, keep_quantity)?;
        Ok(Self {
            quantity,
            sides,
            keep,
            die: die(sides)?,
            kept: vec![0; keep_quantity],
            discarded: vec![0; quantity - keep_quantity],
            rolled: false,
        })
    }

    pub fn keep_highest(quantity: usize, sides: u32, keep_quantity: usize) -> Result<Self> {
        Self::new(quantity, sides, Keep::Highest, keep_quantity)
    }

    pub fn keep_lowest(quantity: usize, sides: u32, keep_quantity: usize) -> Result<Self> {
        Self::new(quantity, sides, Keep::Lowest, keep_quantity)
    }

    pub fn drop_highest(quantity: usize, sides: u32, drop_quantity: usize) -> Result<Self> {
        check_drop(quantity, drop_quantity)?;
        Self::new(quantity, sides, Keep::Lowest, quantity - drop_quantity)
    }

    pub fn drop_lowest(quantity: usize, sides: u32, drop_quantity: usize) -> Result<Self> {
        check_drop(quantity, drop_quantity)?;
        Self::new(quantity, sides, Keep::Highest, quantity - drop_quantity)
    }

    pub fn quantity(&self) -> usize {
        self.quantity
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn keep(&self) -> Keep {
        self.keep
    }

    pub fn keep_quantity(&self) -> usize {
        self.kept.len()
    }

    /// Rolls the batch and returns the sum of the kept dice.
    pub fn roll<R: BitSource + ?Sized>(&mut self, rng: &mut R) -> u64 {
        let extra = self.discarded.len();
        let mut sink = FixedSink::new(&mut self.discarded);
        keep_extremes(rng, &self.die, self.keep, &mut self.kept, extra, &mut sink);
        self.rolled = true;
        sum_of(&self.kept)
    }

    /// Kept dice from the latest roll.
    pub fn dice(&self) -> Option<&[u32]> {
        self.rolled.then_some(self.kept.as_slice())
    }

    /// Discarded dice from the latest roll, in the order they were thrown out.
    pub fn discarded_dice(&self) -> Option<&[u32]> {
        self.rolled.then_some(self.discarded.as_slice())
    }
}
