//! Dice notation such as `4d6kh3`, `2d20kl1`, `d%` or `3d8+2`.
//!
//! Grammar (case-insensitive, whitespace ignored):
//!
//! ```text
//! [N] d (S | %) [ (k | kh | kl | d | dh | dl) M ] [ (+ | -) C ]
//! ```
//!
//! `N` defaults to 1 and `%` means 100 sides. A bare `k` keeps the highest, a bare `d` drops the
//! lowest.

use std::fmt;
use std::str::FromStr;

use rollkit_core::{BitSource, Error, Result};

use crate::roll::{check_quantity, roll_selection, Keep, Selection};

/// A parsed dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceSpec {
    pub quantity: usize,
    pub sides: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub selection: Selection,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier: i64,
}

/// Result of rolling a [`DiceSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOutcome {
    pub kept: Vec<u32>,
    pub discarded: Vec<u32>,
    /// Sum of the kept dice plus the modifier.
    pub total: i64,
}

impl DiceSpec {
    /// Largest batch a spec may describe; rolling allocates one slot per die.
    pub const MAX_QUANTITY: usize = 10_000;

    pub fn new(quantity: usize, sides: u32) -> Self {
        Self {
            quantity,
            sides,
            selection: Selection::All,
            modifier: 0,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_modifier(mut self, modifier: i64) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_quantity(self.quantity)?;
        if self.quantity > Self::MAX_QUANTITY {
            return Err(Error::argument(format!(
                "dice quantity {} exceeds {}",
                self.quantity,
                Self::MAX_QUANTITY
            )));
        }
        if self.sides == 0 {
            return Err(Error::argument("a die needs at least one side"));
        }
        self.selection.resolve(self.quantity).map(|_| ())
    }

    /// `(quantity, sides, keep_quantity, keep_high)`.
    pub fn keep_tuple(&self) -> Result<(usize, u32, usize, bool)> {
        self.validate()?;
        let (keep, keep_quantity) = self.selection.resolve(self.quantity)?;
        Ok((self.quantity, self.sides, keep_quantity, keep == Keep::Highest))
    }

    pub fn roll<R: BitSource + ?Sized>(&self, rng: &mut R) -> Result<RollOutcome> {
        self.validate()?;
        let partition = roll_selection(rng, self.quantity, self.sides, self.selection)?;
        let sum = i64::try_from(partition.sum()).unwrap_or(i64::MAX);
        Ok(RollOutcome {
            total: sum.saturating_add(self.modifier),
            kept: partition.kept,
            discarded: partition.discarded,
        })
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}{}", self.quantity, self.sides, self.selection)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

impl FromStr for DiceSpec {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let text: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let fail = |reason: &str| Error::argument(format!("invalid dice notation {input:?}: {reason}"));

        let mut cursor = Cursor::new(&text);

        let quantity = match cursor.digits() {
            Some(digits) => digits.parse().map_err(|_| fail("quantity out of range"))?,
            None => 1,
        };
        if !cursor.eat('d') {
            return Err(fail("expected 'd'"));
        }
        let sides = if cursor.eat('%') {
            100
        } else {
            cursor
                .digits()
                .ok_or_else(|| fail("expected a side count"))?
                .parse()
                .map_err(|_| fail("side count out of range"))?
        };

        let selection = match cursor.peek() {
            Some('k') | Some('d') => {
                let keep = cursor.eat('k');
                if !keep {
                    cursor.eat('d');
                }
                let high = if cursor.eat('h') {
                    true
                } else if cursor.eat('l') {
                    false
                } else {
                    keep
                };
                let count: usize = cursor
                    .digits()
                    .ok_or_else(|| fail("expected a keep or drop count"))?
                    .parse()
                    .map_err(|_| fail("keep or drop count out of range"))?;
                match (keep, high) {
                    (true, true) => Selection::KeepHighest(count),
                    (true, false) => Selection::KeepLowest(count),
                    (false, true) => Selection::DropHighest(count),
                    (false, false) => Selection::DropLowest(count),
                }
            }
            _ => Selection::All,
        };

        let modifier = match cursor.peek() {
            Some(sign @ ('+' | '-')) => {
                cursor.bump();
                let magnitude: i64 = cursor
                    .digits()
                    .ok_or_else(|| fail("expected a modifier"))?
                    .parse()
                    .map_err(|_| fail("modifier out of range"))?;
                if sign == '-' {
                    -magnitude
                } else {
                    magnitude
                }
            }
            _ => 0,
        };

        if let Some(c) = cursor.peek() {
            return Err(fail(&format!("unexpected {c:?}")));
        }

        let spec = Self {
            quantity,
            sides,
            selection,
            modifier,
        };
        spec.validate().map_err(|err| match err {
            Error::Argument(reason) => fail(&reason),
            other => other,
        })?;
        Ok(spec)
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let (text, end) = (self.text, self.pos);
        (end > start).then(|| &text[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DiceSpec {
        text.parse().unwrap()
    }

    #[test]
    fn parses_selections() {
        assert_eq!(parse("4d6kh3").selection, Selection::KeepHighest(3));
        assert_eq!(parse("4d6k3").selection, Selection::KeepHighest(3));
        assert_eq!(parse("2d20kl1").selection, Selection::KeepLowest(1));
        assert_eq!(parse("4d6d1").selection, Selection::DropLowest(1));
        assert_eq!(parse("4d6dl1").selection, Selection::DropLowest(1));
        assert_eq!(parse("5d10dh2").selection, Selection::DropHighest(2));
        assert_eq!(parse("3d8").selection, Selection::All);
    }

    #[test]
    fn defaults_and_shorthands() {
        let spec = parse("d%");
        assert_eq!((spec.quantity, spec.sides), (1, 100));

        let spec = parse(" 3D8 + 2 ");
        assert_eq!(spec, DiceSpec::new(3, 8).with_modifier(2));

        assert_eq!(parse("1d4-1").modifier, -1);
    }

    #[test]
    fn quantity_is_capped() {
        assert_eq!(parse("10000d6").quantity, DiceSpec::MAX_QUANTITY);

        let spec = DiceSpec::new(DiceSpec::MAX_QUANTITY + 1, 6);
        let mut rng = rollkit_core::XorShift1024Star::seed_from_u64(1);
        let before = rng.clone();
        assert!(matches!(spec.roll(&mut rng), Err(Error::Argument(_))));
        assert_eq!(rng, before);
    }

    #[test]
    fn keep_tuples() {
        assert_eq!(parse("4d6kh3").keep_tuple().unwrap(), (4, 6, 3, true));
        assert_eq!(parse("4d6dh1").keep_tuple().unwrap(), (4, 6, 3, false));
        assert_eq!(parse("4d6").keep_tuple().unwrap(), (4, 6, 4, true));
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(parse("4D6K3").to_string(), "4d6kh3");
        assert_eq!(parse("d%-3").to_string(), "1d100-3");
        assert_eq!(parse("2d20kl1+5").to_string(), "2d20kl1+5");
        let spec = parse("6d8dl2+1");
        assert_eq!(parse(&spec.to_string()), spec);
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "", "4", "4x6", "4d", "4dk3", "0d6", "4d0", "4d6kh0", "4d6kh5", "4d6d4", "4d6+",
            "4d6 kh3 x", "4d6kh", "99999999999999999999d6", "4000000000d6", "10001d6",
        ] {
            assert!(
                matches!(bad.parse::<DiceSpec>(), Err(Error::Argument(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
