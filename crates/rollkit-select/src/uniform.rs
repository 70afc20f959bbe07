//! Uniform index and element selection.
//!
//! A generator is bound either to a fixed length, in which case the `[0, len)` range is prepared
//! once, or to a length that is re-read on every draw for collections that grow and shrink
//! between draws.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rollkit_core::{uniform, BitSource, Error, RangeGenerator, Result};

pub fn uniform_index<R: BitSource + ?Sized>(rng: &mut R, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(Error::argument("cannot pick from an empty collection"));
    }
    Ok(uniform(rng, len))
}

pub fn uniform_element<'a, R: BitSource + ?Sized, T>(rng: &mut R, elements: &'a [T]) -> Result<&'a T> {
    let index = uniform_index(rng, elements.len())?;
    Ok(&elements[index])
}

enum LengthBinding<'a> {
    Fixed { len: usize, range: RangeGenerator<usize> },
    Dynamic(Box<dyn Fn() -> usize + 'a>),
}

pub struct IndexGenerator<'a> {
    binding: LengthBinding<'a>,
}

impl<'a> IndexGenerator<'a> {
    pub fn fixed(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::argument("cannot pick from an empty collection"));
        }
        Ok(Self {
            binding: LengthBinding::Fixed {
                len,
                range: RangeGenerator::below(len),
            },
        })
    }

    /// Re-reads the length from `len` on every draw.
    pub fn dynamic(len: impl Fn() -> usize + 'a) -> Self {
        Self {
            binding: LengthBinding::Dynamic(Box::new(len)),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.binding, LengthBinding::Fixed { .. })
    }

    /// `None` only when a dynamic binding currently reports length zero.
    pub fn next<R: BitSource + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        match &self.binding {
            LengthBinding::Fixed { range, .. } => Some(range.next(rng)),
            LengthBinding::Dynamic(len) => match len() {
                0 => None,
                n => Some(uniform(rng, n)),
            },
        }
    }
}

impl fmt::Debug for IndexGenerator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            LengthBinding::Fixed { len, .. } => f.debug_struct("IndexGenerator").field("len", len).finish(),
            LengthBinding::Dynamic(_) => f.debug_struct("IndexGenerator").field("len", &"dynamic").finish(),
        }
    }
}

/// Uniform selection over a borrowed, fixed-length slice.
#[derive(Debug, Clone, Copy)]
pub struct ElementGenerator<'a, T> {
    elements: &'a [T],
    range: RangeGenerator<usize>,
}

impl<'a, T> ElementGenerator<'a, T> {
    pub fn new(elements: &'a [T]) -> Result<Self> {
        if elements.is_empty() {
            return Err(Error::argument("cannot pick from an empty collection"));
        }
        Ok(Self {
            elements,
            range: RangeGenerator::below(elements.len()),
        })
    }

    pub fn elements(&self) -> &'a [T] {
        self.elements
    }

    #[inline]
    pub fn next<R: BitSource + ?Sized>(&self, rng: &mut R) -> &'a T {
        &self.elements[self.range.next(rng)]
    }
}

/// Uniform selection over a shared, growable collection.
///
/// The length is re-read on every draw, so pushes and removals through other handles are seen
/// immediately. Draws clone the chosen element.
#[derive(Debug, Clone)]
pub struct SharedElementGenerator<T> {
    elements: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> SharedElementGenerator<T> {
    pub fn new(elements: Rc<RefCell<Vec<T>>>) -> Self {
        Self { elements }
    }

    pub fn next<R: BitSource + ?Sized>(&self, rng: &mut R) -> Option<T> {
        let elements = self.elements.borrow();
        match elements.len() {
            0 => None,
            n => Some(elements[uniform(rng, n)].clone()),
        }
    }
}
