//! Weighted generators with cached weights.
//!
//! A generator captures its weights once, together with their sum and a prepared
//! `[0, sum)` range. Nothing is re-read on draw. When the weights change, the caller must say
//! so: edit the cache through `weights_mut` (or let a bound accessor change its answers) and
//! call `update_weights`, or rebind with `set_weights` / `set_weight_fn`.

use std::fmt;

use rollkit_core::{BitSource, Error, RangeGenerator, Result};

use crate::weight::Weight;
use crate::weighted::{walk, weight_sum};

type Accessor<'a, W> = Box<dyn Fn(usize) -> W + 'a>;

pub struct WeightedIndexGenerator<'a, W: Weight> {
    weights: Vec<W>,
    accessor: Option<Accessor<'a, W>>,
    sum: W::Sum,
    range: RangeGenerator<W::Sum>,
}

impl<'a, W: Weight> WeightedIndexGenerator<'a, W> {
    pub fn new(weights: Vec<W>) -> Result<Self> {
        let sum = weight_sum(&weights)?;
        Ok(Self {
            weights,
            accessor: None,
            sum,
            range: RangeGenerator::below(sum),
        })
    }

    pub fn from_slice(weights: &[W]) -> Result<Self> {
        Self::new(weights.to_vec())
    }

    /// Binds an index → weight function over `0..count`.
    pub fn from_fn(count: usize, accessor: impl Fn(usize) -> W + 'a) -> Result<Self> {
        let accessor: Accessor<'a, W> = Box::new(accessor);
        let weights: Vec<W> = (0..count).map(|i| accessor(i)).collect();
        let sum = weight_sum(&weights)?;
        Ok(Self {
            weights,
            accessor: Some(accessor),
            sum,
            range: RangeGenerator::below(sum),
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Cached weights, editable in place. Call [`update_weights`](Self::update_weights) after
    /// editing; draws keep using the old sum until then.
    pub fn weights_mut(&mut self) -> &mut [W] {
        &mut self.weights
    }

    pub fn weight_sum(&self) -> W::Sum {
        self.sum
    }

    pub fn is_bound_to_fn(&self) -> bool {
        self.accessor.is_some()
    }

    /// Recomputes the sum from the current weight source.
    ///
    /// With a bound accessor every cached weight is re-read first. On error the previous sum
    /// stays in effect.
    pub fn update_weights(&mut self) -> Result<()> {
        if let Some(accessor) = &self.accessor {
            let fresh: Vec<W> = (0..self.weights.len()).map(|i| accessor(i)).collect();
            let sum = weight_sum(&fresh)?;
            self.weights = fresh;
            self.commit_sum(sum);
        } else {
            let sum = weight_sum(&self.weights)?;
            self.commit_sum(sum);
        }
        Ok(())
    }

    /// Rebinds to a new weight array, dropping any accessor.
    pub fn set_weights(&mut self, weights: Vec<W>) -> Result<()> {
        let sum = weight_sum(&weights)?;
        tracing::debug!(count = weights.len(), "rebinding weighted generator to array");
        self.weights = weights;
        self.accessor = None;
        self.commit_sum(sum);
        Ok(())
    }

    /// Rebinds to a new index → weight function over `0..count`.
    pub fn set_weight_fn(&mut self, count: usize, accessor: impl Fn(usize) -> W + 'a) -> Result<()> {
        let accessor: Accessor<'a, W> = Box::new(accessor);
        let weights: Vec<W> = (0..count).map(|i| accessor(i)).collect();
        let sum = weight_sum(&weights)?;
        tracing::debug!(count, "rebinding weighted generator to accessor");
        self.weights = weights;
        self.accessor = Some(accessor);
        self.commit_sum(sum);
        Ok(())
    }

    #[inline]
    pub fn next<R: BitSource + ?Sized>(&self, rng: &mut R) -> usize {
        walk(self.weights.as_slice(), self.range.next(rng))
    }

    fn commit_sum(&mut self, sum: W::Sum) {
        self.sum = sum;
        self.range = RangeGenerator::below(sum);
    }
}

impl<W: Weight> fmt::Debug for WeightedIndexGenerator<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedIndexGenerator")
            .field("weights", &self.weights)
            .field("sum", &self.sum)
            .field("bound_to_fn", &self.accessor.is_some())
            .finish()
    }
}

/// Weighted selection over a borrowed, fixed-length collection.
pub struct WeightedElementGenerator<'a, T, W: Weight> {
    elements: &'a [T],
    index: WeightedIndexGenerator<'a, W>,
}

impl<'a, T, W: Weight> WeightedElementGenerator<'a, T, W> {
    pub fn new(elements: &'a [T], weights: Vec<W>) -> Result<Self> {
        check_len(elements.len(), weights.len())?;
        Ok(Self {
            elements,
            index: WeightedIndexGenerator::new(weights)?,
        })
    }

    /// Weighs each element with `weight_of`.
    pub fn from_fn(elements: &'a [T], weight_of: impl Fn(&T) -> W + 'a) -> Result<Self> {
        let index = WeightedIndexGenerator::from_fn(elements.len(), move |i| weight_of(&elements[i]))?;
        Ok(Self { elements, index })
    }

    pub fn elements(&self) -> &'a [T] {
        self.elements
    }

    pub fn weights(&self) -> &[W] {
        self.index.weights()
    }

    /// See [`WeightedIndexGenerator::weights_mut`].
    pub fn weights_mut(&mut self) -> &mut [W] {
        self.index.weights_mut()
    }

    pub fn weight_sum(&self) -> W::Sum {
        self.index.weight_sum()
    }

    pub fn update_weights(&mut self) -> Result<()> {
        self.index.update_weights()
    }

    /// Rebinds to a new weight array; its length must match the collection.
    pub fn set_weights(&mut self, weights: Vec<W>) -> Result<()> {
        check_len(self.elements.len(), weights.len())?;
        self.index.set_weights(weights)
    }

    pub fn set_weight_fn(&mut self, weight_of: impl Fn(&T) -> W + 'a) -> Result<()> {
        let elements = self.elements;
        self.index
            .set_weight_fn(elements.len(), move |i| weight_of(&elements[i]))
    }

    #[inline]
    pub fn next_index<R: BitSource + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.next(rng)
    }

    #[inline]
    pub fn next<R: BitSource + ?Sized>(&self, rng: &mut R) -> &'a T {
        &self.elements[self.index.next(rng)]
    }
}

impl<T: fmt::Debug, W: Weight> fmt::Debug for WeightedElementGenerator<'_, T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedElementGenerator")
            .field("elements", &self.elements)
            .field("index", &self.index)
            .finish()
    }
}

fn check_len(elements: usize, weights: usize) -> Result<()> {
    if elements == weights {
        Ok(())
    } else {
        Err(Error::argument(format!(
            "{weights} weights for {elements} elements"
        )))
    }
}
