use rollkit_core::{uniform, BitSource, Error, Result};

use crate::weight::{Weight, WeightFn, WeightSource};

type SumOf<S> = <<S as WeightSource>::Weight as Weight>::Sum;

/// Sums `weights`, rejecting empty input, negative or NaN weights, overflow and a zero total.
pub fn weight_sum<S: WeightSource + ?Sized>(weights: &S) -> Result<SumOf<S>> {
    if weights.is_empty() {
        return Err(Error::argument("weights are empty"));
    }
    let mut sum = SumOf::<S>::default();
    for i in 0..weights.len() {
        let w = weights.weight(i);
        if !w.is_valid() {
            return Err(Error::argument(format!("weight {i} is invalid: {w:?}")));
        }
        sum = w
            .accumulate(sum)
            .ok_or_else(|| Error::argument(format!("weight sum overflows at index {i}")))?;
    }
    check_sum::<S::Weight>(sum)?;
    Ok(sum)
}

pub(crate) fn check_sum<W: Weight>(sum: W::Sum) -> Result<()> {
    // Written so that a NaN sum fails too.
    if sum > W::Sum::default() && W::sum_is_finite(sum) {
        Ok(())
    } else {
        Err(Error::argument(format!("weight sum must be positive and finite, got {sum:?}")))
    }
}

/// Maps `r ∈ [0, sum)` onto an index by cumulative subtraction.
#[inline]
pub(crate) fn walk<S: WeightSource + ?Sized>(weights: &S, mut r: SumOf<S>) -> usize {
    let last = weights.len() - 1;
    for i in 0..last {
        let w = weights.weight(i).widen();
        if r < w {
            return i;
        }
        r = r - w;
    }
    last
}

/// Picks an index with probability proportional to its weight.
pub fn weighted_index<R, S>(rng: &mut R, weights: &S) -> Result<usize>
where
    R: BitSource + ?Sized,
    S: WeightSource + ?Sized,
{
    let sum = weight_sum(weights)?;
    Ok(walk(weights, uniform(rng, sum)))
}

/// Like [`weighted_index`] with a caller-supplied total.
///
/// Weights are not re-validated here. A `sum` that differs from the real total skews the
/// distribution: too large favours the last index, too small never reaches the tail.
pub fn weighted_index_with_sum<R, S>(rng: &mut R, weights: &S, sum: SumOf<S>) -> Result<usize>
where
    R: BitSource + ?Sized,
    S: WeightSource + ?Sized,
{
    if weights.is_empty() {
        return Err(Error::argument("weights are empty"));
    }
    check_sum::<S::Weight>(sum)?;
    Ok(walk(weights, uniform(rng, sum)))
}

/// Picks an element; `weights[i]` is the weight of `elements[i]`.
pub fn weighted_element<'a, R, T, S>(rng: &mut R, elements: &'a [T], weights: &S) -> Result<&'a T>
where
    R: BitSource + ?Sized,
    S: WeightSource + ?Sized,
{
    if weights.len() != elements.len() {
        return Err(Error::argument(format!(
            "{} weights for {} elements",
            weights.len(),
            elements.len()
        )));
    }
    let index = weighted_index(rng, weights)?;
    Ok(&elements[index])
}

/// Picks an element, asking `weight_of` for each element's weight.
pub fn weighted_element_by<'a, R, T, W, F>(
    rng: &mut R,
    elements: &'a [T],
    weight_of: F,
) -> Result<&'a T>
where
    R: BitSource + ?Sized,
    W: Weight,
    F: Fn(&T) -> W,
{
    let weights = WeightFn::new(elements.len(), |i| weight_of(&elements[i]));
    let index = weighted_index(rng, &weights)?;
    Ok(&elements[index])
}
