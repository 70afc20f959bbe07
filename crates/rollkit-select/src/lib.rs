//! Uniform and weighted selection.
//!
//! Weighted selection draws `r` uniformly from `[0, weight_sum)` and walks the weights,
//! subtracting each one until `r` falls inside a weight. The walk stops one short of the end and
//! returns the last index unconditionally, so floating-point rounding can never run it off the
//! end. One generic implementation serves every weight type through [`Weight`], which also picks
//! the accumulator the sum is kept in.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod generator;
pub mod uniform;
pub mod weight;
pub mod weighted;

pub use generator::{WeightedElementGenerator, WeightedIndexGenerator};
pub use uniform::{uniform_element, uniform_index, ElementGenerator, IndexGenerator, SharedElementGenerator};
pub use weight::{Weight, WeightFn, WeightSource};
pub use weighted::{
    weight_sum, weighted_element, weighted_element_by, weighted_index, weighted_index_with_sum,
};
