//! xorshift1024* generator core.
//!
//! The generator is deterministic and **not** cryptographically secure. Each instance is plain
//! sequential state: clone it to hand an independent stream to another thread.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod range;
pub mod rng;
pub mod xorshift;

pub use error::{Error, Result};
pub use range::{range_cc, range_co, uniform, RangeGenerator, SampleUniform, UniformSampler};
pub use rng::{mix64, BitSource, EntropySource, SeedSequence, SplitMix64};
pub use xorshift::{GeneratorState, XorShift1024Star, JUMP_POLYNOMIAL, STATE_BYTES, STATE_WORDS};
