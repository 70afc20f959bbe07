//! xorshift1024* generator.
//!
//! 1024 bits of state in sixteen 64-bit words plus a rotating offset. Each output runs one
//! xorshift step on the word pair at the offset and scrambles the freshly written word with a
//! fixed odd multiplier. Period is 2^1024 - 1; [`XorShift1024Star::skip_ahead`] jumps 2^512
//! outputs so one seed can feed 2^512 non-overlapping streams.

use crate::error::{Error, Result};
use crate::rng::{BitSource, EntropySource, SeedSequence, SplitMix64};

pub const STATE_WORDS: usize = 16;

/// Saved-state length: 16 little-endian words followed by the offset byte.
pub const STATE_BYTES: usize = STATE_WORDS * 8 + 1;

const OFFSET_MASK: usize = STATE_WORDS - 1;
const MULTIPLIER: u64 = 1_181_783_497_276_652_981;
const SEED_ATTEMPTS: u32 = 4;

/// Coefficients of x^(2^512) modulo the characteristic polynomial of the transition, lowest
/// degree first.
pub const JUMP_POLYNOMIAL: [u64; STATE_WORDS] = [
    0x84242f96eca9c41d,
    0xa3c65b8776f96855,
    0x5b34a39f070b5837,
    0x4489affce4f31a1e,
    0x2ffeeb0a48316f40,
    0xdc2d9891fe68c022,
    0x3659132bb12fea70,
    0xaac17d8efa43cab8,
    0xc4cb815590989b13,
    0x5ee975283d71c93b,
    0x691548c86c1bd540,
    0x7910c41d10a1e6a5,
    0x0b5fc64563b3e2a8,
    0x047f7684e9fc949d,
    0xb99181f2d8f685ca,
    0x284600e3f30e38c3,
];

/// Raw generator state, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorState {
    pub words: [u64; STATE_WORDS],
    pub offset: u8,
}

impl GeneratorState {
    fn validate(&self) -> Result<()> {
        if usize::from(self.offset) > OFFSET_MASK {
            return Err(Error::invalid_state(format!(
                "offset {} is outside [0, {}]",
                self.offset, OFFSET_MASK
            )));
        }
        if is_all_zero(&self.words) {
            return Err(Error::invalid_state("all state words are zero"));
        }
        Ok(())
    }
}

/// The xorshift1024* generator.
///
/// Two generators compare equal iff every state word and the offset match. A generator is
/// always seeded: no constructor hands out the all-zero state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "GeneratorState", try_from = "GeneratorState")
)]
pub struct XorShift1024Star {
    state: [u64; STATE_WORDS],
    offset: u8,
}

impl XorShift1024Star {
    /// Seeds from operating-system entropy.
    pub fn from_entropy() -> Result<Self> {
        Self::from_source(&mut EntropySource::new())
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        // SplitMix64 maps a counter through a bijection, so at most one of any sixteen
        // consecutive outputs is zero.
        let mut source = SplitMix64::new(seed);
        let mut state = [0_u64; STATE_WORDS];
        for word in &mut state {
            *word = source.next_u64();
        }
        Self { state, offset: 0 }
    }

    pub fn from_seed_u64s(seed: &[u64]) -> Result<Self> {
        Self::from_source(&mut SeedSequence::from_u64s(seed))
    }

    pub fn from_seed_u32s(seed: &[u32]) -> Result<Self> {
        Self::from_source(&mut SeedSequence::from_u32s(seed))
    }

    pub fn from_seed_bytes(seed: &[u8]) -> Result<Self> {
        Self::from_source(&mut SeedSequence::from_bytes(seed))
    }

    pub fn from_seed_str(seed: &str) -> Result<Self> {
        Self::from_source(&mut SeedSequence::from_str_seed(seed))
    }

    pub fn from_source<S: BitSource + ?Sized>(source: &mut S) -> Result<Self> {
        let mut rng = Self {
            state: [0; STATE_WORDS],
            offset: 0,
        };
        rng.seed(source)?;
        Ok(rng)
    }

    pub fn from_parts(words: [u64; STATE_WORDS], offset: usize) -> Result<Self> {
        let offset = u8::try_from(offset)
            .map_err(|_| Error::invalid_state(format!("offset {offset} is outside [0, 15]")))?;
        Self::try_from(GeneratorState { words, offset })
    }

    pub fn from_state_bytes(bytes: &[u8]) -> Result<Self> {
        let state = decode_state(bytes)?;
        Self::try_from(state)
    }

    /// Replaces the whole state with sixteen fresh words from `source` and resets the offset.
    ///
    /// Up to four attempts are made; after that the source is considered broken and the
    /// current state is left as it was.
    pub fn seed<S: BitSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        for attempt in 1..=SEED_ATTEMPTS {
            let mut candidate = [0_u64; STATE_WORDS];
            for word in &mut candidate {
                *word = source.next_u64();
            }
            if !is_all_zero(&candidate) {
                self.state = candidate;
                self.offset = 0;
                return Ok(());
            }
            tracing::warn!(attempt, "seed source produced an all-zero state");
        }
        tracing::error!(attempts = SEED_ATTEMPTS, "seeding failed");
        Err(Error::Seeding {
            attempts: SEED_ATTEMPTS,
        })
    }

    /// XORs sixteen fresh words from `source` into the state. The offset is kept.
    pub fn merge_seed<S: BitSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        let mut candidate = self.state;
        for attempt in 1..=SEED_ATTEMPTS {
            for word in &mut candidate {
                *word ^= source.next_u64();
            }
            if !is_all_zero(&candidate) {
                self.state = candidate;
                return Ok(());
            }
            tracing::warn!(attempt, "merged seed cancelled the state to zero");
        }
        tracing::error!(attempts = SEED_ATTEMPTS, "seed merge failed");
        Err(Error::Seeding {
            attempts: SEED_ATTEMPTS,
        })
    }

    /// Advances the state by one output without producing it.
    #[inline]
    pub fn step(&mut self) {
        let p = usize::from(self.offset);
        let q = (p + 1) & OFFSET_MASK;
        let x = self.state[p];
        let mut y = self.state[q];
        y ^= y << 31;
        self.state[q] = y ^ x ^ (y >> 11) ^ (x >> 30);
        self.offset = q as u8;
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.step();
        self.state[usize::from(self.offset)].wrapping_mul(MULTIPLIER)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    /// Advances the state by exactly 2^512 outputs.
    pub fn skip_ahead(&mut self) {
        self.jump(&JUMP_POLYNOMIAL);
    }

    /// Returns a generator at the current position and moves `self` 2^512 outputs ahead.
    pub fn split_off(&mut self) -> Self {
        let stream = self.clone();
        self.skip_ahead();
        stream
    }

    /// Applies `polynomial` (lowest degree first) in the transition to the state.
    ///
    /// The offset is unchanged afterwards: 1024 steps bring it back to where it started.
    fn jump(&mut self, polynomial: &[u64; STATE_WORDS]) {
        let mut acc = [0_u64; STATE_WORDS];
        for &word in polynomial {
            for bit in 0..u64::BITS {
                if word & (1_u64 << bit) != 0 {
                    let p = usize::from(self.offset);
                    for (j, slot) in acc.iter_mut().enumerate() {
                        *slot ^= self.state[(j + p) & OFFSET_MASK];
                    }
                }
                self.step();
            }
        }
        let p = usize::from(self.offset);
        for (j, word) in acc.into_iter().enumerate() {
            self.state[(j + p) & OFFSET_MASK] = word;
        }
    }

    pub fn save_state(&self) -> [u8; STATE_BYTES] {
        let mut out = [0_u8; STATE_BYTES];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&word.to_le_bytes());
        }
        out[STATE_BYTES - 1] = self.offset;
        out
    }

    /// Restores a state produced by [`save_state`](Self::save_state).
    ///
    /// On error the generator keeps its current state.
    pub fn restore_state(&mut self, bytes: &[u8]) -> Result<()> {
        *self = Self::from_state_bytes(bytes)?;
        Ok(())
    }

    pub fn state(&self) -> GeneratorState {
        GeneratorState {
            words: self.state,
            offset: self.offset,
        }
    }

    pub fn words(&self) -> &[u64; STATE_WORDS] {
        &self.state
    }

    pub fn offset(&self) -> usize {
        usize::from(self.offset)
    }
}

impl BitSource for XorShift1024Star {
    fn next_u64(&mut self) -> u64 {
        XorShift1024Star::next_u64(self)
    }

    fn next_u32(&mut self) -> u32 {
        XorShift1024Star::next_u32(self)
    }
}

impl TryFrom<GeneratorState> for XorShift1024Star {
    type Error = Error;

    fn try_from(state: GeneratorState) -> Result<Self> {
        if let Err(err) = state.validate() {
            tracing::debug!(error = %err, "rejected generator state");
            return Err(err);
        }
        Ok(Self {
            state: state.words,
            offset: state.offset,
        })
    }
}

impl From<XorShift1024Star> for GeneratorState {
    fn from(rng: XorShift1024Star) -> Self {
        rng.state()
    }
}

fn decode_state(bytes: &[u8]) -> Result<GeneratorState> {
    if bytes.len() != STATE_BYTES {
        let err = Error::invalid_state(format!(
            "expected {STATE_BYTES} bytes, got {}",
            bytes.len()
        ));
        tracing::debug!(error = %err, "rejected generator state");
        return Err(err);
    }
    let mut words = [0_u64; STATE_WORDS];
    for (i, word) in words.iter_mut().enumerate() {
        let mut w = [0_u8; 8];
        w.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
        *word = u64::from_le_bytes(w);
    }
    Ok(GeneratorState {
        words,
        offset: bytes[STATE_BYTES - 1],
    })
}

fn is_all_zero(words: &[u64; STATE_WORDS]) -> bool {
    words.iter().all(|&w| w == 0)
}

#[cfg(feature = "rand_core")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand_core")))]
mod rand_interop {
    use super::{XorShift1024Star, STATE_WORDS};
    use rand_core::{impls, RngCore, SeedableRng};

    /// 128-byte seed for [`SeedableRng`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Seed1024(pub [u8; STATE_WORDS * 8]);

    impl Default for Seed1024 {
        fn default() -> Self {
            Self([0; STATE_WORDS * 8])
        }
    }

    impl AsMut<[u8]> for Seed1024 {
        fn as_mut(&mut self) -> &mut [u8] {
            &mut self.0
        }
    }

    impl AsRef<[u8]> for Seed1024 {
        fn as_ref(&self) -> &[u8] {
            &self.0
        }
    }

    impl RngCore for XorShift1024Star {
        fn next_u32(&mut self) -> u32 {
            XorShift1024Star::next_u32(self)
        }

        fn next_u64(&mut self) -> u64 {
            XorShift1024Star::next_u64(self)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            impls::fill_bytes_via_next(self, dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl SeedableRng for XorShift1024Star {
        type Seed = Seed1024;

        /// An all-zero seed falls back to `seed_from_u64(0)`.
        fn from_seed(seed: Seed1024) -> Self {
            let mut state = [0_u64; STATE_WORDS];
            for (i, word) in state.iter_mut().enumerate() {
                let mut w = [0_u8; 8];
                w.copy_from_slice(&seed.0[i * 8..(i + 1) * 8]);
                *word = u64::from_le_bytes(w);
            }
            if state.iter().all(|&w| w == 0) {
                return XorShift1024Star::seed_from_u64(0);
            }
            Self { state, offset: 0 }
        }

        fn seed_from_u64(seed: u64) -> Self {
            XorShift1024Star::seed_from_u64(seed)
        }
    }
}

#[cfg(feature = "rand_core")]
pub use rand_interop::Seed1024;
