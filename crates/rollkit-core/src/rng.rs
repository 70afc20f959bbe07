//! Bit-producing sources.
//!
//! Anything that can hand out 64-bit words can seed a generator. The generators in this crate
//! implement the trait themselves, so one stream can seed another.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

pub trait BitSource {
    fn next_u64(&mut self) -> u64;

    /// Low 32 bits of the next 64-bit output.
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }
}

impl<R: BitSource + ?Sized> BitSource for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// SplitMix64: expands a single integer seed into a well-mixed word stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }
}

impl BitSource for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.step()
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

const SEQUENCE_LANES: usize = 16;
const U32_TAG: u64 = 0x5555_5555_5555_5555;
const BYTES_TAG: u64 = 0xAAAA_AAAA_AAAA_AAAA;

/// Seed source built from an arbitrary-length integer array, byte string or text.
///
/// Every input word is folded into output lane `k % 16`, so seeds longer than 64 bits keep all
/// of their entropy. The stream never runs dry: past the first 16 words the lanes repeat under a
/// fresh SplitMix64 mask, which is what the seeding retry loop needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSequence {
    words: Vec<u64>,
    mixer: SplitMix64,
    index: usize,
}

impl SeedSequence {
    pub fn from_u64s(words: &[u64]) -> Self {
        Self::new(words.to_vec(), words.len() as u64)
    }

    pub fn from_u32s(words: &[u32]) -> Self {
        let widened = words.iter().map(|&w| u64::from(w)).collect();
        Self::new(widened, words.len() as u64 ^ U32_TAG)
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let words = bytes
            .chunks(8)
            .map(|chunk| {
                let mut buf = [0_u8; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect();
        Self::new(words, bytes.len() as u64 ^ BYTES_TAG)
    }

    pub fn from_str_seed(seed: &str) -> Self {
        Self::from_bytes(seed.as_bytes())
    }

    fn new(words: Vec<u64>, tag: u64) -> Self {
        Self {
            words,
            mixer: SplitMix64::new(mix64(tag)),
            index: 0,
        }
    }
}

impl BitSource for SeedSequence {
    fn next_u64(&mut self) -> u64 {
        let lane = self.index % SEQUENCE_LANES;
        self.index = self.index.wrapping_add(1);

        let mut out = self.mixer.next_u64();
        for (k, word) in self
            .words
            .iter()
            .enumerate()
            .skip(lane)
            .step_by(SEQUENCE_LANES)
        {
            out ^= mix64(word.wrapping_add((k as u64).wrapping_mul(GOLDEN_GAMMA)));
        }
        out
    }
}

const ENTROPY_BUFFER: usize = 128;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Best-effort OS entropy.
///
/// Reads from the operating system in 128-byte blocks. If the OS source is unavailable the
/// stream degrades to SplitMix64 over the clock, process id, a stack address and a process-wide
/// counter.
#[derive(Debug, Clone)]
pub struct EntropySource {
    buffer: [u8; ENTROPY_BUFFER],
    cursor: usize,
    fallback: Option<SplitMix64>,
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource {
    pub fn new() -> Self {
        let mut source = Self {
            buffer: [0; ENTROPY_BUFFER],
            cursor: ENTROPY_BUFFER,
            fallback: None,
        };
        source.refill();
        source
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn refill(&mut self) {
        match getrandom::getrandom(&mut self.buffer) {
            Ok(()) => self.cursor = 0,
            Err(err) => {
                tracing::warn!(error = %err, "OS entropy unavailable, using clock-derived seed");
                self.fallback = Some(SplitMix64::new(fallback_seed()));
            }
        }
    }
}

impl BitSource for EntropySource {
    fn next_u64(&mut self) -> u64 {
        if self.fallback.is_none() && self.cursor + 8 > ENTROPY_BUFFER {
            self.refill();
        }
        if let Some(fallback) = self.fallback.as_mut() {
            return fallback.next_u64();
        }
        let mut word = [0_u8; 8];
        word.copy_from_slice(&self.buffer[self.cursor..self.cursor + 8]);
        self.cursor += 8;
        u64::from_le_bytes(word)
    }
}

fn fallback_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let marker = 0_u8;
    let address = &marker as *const u8 as usize as u64;
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut x = nanos;
    x ^= mix64(u64::from(std::process::id()).wrapping_add(GOLDEN_GAMMA));
    x ^= mix64(address);
    x ^= mix64(counter.wrapping_mul(GOLDEN_GAMMA));
    mix64(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_matches_reference_stream() {
        let mut sm = SplitMix64::new(12345);
        assert_eq!(sm.next_u64(), 0x22118258a9d111a0);
        assert_eq!(sm.next_u64(), 0x346edce5f713f8ed);
        assert_eq!(sm.next_u64(), 0x1e9a57bc80e6721d);
    }

    #[test]
    fn seed_sequence_uses_every_word() {
        let mut long = vec![0_u64; 40];
        let base: Vec<u64> = (0..16)
            .map({
                let mut s = SeedSequence::from_u64s(&long);
                move |_| s.next_u64()
            })
            .collect();

        // Word 37 feeds lane 5 only.
        long[37] = 1;
        let mut changed = SeedSequence::from_u64s(&long);
        let out: Vec<u64> = (0..16).map(|_| changed.next_u64()).collect();
        for lane in 0..16 {
            if lane == 5 {
                assert_ne!(out[lane], base[lane]);
            } else {
                assert_eq!(out[lane], base[lane]);
            }
        }
    }

    #[test]
    fn seed_sequence_distinguishes_input_kinds() {
        let mut a = SeedSequence::from_u64s(&[1, 2]);
        let mut b = SeedSequence::from_u32s(&[1, 2]);
        let mut c = SeedSequence::from_bytes(&[1, 2]);
        let (x, y, z) = (a.next_u64(), b.next_u64(), c.next_u64());
        assert_ne!(x, y);
        assert_ne!(y, z);
        assert_ne!(x, z);
    }

    #[test]
    fn trailing_zero_bytes_change_the_stream() {
        let mut a = SeedSequence::from_bytes(b"a");
        let mut b = SeedSequence::from_bytes(b"a\0");
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn entropy_source_produces_varied_words() {
        let mut source = EntropySource::new();
        let words: Vec<u64> = (0..40).map(|_| source.next_u64()).collect();
        assert!(words.iter().any(|&w| w != words[0]));
    }
}
