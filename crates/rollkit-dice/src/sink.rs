use rollkit_core::{Error, Result};

/// Receives the dice a keep/drop roll throws away.
pub trait DiscardSink {
    /// Called once before rolling with the number of dice that will be discarded.
    fn prepare(&mut self, count: usize) -> Result<()>;

    fn discard(&mut self, value: u32);
}

/// Ignores discarded dice.
impl DiscardSink for () {
    fn prepare(&mut self, _count: usize) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn discard(&mut self, _value: u32) {}
}

/// Appends discarded dice.
impl DiscardSink for Vec<u32> {
    fn prepare(&mut self, count: usize) -> Result<()> {
        self.reserve(count);
        Ok(())
    }

    #[inline]
    fn discard(&mut self, value: u32) {
        self.push(value);
    }
}

/// Writes discarded dice into a pre-sized buffer, which must be exactly as long as the number of
/// discarded dice.
#[derive(Debug)]
pub struct FixedSink<'a> {
    buf: &'a mut [u32],
    len: usize,
}

impl<'a> FixedSink<'a> {
    pub fn new(buf: &'a mut [u32]) -> Self {
        Self { buf, len: 0 }
    }

    pub fn written(&self) -> &[u32] {
        &self.buf[..self.len]
    }
}

impl DiscardSink for FixedSink<'_> {
    fn prepare(&mut self, count: usize) -> Result<()> {
        if self.buf.len() != count {
            return Err(Error::argument(format!(
                "discarded buffer holds {} dice, roll discards {count}",
                self.buf.len()
            )));
        }
        self.len = 0;
        Ok(())
    }

    #[inline]
    fn discard(&mut self, value: u32) {
        self.buf[self.len] = value;
        self.len += 1;
    }
}
